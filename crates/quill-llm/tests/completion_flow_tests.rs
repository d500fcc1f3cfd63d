use mockito::Matcher;
use quill_llm::{complete, CompletionFlow, LlmError, OpenAIClient, Responder, DEFAULT_MAX_TOKENS};

const COMPLETIONS_PATH: &str = "/engines/text-davinci-003/completions";

fn client_for(server: &mockito::ServerGuard) -> OpenAIClient {
    OpenAIClient::new("test-key")
        .unwrap()
        .with_base_url(server.url())
}

#[tokio::test]
async fn complete_returns_first_choice() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", COMPLETIONS_PATH)
        .match_header("authorization", "Bearer test-key")
        .match_body(Matcher::Json(serde_json::json!({
            "prompt": "once upon a time",
            "max_tokens": 50
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"text":"hello"}]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = complete(&client, "once upon a time", DEFAULT_MAX_TOKENS)
        .await
        .unwrap();

    assert_eq!(text, "hello");
    mock.assert_async().await;
}

#[tokio::test]
async fn complete_with_no_choices_is_empty_not_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", COMPLETIONS_PATH)
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let text = complete(&client, "prompt", DEFAULT_MAX_TOKENS).await.unwrap();

    assert_eq!(text, "");
}

#[tokio::test]
async fn complete_reports_invalid_json_instead_of_swallowing_it() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", COMPLETIONS_PATH)
        .with_status(200)
        .with_body("<html>gateway timeout</html>")
        .create_async()
        .await;

    let client = client_for(&server);
    let err = complete(&client, "prompt", DEFAULT_MAX_TOKENS)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::Decode(_)));
}

#[tokio::test]
async fn completion_flow_uses_configured_max_tokens() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", COMPLETIONS_PATH)
        .match_body(Matcher::Json(serde_json::json!({
            "prompt": "keep going",
            "max_tokens": 120
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"text":" and on"}]}"#)
        .create_async()
        .await;

    let flow = CompletionFlow::new(client_for(&server)).max_tokens(120);
    let reply = flow.respond("keep going").await.unwrap();

    assert_eq!(reply, " and on");
    mock.assert_async().await;
}
