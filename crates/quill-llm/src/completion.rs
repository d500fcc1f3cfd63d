// Completion flow: single-shot text continuation, no conversation memory.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::OpenAIClient;
use crate::error::LlmError;

/// Default `max_tokens` sent with every completion request.
pub const DEFAULT_MAX_TOKENS: u32 = 50;

const COMPLETIONS_ENGINE: &str = "text-davinci-003";

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

/// Send `prompt` to the completions endpoint and return the first choice.
///
/// An empty `choices` array is not an error: the result is the empty string.
/// A body that is not valid JSON is a decode error rather than a silently
/// empty result.
pub async fn complete(
    client: &OpenAIClient,
    prompt: &str,
    max_tokens: u32,
) -> Result<String, LlmError> {
    let payload = CompletionRequest { prompt, max_tokens };

    let response = client
        .http()
        .post(format!(
            "{}/engines/{}/completions",
            client.base_url(),
            COMPLETIONS_ENGINE
        ))
        .json(&payload)
        .send()
        .await?;

    let body = client.read_body(response).await?;
    parse_completion(&body)
}

fn parse_completion(body: &str) -> Result<String, LlmError> {
    let raw: Value = serde_json::from_str(body).map_err(LlmError::Decode)?;
    let parsed: CompletionResponse =
        serde_json::from_value(raw).map_err(|e| LlmError::Extraction {
            detail: e.to_string(),
        })?;

    Ok(parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text)
        .unwrap_or_default())
}
