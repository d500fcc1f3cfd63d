// Thread flow: one remote conversation thread, messages posted against it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::client::OpenAIClient;
use crate::error::LlmError;

/// Opaque handle for a server-side conversation thread.
///
/// Returned by [`create_thread`] and threaded explicitly through callers;
/// there is no process-global identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
struct ThreadObject {
    id: String,
}

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    thread_id: &'a str,
    messages: [OutgoingMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: TextValue },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: String,
}

/// Create a remote conversation thread and return its identifier.
///
/// POST `/v1/threads` with an empty body; the endpoint still requires the
/// assistants beta flag.
pub async fn create_thread(client: &OpenAIClient) -> Result<ThreadId, LlmError> {
    let response = client
        .http()
        .post(format!("{}/threads", client.base_url()))
        .header("OpenAI-Beta", "assistants=v1")
        .send()
        .await?;

    let body = client.read_body(response).await?;
    let id = parse_thread_created(&body)?;
    tracing::debug!(thread_id = %id, "thread created");
    Ok(id)
}

/// Post a user message to `thread` and return the reply text.
pub async fn send_message(
    client: &OpenAIClient,
    thread: &ThreadId,
    message: &str,
) -> Result<String, LlmError> {
    let payload = MessageRequest {
        thread_id: thread.as_str(),
        messages: [OutgoingMessage {
            role: "user",
            content: message,
        }],
    };

    let response = client
        .http()
        .post(format!(
            "{}/threads/{}/messages",
            client.base_url(),
            thread
        ))
        .json(&payload)
        .send()
        .await?;

    let body = client.read_body(response).await?;
    parse_message_reply(&body)
}

fn parse_thread_created(body: &str) -> Result<ThreadId, LlmError> {
    let raw: Value = serde_json::from_str(body).map_err(LlmError::Decode)?;
    let thread: ThreadObject = serde_json::from_value(raw).map_err(|e| LlmError::Protocol {
        detail: e.to_string(),
    })?;
    Ok(ThreadId(thread.id))
}

/// Extract the last text part of the returned message object.
///
/// The reply is the created message itself: a `content` array of typed parts,
/// text parts carrying their string under `text.value`.
fn parse_message_reply(body: &str) -> Result<String, LlmError> {
    let raw: Value = serde_json::from_str(body).map_err(LlmError::Decode)?;
    let message: MessageObject = serde_json::from_value(raw).map_err(|e| LlmError::Extraction {
        detail: e.to_string(),
    })?;

    message
        .content
        .into_iter()
        .rev()
        .find_map(|part| match part {
            ContentPart::Text { text } => Some(text.value),
            ContentPart::Other => None,
        })
        .ok_or_else(|| LlmError::Extraction {
            detail: "reply contained no text content".to_string(),
        })
}
