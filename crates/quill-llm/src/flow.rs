// The two endpoint strategies, consolidated behind one trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::OpenAIClient;
use crate::completion::{complete, DEFAULT_MAX_TOKENS};
use crate::error::LlmError;
use crate::thread::{create_thread, send_message, ThreadId};

/// Which endpoint strategy the editor drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    /// Conversational thread created once at startup.
    #[default]
    Thread,
    /// Single-shot completion per send.
    Completion,
}

/// One interface over both flows: take the editor text, return the reply.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, input: &str) -> Result<String, LlmError>;
}

/// Thread flow: holds the client and the thread created at startup.
pub struct ThreadFlow {
    client: OpenAIClient,
    thread: ThreadId,
}

impl ThreadFlow {
    /// Create the remote thread once and keep its id for every later send.
    pub async fn start(client: OpenAIClient) -> Result<Self, LlmError> {
        let thread = create_thread(&client).await?;
        tracing::info!(thread_id = %thread, "conversation thread initialized");
        Ok(Self { client, thread })
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread
    }
}

#[async_trait]
impl Responder for ThreadFlow {
    async fn respond(&self, input: &str) -> Result<String, LlmError> {
        send_message(&self.client, &self.thread, input).await
    }
}

/// Completion flow: stateless, one request per send.
pub struct CompletionFlow {
    client: OpenAIClient,
    max_tokens: u32,
}

impl CompletionFlow {
    pub fn new(client: OpenAIClient) -> Self {
        Self {
            client,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }
}

#[async_trait]
impl Responder for CompletionFlow {
    async fn respond(&self, input: &str) -> Result<String, LlmError> {
        complete(&self.client, input, self.max_tokens).await
    }
}
