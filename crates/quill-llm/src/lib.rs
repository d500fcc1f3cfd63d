pub mod client;
pub mod completion;
pub mod error;
pub mod flow;
pub mod thread;

pub use client::OpenAIClient;
pub use completion::{complete, DEFAULT_MAX_TOKENS};
pub use error::LlmError;
pub use flow::{CompletionFlow, FlowKind, Responder, ThreadFlow};
pub use thread::{create_thread, send_message, ThreadId};
