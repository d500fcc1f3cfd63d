// Background worker: runs the HTTP round trip off the UI thread and hands
// the outcome back over a channel. The worker never touches UI state.

use std::sync::Arc;

use quill_llm::{LlmError, Responder};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Outcome of one send, delivered back to the UI loop.
///
/// `generation` identifies which submit produced the event; the session
/// drops events whose generation it no longer waits for (cancelled or
/// superseded requests).
#[derive(Debug)]
pub struct SessionEvent {
    pub generation: u64,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Outcome {
    Reply(String),
    Failed(LlmError),
}

/// Spawn the respond call on the runtime and deliver the result to `events`.
///
/// Returns the abort handle so the caller can cancel the in-flight request;
/// an aborted task sends nothing.
pub fn spawn_respond(
    responder: Arc<dyn Responder>,
    generation: u64,
    input: String,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> AbortHandle {
    let task = tokio::spawn(async move {
        tracing::debug!(generation, chars = input.len(), "sending editor buffer");
        let outcome = match responder.respond(&input).await {
            Ok(text) => Outcome::Reply(text),
            Err(err) => Outcome::Failed(err),
        };
        // The receiver may already be gone during shutdown.
        let _ = events.send(SessionEvent {
            generation,
            outcome,
        });
    });
    task.abort_handle()
}
