// Editor session controller: owns the buffer and the in-flight request
// bookkeeping, decoupled from the GUI so it can be exercised headless.

use std::sync::Arc;

use quill_llm::Responder;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::worker::{spawn_respond, Outcome, SessionEvent};

/// Reasons a submit is rejected before any request is made.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Startup initialization failed, so there is nothing to send to.
    #[error("assistant not available: initialization failed at startup")]
    NotReady,
    /// One request at a time; the previous one has not come back yet.
    #[error("a request is already in flight")]
    InFlight,
}

struct Pending {
    handle: AbortHandle,
    generation: u64,
}

pub struct EditorSession {
    pub buffer: String,
    responder: Option<Arc<dyn Responder>>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    pending: Option<Pending>,
    generation: u64,
}

impl EditorSession {
    /// `responder` is `None` when startup initialization failed; the session
    /// then rejects every submit locally instead of calling out.
    pub fn new(responder: Option<Arc<dyn Responder>>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            buffer: String::new(),
            responder,
            events_tx,
            events_rx,
            pending: None,
            generation: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Send the current buffer to the responder on a background task.
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        if self.pending.is_some() {
            return Err(SubmitError::InFlight);
        }
        let responder = self.responder.clone().ok_or(SubmitError::NotReady)?;

        self.generation += 1;
        let handle = spawn_respond(
            responder,
            self.generation,
            self.buffer.clone(),
            self.events_tx.clone(),
        );
        self.pending = Some(Pending {
            handle,
            generation: self.generation,
        });
        Ok(())
    }

    /// Abort the in-flight request, if any. A reply that already reached the
    /// channel before the abort is dropped by `poll` (its generation is no
    /// longer awaited).
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            tracing::info!(generation = pending.generation, "in-flight request cancelled");
        }
    }

    /// Drain worker events, appending replies to the buffer in arrival
    /// order. Returns the user-facing notices raised by this poll.
    ///
    /// Only the event whose generation matches the awaited request clears
    /// the pending flag; events from cancelled or superseded requests are
    /// discarded without touching the buffer.
    pub fn poll(&mut self) -> Vec<String> {
        let mut notices = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            match &self.pending {
                Some(pending) if pending.generation == event.generation => {
                    self.pending = None;
                }
                _ => {
                    tracing::debug!(generation = event.generation, "dropping stale event");
                    continue;
                }
            }
            if let Some(notice) = self.apply(event.outcome) {
                notices.push(notice);
            }
        }
        notices
    }

    fn apply(&mut self, outcome: Outcome) -> Option<String> {
        match outcome {
            Outcome::Reply(text) => {
                self.buffer.push(' ');
                self.buffer.push_str(&text);
                None
            }
            Outcome::Failed(err) => {
                tracing::error!(error = %err, "request failed");
                Some(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quill_llm::LlmError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted(&'static str);

    #[async_trait]
    impl Responder for Scripted {
        async fn respond(&self, _input: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct Stalled;

    #[async_trait]
    impl Responder for Stalled {
        async fn respond(&self, _input: &str) -> Result<String, LlmError> {
            std::future::pending().await
        }
    }

    /// First call replies immediately, every later call hangs.
    #[derive(Default)]
    struct FastThenStalled {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Responder for FastThenStalled {
        async fn respond(&self, _input: &str) -> Result<String, LlmError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok("pong".to_string())
            } else {
                std::future::pending().await
            }
        }
    }

    #[test]
    fn identical_replies_append_twice_in_order() {
        let mut session = EditorSession::new(None);
        session.buffer = "ping".to_string();

        assert!(session.apply(Outcome::Reply("pong".to_string())).is_none());
        assert!(session.apply(Outcome::Reply("pong".to_string())).is_none());

        assert_eq!(session.buffer, "ping pong pong");
    }

    #[test]
    fn failure_raises_a_notice_and_leaves_the_buffer() {
        let mut session = EditorSession::new(None);
        session.buffer = "draft".to_string();

        let notice = session.apply(Outcome::Failed(LlmError::Extraction {
            detail: "no text".to_string(),
        }));

        assert!(notice.unwrap().contains("no text"));
        assert_eq!(session.buffer, "draft");
    }

    #[test]
    fn submit_without_responder_is_rejected_locally() {
        let mut session = EditorSession::new(None);
        assert_eq!(session.submit(), Err(SubmitError::NotReady));
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn submit_while_pending_is_rejected() {
        let mut session = EditorSession::new(Some(Arc::new(Stalled)));

        assert_eq!(session.submit(), Ok(()));
        assert!(session.is_pending());
        assert_eq!(session.submit(), Err(SubmitError::InFlight));
    }

    #[tokio::test]
    async fn cancel_clears_the_pending_request() {
        let mut session = EditorSession::new(Some(Arc::new(Stalled)));

        session.submit().unwrap();
        session.cancel();

        assert!(!session.is_pending());
        assert_eq!(session.submit(), Ok(()));
    }

    #[tokio::test]
    async fn poll_applies_a_completed_reply() {
        let mut session = EditorSession::new(Some(Arc::new(Scripted("pong"))));
        session.buffer = "ping".to_string();
        session.submit().unwrap();

        // The worker is already spawned; wait for its event to land.
        let mut notices = Vec::new();
        for _ in 0..100 {
            notices.extend(session.poll());
            if !session.is_pending() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert!(notices.is_empty());
        assert_eq!(session.buffer, "ping pong");
    }

    #[tokio::test]
    async fn cancel_then_resubmit_discards_the_stale_reply() {
        let mut session = EditorSession::new(Some(Arc::new(FastThenStalled::default())));
        session.buffer = "ping".to_string();

        // Request 1 completes and its reply sits in the channel, unpolled.
        session.submit().unwrap();
        for _ in 0..100 {
            tokio::task::yield_now().await;
        }

        session.cancel();
        // Request 2 hangs; the session now awaits generation 2 only.
        session.submit().unwrap();

        let notices = session.poll();

        assert!(notices.is_empty());
        assert_eq!(session.buffer, "ping", "cancelled reply must not be applied");
        assert!(session.is_pending(), "request 2 is still in flight");
        assert_eq!(session.submit(), Err(SubmitError::InFlight));
    }

    #[tokio::test]
    async fn cancelled_reply_is_dropped_without_a_resubmit() {
        let mut session = EditorSession::new(Some(Arc::new(Scripted("pong"))));
        session.buffer = "ping".to_string();

        session.submit().unwrap();
        for _ in 0..100 {
            tokio::task::yield_now().await;
        }
        session.cancel();

        let notices = session.poll();

        assert!(notices.is_empty());
        assert_eq!(session.buffer, "ping");
        assert!(!session.is_pending());
    }
}
