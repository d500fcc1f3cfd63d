use thiserror::Error;

/// Failure modes for calls against the OpenAI API.
///
/// The split between `Decode` and `Protocol`/`Extraction` is deliberate:
/// `Decode` means the body was not valid JSON at all, the other two mean the
/// JSON was well-formed but did not carry the expected shape.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The thread-creation reply carried no usable string `id`.
    #[error("unexpected thread-creation reply: {detail}")]
    Protocol { detail: String },

    /// The message reply carried no extractable text content.
    #[error("no text content in reply: {detail}")]
    Extraction { detail: String },

    /// The API answered with a non-success status.
    #[error("OpenAI API error ({status}): {message}")]
    Api {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The API key could not be encoded into an Authorization header.
    #[error("invalid API key format: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),
}
