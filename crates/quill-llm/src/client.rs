// OpenAI HTTP client (direct reqwest, no SDK)

use crate::error::LlmError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Thin wrapper around `reqwest::Client` carrying the credential and base URL.
///
/// The credential is baked into the default headers once at construction and
/// is immutable for the client's lifetime.
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    /// Override the API base URL (used by tests against a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http_client
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check the status and read the body as text.
    ///
    /// Error statuses consume the body into `LlmError::Api` so callers never
    /// try to decode an error payload as a success schema.
    pub(crate) async fn read_body(&self, response: reqwest::Response) -> Result<String, LlmError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }
        Ok(response.text().await?)
    }
}
