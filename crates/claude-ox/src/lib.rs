#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::pedantic, clippy::unwrap_used)]

pub mod error;
pub mod message;
pub mod model;
pub mod prelude;
pub mod request;
pub mod response;
pub mod streaming;
pub mod tokens;
pub mod tool;
pub mod usage;

// Re-export main types
pub use error::{ClaudeRequestError, StreamError};
pub use model::Model;
pub use request::ChatRequest;
pub use response::ChatResponse;
pub use streaming::{MessageStream, StreamEvent};

use bon::Builder;
use core::fmt;

const BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_URL: &str = "v1/messages";
const COUNT_TOKENS_URL: &str = "v1/messages/count_tokens";
const API_VERSION: &str = "2023-06-01";

#[derive(Clone, Builder)]
pub struct Claude {
    #[builder(into)]
    pub(crate) api_key: String,
    #[builder(default)]
    pub(crate) client: reqwest::Client,
    #[builder(default = BASE_URL.to_string(), into)]
    pub(crate) base_url: String,
    #[builder(default = API_VERSION.to_string(), into)]
    pub(crate) api_version: String,
}

impl Claude {
    /// Create a new client with the provided API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            api_version: API_VERSION.to_string(),
        }
    }

    pub fn load_from_env() -> Result<Self, std::env::VarError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")?;
        Ok(Self::builder().api_key(api_key).build())
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
    }

    async fn error_from(response: reqwest::Response) -> ClaudeRequestError {
        let status = response.status();
        let headers = response.headers().clone();
        match response.bytes().await {
            Ok(bytes) => error::parse_error_response(status, &headers, bytes),
            Err(error) => ClaudeRequestError::ReqwestError(error),
        }
    }

    /// Send a request and wait for the complete response.
    pub async fn send(
        &self,
        request: &request::ChatRequest,
    ) -> Result<response::ChatResponse, ClaudeRequestError> {
        let url = format!("{}/{}", self.base_url, MESSAGES_URL);

        let res = self.post(&url).json(request).send().await?;

        if res.status().is_success() {
            Ok(res.json::<response::ChatResponse>().await?)
        } else {
            Err(Self::error_from(res).await)
        }
    }

    /// Send a request with streaming enabled and hand back the message
    /// stream. A non-success status is parsed into an API error before any
    /// stream is constructed.
    pub async fn stream(
        &self,
        request: &request::ChatRequest,
    ) -> Result<MessageStream, ClaudeRequestError> {
        let url = format!("{}/{}", self.base_url, MESSAGES_URL);
        let mut request_data = request.clone();
        request_data.stream = Some(true);

        let res = self
            .post(&url)
            .header("accept", "text/event-stream")
            .json(&request_data)
            .send()
            .await?;

        if res.status().is_success() {
            Ok(MessageStream::from_response(res))
        } else {
            Err(Self::error_from(res).await)
        }
    }

    /// Count the input tokens a request would consume.
    pub async fn count_tokens(
        &self,
        request: &tokens::TokenCountRequest,
    ) -> Result<tokens::TokenCountResponse, ClaudeRequestError> {
        let url = format!("{}/{}", self.base_url, COUNT_TOKENS_URL);

        let res = self.post(&url).json(request).send().await?;

        if res.status().is_success() {
            Ok(res.json::<tokens::TokenCountResponse>().await?)
        } else {
            Err(Self::error_from(res).await)
        }
    }
}

impl fmt::Debug for Claude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claude")
            .field("api_key", &"[REDACTED]")
            .field("client", &self.client)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}
