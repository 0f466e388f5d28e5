use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categorizes errors for retry logic and handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rate limiting - should retry with backoff
    RateLimit,
    /// Authentication/authorization issues - should not retry
    Auth,
    /// Invalid request format - should not retry
    InvalidRequest,
    /// Server overloaded - may retry
    ServerOverloaded,
    /// Network/connection issues - may retry
    Network,
    /// API temporarily unavailable - may retry
    ServiceUnavailable,
    /// Unknown/other errors
    Other,
}

/// Error payload embedded in an `error` stream event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorInfo {
    pub r#type: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Error)]
pub enum ClaudeRequestError {
    /// Errors from the HTTP client
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    /// Invalid request errors from the API
    #[error("Invalid request error: {message}")]
    InvalidRequestError {
        message: String,
        param: Option<String>,
        code: Option<String>,
    },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded; `retry_after` carries the server's
    /// `retry-after` header in seconds when present
    #[error("Rate limit exceeded")]
    RateLimit { retry_after: Option<u64> },

    /// API overloaded
    #[error("API overloaded: {0}")]
    Overloaded(String),

    /// Generic API error
    #[error("API error: {0}")]
    Generic(String),

    /// Unexpected response from the API
    #[error("Unexpected response from API: {0}")]
    UnexpectedResponse(String),
}

impl ClaudeRequestError {
    /// Returns the error kind for categorizing errors in retry logic
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RateLimit { .. } => ErrorKind::RateLimit,
            Self::Authentication(_) | Self::PermissionDenied(_) => ErrorKind::Auth,
            Self::InvalidRequestError { .. } | Self::NotFound(_) => ErrorKind::InvalidRequest,
            Self::Overloaded(_) => ErrorKind::ServerOverloaded,
            Self::ReqwestError(e) => {
                if e.is_timeout() || e.is_connect() || e.is_request() {
                    ErrorKind::Network
                } else {
                    ErrorKind::Other
                }
            }
            Self::Generic(_) | Self::UnexpectedResponse(_) => ErrorKind::ServiceUnavailable,
            Self::SerdeError(_) => ErrorKind::Other,
        }
    }

    /// Returns true if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::RateLimit
                | ErrorKind::ServerOverloaded
                | ErrorKind::Network
                | ErrorKind::ServiceUnavailable
        )
    }
}

impl From<ErrorInfo> for ClaudeRequestError {
    fn from(error: ErrorInfo) -> Self {
        match error.r#type.as_str() {
            "invalid_request_error" => ClaudeRequestError::InvalidRequestError {
                message: error.message,
                param: None,
                code: None,
            },
            "authentication_error" => ClaudeRequestError::Authentication(error.message),
            "permission_error" => ClaudeRequestError::PermissionDenied(error.message),
            "not_found_error" => ClaudeRequestError::NotFound(error.message),
            "rate_limit_error" => ClaudeRequestError::RateLimit { retry_after: None },
            "api_error" => ClaudeRequestError::Generic(error.message),
            "overloaded_error" => ClaudeRequestError::Overloaded(error.message),
            _ => ClaudeRequestError::UnexpectedResponse(format!(
                "Unknown error type: {}",
                error.r#type
            )),
        }
    }
}

/// Error raised while consuming a message event stream. Both kinds are
/// terminal: after either, the stream reports no further events.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The underlying byte stream failed for a reason other than clean
    /// end-of-input.
    #[error("Stream transport error: {0}")]
    Transport(String),

    /// A `data:` line did not hold a valid event payload.
    #[error("Stream decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StreamError {
    fn from(error: reqwest::Error) -> Self {
        StreamError::Transport(error.to_string())
    }
}

/// Parse an error response from the API.
/// Handles both structured JSON error bodies and plain text fallbacks.
pub fn parse_error_response(
    status: reqwest::StatusCode,
    headers: &reqwest::header::HeaderMap,
    bytes: bytes::Bytes,
) -> ClaudeRequestError {
    let retry_after = headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());

    // Try to parse as a structured API error first
    if let Ok(payload) = serde_json::from_slice::<ApiErrorResponse>(&bytes) {
        match payload.error.r#type.as_deref() {
            Some("invalid_request_error") => ClaudeRequestError::InvalidRequestError {
                message: payload.error.message,
                param: payload.error.param,
                code: payload.error.code,
            },
            Some("authentication_error") => {
                ClaudeRequestError::Authentication(payload.error.message)
            }
            Some("permission_error") => {
                ClaudeRequestError::PermissionDenied(payload.error.message)
            }
            Some("not_found_error") => ClaudeRequestError::NotFound(payload.error.message),
            Some("rate_limit_error") => ClaudeRequestError::RateLimit { retry_after },
            Some("api_error") => ClaudeRequestError::Generic(payload.error.message),
            Some("overloaded_error") => ClaudeRequestError::Overloaded(payload.error.message),
            _ => ClaudeRequestError::UnexpectedResponse(payload.error.message),
        }
    } else {
        // Fall back to text
        let error_text = String::from_utf8_lossy(&bytes).to_string();
        match status.as_u16() {
            429 => ClaudeRequestError::RateLimit { retry_after },
            401 => ClaudeRequestError::Authentication(error_text),
            403 => ClaudeRequestError::PermissionDenied(error_text),
            404 => ClaudeRequestError::NotFound(error_text),
            _ => ClaudeRequestError::UnexpectedResponse(format!(
                "HTTP status {}: {}",
                status.as_u16(),
                error_text
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_rate_limit_error_carries_retry_after() {
        let body = br#"{"type":"error","error":{"type":"rate_limit_error","message":"slow down"}}"#;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "30".parse().unwrap());

        let error = parse_error_response(
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            &headers,
            bytes::Bytes::from_static(body),
        );

        match error {
            ClaudeRequestError::RateLimit { retry_after } => {
                assert_eq!(retry_after, Some(30));
            }
            other => panic!("expected rate limit error, got {other:?}"),
        }
        assert!(
            ClaudeRequestError::RateLimit { retry_after: None }.is_retryable()
        );
    }

    #[test]
    fn plain_text_error_falls_back_on_status() {
        let headers = reqwest::header::HeaderMap::new();
        let error = parse_error_response(
            reqwest::StatusCode::UNAUTHORIZED,
            &headers,
            bytes::Bytes::from_static(b"no key"),
        );

        match error {
            ClaudeRequestError::Authentication(message) => assert_eq!(message, "no key"),
            other => panic!("expected authentication error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_request_error_keeps_param_and_code() {
        let body = br#"{"error":{"type":"invalid_request_error","message":"bad","param":"max_tokens","code":"too_small"}}"#;
        let headers = reqwest::header::HeaderMap::new();
        let error = parse_error_response(
            reqwest::StatusCode::BAD_REQUEST,
            &headers,
            bytes::Bytes::from_static(body),
        );

        match error {
            ClaudeRequestError::InvalidRequestError {
                message,
                param,
                code,
            } => {
                assert_eq!(message, "bad");
                assert_eq!(param.as_deref(), Some("max_tokens"));
                assert_eq!(code.as_deref(), Some("too_small"));
            }
            other => panic!("expected invalid request error, got {other:?}"),
        }
    }
}
