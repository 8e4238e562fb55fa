use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered with a structured error carrying a message
    #[error("{message}")]
    Backend { status: StatusCode, message: String },

    #[error("Request failed with status code {}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    #[error("Unexpected response status: {}", .0.as_u16())]
    UnexpectedStatus(StatusCode),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Endpoint not configured: {0}")]
    EndpointNotConfigured(&'static str),
}

/// Configuration errors raised while building the endpoint registry
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EndpointError {
    #[error("API base URL is not configured")]
    MissingBaseUrl,

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("API base URL must be an http(s) URL with a host: {0}")]
    UnsupportedBaseUrl(String),

    #[error("Invalid image host account id: {0:?}")]
    InvalidImageHostAccount(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let cut = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= MAX_ERROR_BODY_LENGTH)
            .last()
            .unwrap_or(0);
        format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
    }

    /// Build an error from a non-success response.
    ///
    /// A JSON body with a string `message` field becomes `Backend` so the
    /// message can be shown verbatim; anything else keeps the status.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                message: Some(message),
            }) => ApiError::Backend { status, message },
            _ => ApiError::Status {
                status,
                body: Self::truncate_body(body),
            },
        }
    }

    /// HTTP status behind this error, when there was a response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Backend { status, .. } | ApiError::Status { status, .. } => Some(*status),
            ApiError::UnexpectedStatus(status) => Some(*status),
            ApiError::NetworkError(e) => e.status(),
            _ => None,
        }
    }

    /// Text shown inline under a form.
    ///
    /// Backend messages are passed through untouched; transport failures show
    /// the underlying error's own text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkError(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}
