// Error taxonomy for calls against the diagnostic API
use thiserror::Error;

/// Message used when the server rejects a request without a readable detail.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// Message attached to `NetworkUnreachable` when no response arrived at all.
pub const UNREACHABLE_HINT: &str =
    "API server is unreachable - make sure the server is reachable over HTTPS (TLS)";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    NetworkUnreachable(String),

    #[error("{message} (status {status})")]
    ServerError { status: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),
}

impl ApiError {
    /// Text shown to the user inside a view's error panel.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ServerError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
