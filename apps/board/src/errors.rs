use thiserror::Error;

/// Errors surfaced by the board client.
/// Transport and API failures come from `api_client`; `Command` covers
/// malformed terminal input.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: check ATS_API_TOKEN")]
    Unauthorized,

    #[error("Invalid command: {0}")]
    Command(String),
}

impl BoardError {
    /// Whether an idempotent request may be retried after this error.
    pub fn is_transient(&self) -> bool {
        match self {
            BoardError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            BoardError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
