use thiserror::Error;
use verimail_types::ErrorCode;

/// Errors from calling the verification API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with an error body.
    #[error("API error ({status}): {message}")]
    Rejected {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
        retry_after_secs: Option<u64>,
    },

    /// Network error (only with `http` feature)
    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body could not be understood.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-side cooldown reported with a rate-limited resend.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ApiError::Rejected {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }
}
