use async_trait::async_trait;

use crate::error::ApiError;

/// Result of a successful confirm call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmOutcome {
    /// Address the server reports as verified.
    pub email: Option<String>,
}

/// The two verification endpoints, as seen by the client.
#[async_trait]
pub trait VerificationApi: Send + Sync {
    async fn confirm(&self, token: &str) -> Result<ConfirmOutcome, ApiError>;

    /// Ask the server to send a fresh verification email. Returns the server's message.
    async fn resend(&self, email: &str) -> Result<String, ApiError>;
}
