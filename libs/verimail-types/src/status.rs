use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Verification status as shown to the user.
///
/// Derived on the client and never authoritative; the server's
/// `email_verified_at` column is the source of truth.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum VerificationStatus {
    #[serde(rename = "pending")]
    #[strum(serialize = "pending")]
    Pending,
    #[serde(rename = "awaiting_verification")]
    #[strum(serialize = "awaiting_verification")]
    Awaiting,
    #[serde(rename = "success")]
    #[strum(serialize = "success")]
    Success,
    #[serde(rename = "error")]
    #[strum(serialize = "error")]
    Error,
}

impl VerificationStatus {
    /// `Success` and `Error` end a verification attempt and may be cached.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}
