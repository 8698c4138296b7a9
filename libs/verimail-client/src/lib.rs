//! Client-side state for the verimail email verification flow.
//!
//! This crate provides:
//! - **Resend throttling** - a per-client cooldown between resend requests
//! - **Status reconciliation** - derives the status shown to the user from the
//!   link token, the server's answer and the session cache
//! - **HTTP API** - a reqwest implementation of `VerificationApi` (`http` feature)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use verimail_client::{HttpVerificationApi, InMemorySessionStore, StatusReconciler};
//!
//! let api = Arc::new(HttpVerificationApi::new("https://app.example.com")?);
//! let mut reconciler = StatusReconciler::new(api, Arc::new(InMemorySessionStore::new()));
//!
//! let status = reconciler.load(Some(token), Some("ada@example.com")).await;
//! ```

mod api;
mod error;
#[cfg(feature = "http")]
mod http;
mod reconciler;
mod store;
#[cfg(test)]
mod test_support;
mod throttle;

pub use api::{ConfirmOutcome, VerificationApi};
pub use error::ApiError;
#[cfg(feature = "http")]
pub use http::HttpVerificationApi;
pub use reconciler::{Action, ResendError, StatusReconciler};
pub use store::{InMemorySessionStore, STATUS_KEY, SessionStore};
pub use throttle::{DEFAULT_COOLDOWN_SECS, ResendOutcome, ResendThrottler, ThrottleError};

// Re-export shared types for convenience
pub use verimail_types::{ErrorCode, VerificationStatus};
