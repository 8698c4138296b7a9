//! Wire types shared by the verimail server and its client SDK.
//!
//! This crate provides:
//! - API error codes (`ErrorCode`)
//! - Response bodies for the verification endpoints
//! - The client-visible verification status (`VerificationStatus`)

mod errors;
mod responses;
mod status;

pub use errors::ErrorCode;
pub use responses::{
    ResendVerificationRequest, SendVerificationResponse, SignupRequest, SignupResponse,
    VerifyEmailResponse,
};
pub use status::VerificationStatus;
