use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        clock::Clock, email_templates::verification_email, email_token::EmailTokenCodec,
        validators::normalize_email,
    },
    domain::entities::user::User,
    use_cases::user::{EmailSender, UserRepo},
};

/// Default wait between two resends to the same address.
pub const DEFAULT_RESEND_COOLDOWN_SECS: u64 = 60;

/// Server-side resend cooldown, keyed by email address.
#[async_trait]
pub trait ResendCooldownStore: Send + Sync {
    /// Start a cooldown of `cooldown_secs` for `email` unless one is running.
    /// Returns `None` when acquired, or `Some(remaining_secs)` of the running cooldown.
    async fn try_acquire(&self, email: &str, cooldown_secs: u64) -> AppResult<Option<u64>>;
    async fn release(&self, email: &str) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    pub user_id: Uuid,
    pub email: String,
    /// The address was already verified before this confirm call.
    pub already_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    #[error("Invalid or expired token")]
    TokenInvalidOrExpired,

    #[error("User not found")]
    UserNotFound,

    #[error("Failed to send verification email: {0}")]
    DeliveryFailed(String),

    #[error("Please wait {retry_after_secs}s before requesting another email")]
    CooldownActive { retry_after_secs: u64 },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<AppError> for VerificationFailure {
    fn from(err: AppError) -> Self {
        tracing::error!(error = ?err, "Collaborator failed during email verification");
        VerificationFailure::Unexpected(err.to_string())
    }
}

#[derive(Clone)]
pub struct EmailVerificationUseCases {
    repo: Arc<dyn UserRepo>,
    email: Arc<dyn EmailSender>,
    cooldown: Arc<dyn ResendCooldownStore>,
    codec: EmailTokenCodec,
    clock: Arc<dyn Clock>,
    resend_cooldown_secs: u64,
}

impl EmailVerificationUseCases {
    pub fn new(
        repo: Arc<dyn UserRepo>,
        email: Arc<dyn EmailSender>,
        cooldown: Arc<dyn ResendCooldownStore>,
        codec: EmailTokenCodec,
        clock: Arc<dyn Clock>,
        resend_cooldown_secs: u64,
    ) -> Self {
        Self {
            repo,
            email,
            cooldown,
            codec,
            clock,
            resend_cooldown_secs,
        }
    }

    /// Exchange a verification token for a persisted "verified" state.
    ///
    /// Confirming an already verified user succeeds without writing.
    #[instrument(skip(self, token))]
    pub async fn confirm(&self, token: &str) -> Result<Confirmed, VerificationFailure> {
        let now = self.clock.now();
        let user_id = self
            .codec
            .verify_at(token, now.timestamp())
            .map_err(|rejection| {
                tracing::info!(%rejection, "Verification token rejected");
                VerificationFailure::TokenInvalidOrExpired
            })?;

        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(VerificationFailure::UserNotFound)?;

        if user.is_verified() {
            tracing::debug!(%user_id, "Email already verified");
            return Ok(Confirmed {
                user_id,
                email: user.email,
                already_verified: true,
            });
        }

        let updated = self
            .repo
            .set_email_verified(user_id, now.naive_utc())
            .await?;
        if updated {
            tracing::info!(%user_id, "Email verified");
        } else {
            // Another confirm for the same user landed between the read and the write.
            tracing::debug!(%user_id, "Email verified concurrently");
        }

        Ok(Confirmed {
            user_id,
            email: user.email,
            already_verified: !updated,
        })
    }

    /// Issue a fresh token for `email` and deliver it as a link under `base_url`.
    #[instrument(skip(self))]
    pub async fn resend(&self, email: &str, base_url: &str) -> Result<Sent, VerificationFailure> {
        let email = normalize_email(email);
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(VerificationFailure::UserNotFound)?;

        if let Some(retry_after_secs) = self
            .cooldown
            .try_acquire(&email, self.resend_cooldown_secs)
            .await?
        {
            return Err(VerificationFailure::CooldownActive { retry_after_secs });
        }

        if let Err(failure) = self.deliver(&user, base_url).await {
            // Nothing reached the user, so the next attempt should not wait.
            if let Err(err) = self.cooldown.release(&email).await {
                tracing::warn!(error = ?err, "Failed to release resend cooldown");
            }
            return Err(failure);
        }

        tracing::info!(user_id = %user.id, "Verification email sent");
        Ok(Sent { email: user.email })
    }

    async fn deliver(&self, user: &User, base_url: &str) -> Result<(), VerificationFailure> {
        let token = self
            .codec
            .issue_at(user.id, self.clock.now().timestamp())?;
        let link = verification_link(base_url, &token);
        let (subject, html) =
            verification_email(user.display_name(), &link, self.codec.ttl().whole_hours());

        self.email
            .send(&user.email, &subject, &html)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "Verification email delivery failed");
                VerificationFailure::DeliveryFailed(err.to_string())
            })
    }
}

pub fn verification_link(base_url: &str, token: &str) -> String {
    format!("{}/verify-email?token={}", base_url.trim_end_matches('/'), token)
}
