use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::validators::{FieldErrors, normalize_email, validate_signup},
    domain::entities::user::User,
    use_cases::email_verification::{EmailVerificationUseCases, VerificationFailure},
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    /// Set `email_verified_at` if it is still unset. Returns whether a row changed.
    async fn set_email_verified(&self, id: Uuid, at: NaiveDateTime) -> AppResult<bool>;
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> AppResult<User>;
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("This email is already registered")]
    EmailTaken,

    #[error("Failed to send verification email: {0}")]
    VerificationEmail(VerificationFailure),

    #[error(transparent)]
    App(#[from] AppError),
}

#[derive(Clone)]
pub struct SignupUseCases {
    repo: Arc<dyn UserRepo>,
    verification: EmailVerificationUseCases,
}

impl SignupUseCases {
    pub fn new(repo: Arc<dyn UserRepo>, verification: EmailVerificationUseCases) -> Self {
        Self { repo, verification }
    }

    /// Create an unverified account and send its first verification email.
    ///
    /// The account is deleted again when the email cannot be sent, so the
    /// address can sign up again.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        base_url: &str,
    ) -> Result<User, SignupError> {
        let errors = validate_signup(name, email, password);
        if !errors.is_empty() {
            return Err(SignupError::Validation(errors));
        }

        let email = normalize_email(email);
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(SignupError::EmailTaken);
        }

        let password_hash = hash_password(password.to_owned()).await?;
        let user = match self
            .repo
            .create_user(name.trim(), &email, &password_hash)
            .await
        {
            Ok(user) => user,
            // Lost a race with another signup for the same address.
            Err(AppError::Conflict(_)) => return Err(SignupError::EmailTaken),
            Err(err) => return Err(err.into()),
        };

        if let Err(failure) = self.verification.resend(&user.email, base_url).await {
            tracing::warn!(user_id = %user.id, error = %failure, "Rolling back signup");
            self.repo.delete_user(user.id).await?;
            return Err(SignupError::VerificationEmail(failure));
        }

        tracing::info!(user_id = %user.id, "User signed up");
        Ok(user)
    }
}

async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
}
