use std::sync::Arc;

use thiserror::Error;
use verimail_types::VerificationStatus;

use crate::api::VerificationApi;
use crate::store::{STATUS_KEY, SessionStore};
use crate::throttle::{ResendOutcome, ResendThrottler, ThrottleError};

/// What the verification page offers the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Resend,
    /// Proceed to the next onboarding step.
    Continue,
    None,
}

#[derive(Debug, Error)]
pub enum ResendError {
    #[error("Resend is not available while status is {0}")]
    NotAvailable(VerificationStatus),

    #[error("Email address is unknown, cannot resend")]
    EmailUnknown,

    #[error(transparent)]
    Throttle(#[from] ThrottleError),
}

/// Derives the verification status shown to the user.
///
/// The server stays authoritative. A terminal status (`success` or `error`)
/// is cached in the session store so reloading the page does not confirm
/// the same token again.
pub struct StatusReconciler {
    api: Arc<dyn VerificationApi>,
    store: Arc<dyn SessionStore>,
    throttler: ResendThrottler,
    status: VerificationStatus,
    email: Option<String>,
}

impl StatusReconciler {
    pub fn new(api: Arc<dyn VerificationApi>, store: Arc<dyn SessionStore>) -> Self {
        Self::with_throttler(api, store, ResendThrottler::default())
    }

    pub fn with_throttler(
        api: Arc<dyn VerificationApi>,
        store: Arc<dyn SessionStore>,
        throttler: ResendThrottler,
    ) -> Self {
        Self {
            api,
            store,
            throttler,
            status: VerificationStatus::Pending,
            email: None,
        }
    }

    pub fn status(&self) -> VerificationStatus {
        self.status
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn throttler(&self) -> &ResendThrottler {
        &self.throttler
    }

    /// Resolve the status for a page load with the link's `token` and `email` parameters.
    pub async fn load(&mut self, token: Option<&str>, email: Option<&str>) -> VerificationStatus {
        if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
            self.email = Some(email.to_string());
        }

        if let Some(cached) = self.cached_terminal() {
            tracing::debug!(status = %cached, "Restored cached verification status");
            self.status = cached;
            return cached;
        }

        match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => {
                self.status = VerificationStatus::Pending;
                match self.api.confirm(token).await {
                    Ok(outcome) => {
                        if let Some(email) = outcome.email {
                            self.email = Some(email);
                        }
                        self.enter(VerificationStatus::Success);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Email verification failed");
                        self.enter(VerificationStatus::Error);
                    }
                }
            }
            None => self.status = VerificationStatus::Awaiting,
        }

        self.status
    }

    pub fn available_action(&self) -> Action {
        match self.status {
            VerificationStatus::Error | VerificationStatus::Awaiting => Action::Resend,
            VerificationStatus::Success => Action::Continue,
            VerificationStatus::Pending => Action::None,
        }
    }

    /// Request a fresh verification email for the known address.
    pub async fn resend(&mut self) -> Result<ResendOutcome, ResendError> {
        if self.available_action() != Action::Resend {
            return Err(ResendError::NotAvailable(self.status));
        }
        let email = self.email.clone().ok_or(ResendError::EmailUnknown)?;

        let outcome = self
            .throttler
            .request_resend(self.api.as_ref(), &email)
            .await?;

        // The new link must be confirmable on the next load.
        self.store.remove(STATUS_KEY);
        self.status = VerificationStatus::Awaiting;
        Ok(outcome)
    }

    pub fn tick(&self) -> u32 {
        self.throttler.tick()
    }

    fn enter(&mut self, status: VerificationStatus) {
        self.status = status;
        if status.is_terminal() {
            self.store.set(STATUS_KEY, status.as_ref());
        }
    }

    fn cached_terminal(&self) -> Option<VerificationStatus> {
        self.store
            .get(STATUS_KEY)
            .and_then(|raw| raw.parse::<VerificationStatus>().ok())
            .filter(|status| status.is_terminal())
    }
}
