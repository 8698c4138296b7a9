//! Scripted `VerificationApi` for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{ConfirmOutcome, VerificationApi};
use crate::error::ApiError;

type Failure = (u16, String, Option<u64>);

#[derive(Default)]
pub struct MockApi {
    confirm_calls: Mutex<Vec<String>>,
    resend_calls: Mutex<Vec<String>>,
    confirm_email: Mutex<Option<String>>,
    confirm_failure: Mutex<Option<Failure>>,
    resend_failure: Mutex<Option<Failure>>,
    resend_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm_returns(&self, email: &str) {
        *self.confirm_email.lock().unwrap() = Some(email.to_string());
    }

    pub fn fail_confirm(&self, status: u16, message: &str) {
        *self.confirm_failure.lock().unwrap() = Some((status, message.to_string(), None));
    }

    pub fn fail_resend(&self, status: u16, message: &str, retry_after_secs: Option<u64>) {
        *self.resend_failure.lock().unwrap() =
            Some((status, message.to_string(), retry_after_secs));
    }

    /// Make `resend` wait until the returned handle is notified.
    pub fn hold_resend(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.resend_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn confirm_calls(&self) -> Vec<String> {
        self.confirm_calls.lock().unwrap().clone()
    }

    pub fn resend_calls(&self) -> Vec<String> {
        self.resend_calls.lock().unwrap().clone()
    }
}

fn rejected((status, message, retry_after_secs): Failure) -> ApiError {
    ApiError::Rejected {
        status,
        code: None,
        message,
        retry_after_secs,
    }
}

#[async_trait]
impl VerificationApi for MockApi {
    async fn confirm(&self, token: &str) -> Result<ConfirmOutcome, ApiError> {
        self.confirm_calls.lock().unwrap().push(token.to_string());
        if let Some(failure) = self.confirm_failure.lock().unwrap().clone() {
            return Err(rejected(failure));
        }
        Ok(ConfirmOutcome {
            email: self.confirm_email.lock().unwrap().clone(),
        })
    }

    async fn resend(&self, email: &str) -> Result<String, ApiError> {
        self.resend_calls.lock().unwrap().push(email.to_string());
        let gate = self.resend_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(failure) = self.resend_failure.lock().unwrap().clone() {
            return Err(rejected(failure));
        }
        Ok(format!("Email sent to {email}"))
    }
}
