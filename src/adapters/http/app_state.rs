use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    infra::config::AppConfig,
    use_cases::{email_verification::EmailVerificationUseCases, user::SignupUseCases},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub verification_use_cases: Arc<EmailVerificationUseCases>,
    pub signup_use_cases: Arc<SignupUseCases>,
}

impl FromRef<AppState> for Arc<EmailVerificationUseCases> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.verification_use_cases.clone()
    }
}

impl FromRef<AppState> for Arc<SignupUseCases> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.signup_use_cases.clone()
    }
}
