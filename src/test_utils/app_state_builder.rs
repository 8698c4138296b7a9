//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` creates an `AppState` backed by in-memory
//! collaborators and hands those collaborators back for assertions.

use std::sync::Arc;

use crate::{
    adapters::http::app_state::AppState,
    domain::entities::user::User,
    infra::config::AppConfig,
    test_utils::{
        FixedClock, InMemoryCooldownStore, InMemoryEmailSender, InMemoryUserRepo, test_codec,
        test_config,
    },
    use_cases::{email_verification::EmailVerificationUseCases, user::SignupUseCases},
};

/// Handles to the in-memory collaborators behind a test `AppState`.
pub struct TestMocks {
    pub users: Arc<InMemoryUserRepo>,
    pub email: Arc<InMemoryEmailSender>,
    pub clock: Arc<FixedClock>,
}

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let user = create_test_user(|u| u.email = "ada@example.com".to_string());
///
/// let (app_state, mocks) = TestAppStateBuilder::new()
///     .with_user(user)
///     .build();
/// ```
pub struct TestAppStateBuilder {
    users: Vec<User>,
    config: AppConfig,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            config: test_config(|_| {}),
        }
    }

    /// Add a user to the test state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_config(mut self, overrides: impl FnOnce(&mut AppConfig)) -> Self {
        overrides(&mut self.config);
        self
    }

    /// Build the AppState with all configured mocks.
    pub fn build(self) -> (AppState, TestMocks) {
        let users = Arc::new(InMemoryUserRepo::with_users(self.users));
        let email = Arc::new(InMemoryEmailSender::new());
        let clock = Arc::new(FixedClock::default());
        let cooldown = Arc::new(InMemoryCooldownStore::new(clock.clone()));

        let verification_use_cases = EmailVerificationUseCases::new(
            users.clone(),
            email.clone(),
            cooldown,
            test_codec(),
            clock.clone(),
            self.config.resend_cooldown_secs,
        );
        let signup_use_cases = SignupUseCases::new(users.clone(), verification_use_cases.clone());

        let app_state = AppState {
            config: Arc::new(self.config),
            verification_use_cases: Arc::new(verification_use_cases),
            signup_use_cases: Arc::new(signup_use_cases),
        };

        (
            app_state,
            TestMocks {
                users,
                email,
                clock,
            },
        )
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
