//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use chrono::{NaiveDate, NaiveDateTime};
use secrecy::SecretString;
use url::Url;
use uuid::Uuid;

use crate::{
    application::{
        email_token::{DEFAULT_TOKEN_TTL, EmailTokenCodec},
        use_cases::email_verification::DEFAULT_RESEND_COOLDOWN_SECS,
    },
    domain::entities::user::User,
    infra::config::AppConfig,
};

pub const TEST_TOKEN_SECRET: &str = "test-email-token-secret";

/// Create an unverified test user with sensible defaults.
pub fn create_test_user(overrides: impl FnOnce(&mut User)) -> User {
    let mut user = User {
        id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: format!("user-{}@example.com", Uuid::new_v4().simple()),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        email_verified_at: None,
        created_at: Some(test_datetime()),
    };
    overrides(&mut user);
    user
}

/// Token codec sharing the secret used by `TestAppStateBuilder`.
pub fn test_codec() -> EmailTokenCodec {
    EmailTokenCodec::new(
        SecretString::from(TEST_TOKEN_SECRET.to_string()),
        DEFAULT_TOKEN_TTL,
    )
}

/// Fixed datetime for reproducible tests.
pub fn test_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap()
}

/// Create a test config with sensible defaults.
pub fn test_config(overrides: impl FnOnce(&mut AppConfig)) -> AppConfig {
    let mut config = AppConfig {
        email_token_secret: SecretString::from(TEST_TOKEN_SECRET.to_string()),
        email_token_ttl: DEFAULT_TOKEN_TTL,
        resend_cooldown_secs: DEFAULT_RESEND_COOLDOWN_SECS,
        app_origin: Url::parse("http://localhost:3000").unwrap(),
        cors_origin: HeaderValue::from_static("http://localhost:3000"),
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
        database_url: String::new(),
        redis_url: String::new(),
        resend_api_key: SecretString::from("re_test".to_string()),
        email_from: "Verimail <noreply@verimail.test>".to_string(),
        trust_proxy: false,
    };
    overrides(&mut config);
    config
}
