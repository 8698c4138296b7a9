use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;
use url::Url;

pub struct AppConfig {
    /// HMAC key for verification tokens. Rotating it invalidates outstanding links.
    pub email_token_secret: SecretString,
    pub email_token_ttl: Duration,
    pub resend_cooldown_secs: u64,
    /// Fallback origin for verification links.
    pub app_origin: Url,
    pub cors_origin: HeaderValue,
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub redis_url: String,
    pub resend_api_key: SecretString,
    pub email_from: String,
    /// Build verification links from X-Forwarded-Proto and Host instead of APP_ORIGIN.
    /// Only enable this behind a reverse proxy that sets those headers.
    pub trust_proxy: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let email_token_secret = SecretString::new(get_env::<String>("EMAIL_TOKEN_SECRET").into());
        let email_token_ttl_hours: i64 = get_env_default("EMAIL_TOKEN_TTL_HOURS", 24);
        let resend_cooldown_secs: u64 = get_env_default("RESEND_COOLDOWN_SECS", 60);

        let app_origin: Url = get_env("APP_ORIGIN");
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");

        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3001)));
        let database_url: String = get_env("DATABASE_URL");
        let redis_url: String = get_env_default("REDIS_URL", "redis://127.0.0.1:6379".to_string());
        let resend_api_key = SecretString::new(get_env::<String>("RESEND_API_KEY").into());
        let email_from: String = get_env("EMAIL_FROM");
        // Default to false - must explicitly enable when behind a trusted proxy
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);

        Self {
            email_token_secret,
            email_token_ttl: Duration::hours(email_token_ttl_hours),
            resend_cooldown_secs,
            app_origin,
            cors_origin,
            bind_addr,
            database_url,
            redis_url,
            resend_api_key,
            email_from,
            trust_proxy,
        }
    }
}
