use std::fs::File;
use std::sync::Arc;

use redis::aio::ConnectionManager;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{email::resend::ResendEmailSender, http::app_state::AppState},
    application::{clock::SystemClock, email_token::EmailTokenCodec},
    infra::{
        config::AppConfig, cooldown::RedisResendCooldownStore, error::InfraError, http_client,
        postgres_persistence,
    },
    use_cases::{
        email_verification::EmailVerificationUseCases,
        user::{SignupUseCases, UserRepo},
    },
};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env();

    let postgres_arc = Arc::new(postgres_persistence(&config.database_url).await?);
    let user_repo_arc = postgres_arc as Arc<dyn UserRepo>;

    let redis = redis::Client::open(config.redis_url.as_str())
        .map_err(InfraError::RedisConnection)?;
    let manager = ConnectionManager::new(redis)
        .await
        .map_err(InfraError::RedisConnection)?;
    let cooldown = Arc::new(RedisResendCooldownStore::new(manager));

    let email = Arc::new(ResendEmailSender::new(
        http_client::build_client().map_err(InfraError::HttpClient)?,
        config.resend_api_key.clone(),
        config.email_from.clone(),
    ));

    let codec = EmailTokenCodec::new(config.email_token_secret.clone(), config.email_token_ttl);

    let verification_use_cases = EmailVerificationUseCases::new(
        user_repo_arc.clone(),
        email,
        cooldown,
        codec,
        Arc::new(SystemClock),
        config.resend_cooldown_secs,
    );

    let signup_use_cases = SignupUseCases::new(user_repo_arc, verification_use_cases.clone());

    Ok(AppState {
        config: Arc::new(config),
        verification_use_cases: Arc::new(verification_use_cases),
        signup_use_cases: Arc::new(signup_use_cases),
    })
}

pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "verimail=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don't show target (module path)
        .with_level(true)
        .pretty();

    // File (structured JSON logs)
    let file = File::create("app.log")?;
    let json_layer = fmt::layer()
        .json()
        .with_writer(file)
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
