use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use sha2::{Digest, Sha256};

use crate::{
    app_error::{AppError, AppResult},
    application::validators::normalize_email,
    use_cases::email_verification::ResendCooldownStore,
};

/// Redis-backed resend cooldown shared by every API instance.
#[derive(Clone)]
pub struct RedisResendCooldownStore {
    manager: ConnectionManager,
}

impl RedisResendCooldownStore {
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    /// Addresses are hashed so they never appear in Redis keys.
    fn key(email: &str) -> String {
        let digest = Sha256::digest(normalize_email(email).as_bytes());
        format!("verify:cooldown:{}", hex::encode(digest))
    }
}

#[async_trait]
impl ResendCooldownStore for RedisResendCooldownStore {
    async fn try_acquire(&self, email: &str, cooldown_secs: u64) -> AppResult<Option<u64>> {
        let mut conn = self.manager.clone();
        let key = Self::key(email);

        let acquired: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(cooldown_secs.max(1))
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if acquired.is_some() {
            return Ok(None);
        }

        let ttl: i64 = conn
            .ttl(&key)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        // -2: expired between SET and TTL, -1: no expiry. Report a short wait either way.
        Ok(Some(ttl.max(1) as u64))
    }

    async fn release(&self, email: &str) -> AppResult<()> {
        let mut conn = self.manager.clone();
        let _: () = conn
            .del(Self::key(email))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok(())
    }
}
