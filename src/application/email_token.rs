use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::Duration;
use uuid::Uuid;

use crate::app_error::{AppError, AppResult};

/// Lifetime of a verification link.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(24);

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailTokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Why a verification token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,
}

/// Issues and checks the signed, time-limited tokens embedded in verification links.
///
/// Tokens are HS256 JWTs carrying `{sub, iat, exp}`. They are URL-safe and
/// stateless: nothing is stored server-side, so a token stays valid until it
/// expires or the secret is rotated.
#[derive(Clone)]
pub struct EmailTokenCodec {
    secret: SecretString,
    ttl: Duration,
}

impl EmailTokenCodec {
    pub fn new(secret: SecretString, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token as if the current unix time were `now`.
    pub fn issue_at(&self, user_id: Uuid, now: i64) -> AppResult<String> {
        let claims = EmailTokenClaims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.ttl.whole_seconds(),
        };
        let header = Header::new(Algorithm::HS256);
        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AppError::Internal(e.to_string()))
    }

    /// Check a token against the unix time `now`.
    ///
    /// A token is accepted up to and including its `exp` second; there is no leeway.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Uuid, TokenRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the caller's clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<EmailTokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenRejection::BadSignature,
            _ => TokenRejection::Malformed,
        })?;

        if now > data.claims.exp {
            return Err(TokenRejection::Expired);
        }

        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenRejection::Malformed)
    }
}
