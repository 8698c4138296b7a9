//! reqwest implementation of `VerificationApi`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use verimail_types::{ResendVerificationRequest, SendVerificationResponse, VerifyEmailResponse};

use crate::api::{ConfirmOutcome, VerificationApi};
use crate::error::ApiError;

/// Talks to a verimail server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVerificationApi {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpVerificationApi {
    /// `base_url` is the server origin, e.g. `https://app.example.com`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(base_url, http_client))
    }

    pub fn with_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http_client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<(u16, T), ApiError> {
    let status = response.status().as_u16();
    let text = response.text().await?;
    let body = serde_json::from_str(&text)
        .map_err(|e| ApiError::Decode(format!("status {status}: {e}")))?;
    Ok((status, body))
}

#[async_trait]
impl VerificationApi for HttpVerificationApi {
    async fn confirm(&self, token: &str) -> Result<ConfirmOutcome, ApiError> {
        let response = self
            .http_client
            .get(self.url("/verify-email"))
            .query(&[("token", token)])
            .send()
            .await?;

        let (status, body): (u16, VerifyEmailResponse) = read_body(response).await?;
        if (200..300).contains(&status) && body.success {
            return Ok(ConfirmOutcome { email: body.email });
        }

        Err(ApiError::Rejected {
            status,
            code: body.code,
            message: body
                .error
                .unwrap_or_else(|| "Failed to verify email".to_string()),
            retry_after_secs: None,
        })
    }

    async fn resend(&self, email: &str) -> Result<String, ApiError> {
        let response = self
            .http_client
            .post(self.url("/send-verification-email"))
            .json(&ResendVerificationRequest {
                email: email.to_string(),
            })
            .send()
            .await?;

        let (status, body): (u16, SendVerificationResponse) = read_body(response).await?;
        if (200..300).contains(&status) && body.success {
            return Ok(body
                .message
                .unwrap_or_else(|| format!("Email sent to {email}")));
        }

        Err(ApiError::Rejected {
            status,
            code: body.code,
            message: body
                .error
                .unwrap_or_else(|| "Failed to send verification email".to_string()),
            retry_after_secs: body.retry_after_secs,
        })
    }
}
