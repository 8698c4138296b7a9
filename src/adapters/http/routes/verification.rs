//! Email verification routes: confirm a token and resend a verification email.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use verimail_types::{ResendVerificationRequest, SendVerificationResponse, VerifyEmailResponse};

use crate::{
    adapters::http::{app_state::AppState, base_url::request_base_url},
    app_error::ErrorCode,
    application::validators::is_valid_email,
    use_cases::email_verification::VerificationFailure,
};

#[derive(Deserialize)]
struct VerifyEmailQuery {
    token: Option<String>,
}

/// GET /api/verify-email?token=...
async fn verify_email(
    State(app_state): State<AppState>,
    query: Result<Query<VerifyEmailQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected verify-email query");
            return verify_error(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidInput,
                "Invalid query string",
            );
        }
    };
    let Some(token) = query.token.filter(|t| !t.trim().is_empty()) else {
        return verify_error(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, "Missing token");
    };

    match app_state.verification_use_cases.confirm(token.trim()).await {
        Ok(confirmed) => (
            StatusCode::OK,
            Json(VerifyEmailResponse {
                success: true,
                email: Some(confirmed.email),
                ..Default::default()
            }),
        ),
        Err(failure) => {
            let (status, code) = failure.status();
            let message = match failure {
                VerificationFailure::Unexpected(_) => "Failed to verify email".to_string(),
                other => other.to_string(),
            };
            verify_error(status, code, &message)
        }
    }
}

fn verify_error(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> (StatusCode, Json<VerifyEmailResponse>) {
    (
        status,
        Json(VerifyEmailResponse {
            success: false,
            error: Some(message.to_string()),
            code: Some(code),
            ..Default::default()
        }),
    )
}

/// POST /api/send-verification-email
async fn send_verification_email(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ResendVerificationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected send-verification-email body");
            return send_error("Invalid request body");
        }
    };
    if !is_valid_email(&payload.email) {
        return send_error("Invalid email address");
    }

    let base_url = request_base_url(&app_state.config, &headers);
    match app_state
        .verification_use_cases
        .resend(&payload.email, &base_url)
        .await
    {
        Ok(sent) => (
            StatusCode::OK,
            Json(SendVerificationResponse {
                success: true,
                message: Some(format!("Email sent to {}", sent.email)),
                ..Default::default()
            }),
        ),
        Err(failure) => {
            let (status, code) = failure.status();
            let retry_after_secs = match &failure {
                VerificationFailure::CooldownActive { retry_after_secs } => {
                    Some(*retry_after_secs)
                }
                _ => None,
            };
            let (error, message) = match failure {
                VerificationFailure::DeliveryFailed(detail) => (
                    "Failed to send verification email".to_string(),
                    Some(detail),
                ),
                VerificationFailure::Unexpected(_) => {
                    ("Failed to send verification email".to_string(), None)
                }
                other => (other.to_string(), None),
            };
            (
                status,
                Json(SendVerificationResponse {
                    success: false,
                    message,
                    error: Some(error),
                    code: Some(code),
                    retry_after_secs,
                }),
            )
        }
    }
}

fn send_error(message: &str) -> (StatusCode, Json<SendVerificationResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(SendVerificationResponse {
            success: false,
            error: Some(message.to_string()),
            code: Some(ErrorCode::InvalidInput),
            ..Default::default()
        }),
    )
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/verify-email", get(verify_email))
        .route("/send-verification-email", post(send_verification_email))
}
