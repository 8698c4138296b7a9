use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app_error::{AppError, ErrorCode};
use crate::use_cases::email_verification::VerificationFailure;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        tracing::error!(error = ?self, "Request failed");

        let code = self.code();
        match self {
            AppError::Database(_) | AppError::Internal(_) => {
                error_resp(StatusCode::INTERNAL_SERVER_ERROR, code, None)
            }
            AppError::RateLimited => error_resp(StatusCode::TOO_MANY_REQUESTS, code, None),
            AppError::InvalidInput(msg) => error_resp(StatusCode::BAD_REQUEST, code, Some(msg)),
            AppError::Conflict(msg) => error_resp(StatusCode::CONFLICT, code, Some(msg)),
            AppError::NotFound => error_resp(StatusCode::NOT_FOUND, code, None),
            AppError::EmailDelivery(_) => error_resp(StatusCode::BAD_GATEWAY, code, None),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: Option<String>) -> Response {
    let body = match message {
        Some(msg) => serde_json::json!({ "code": code.as_str(), "message": msg }),
        None => serde_json::json!({ "code": code.as_str() }),
    };
    (status, Json(body)).into_response()
}

impl VerificationFailure {
    /// HTTP status and wire code for this failure.
    pub fn status(&self) -> (StatusCode, ErrorCode) {
        match self {
            VerificationFailure::TokenInvalidOrExpired => {
                (StatusCode::BAD_REQUEST, ErrorCode::InvalidToken)
            }
            VerificationFailure::UserNotFound => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
            VerificationFailure::DeliveryFailed(_) => {
                (StatusCode::BAD_GATEWAY, ErrorCode::DeliveryFailed)
            }
            VerificationFailure::CooldownActive { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, ErrorCode::RateLimited)
            }
            VerificationFailure::Unexpected(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::InternalError)
            }
        }
    }
}
