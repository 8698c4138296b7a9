use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use verimail_types::{SignupRequest, SignupResponse};

use crate::{
    adapters::http::{app_state::AppState, base_url::request_base_url},
    use_cases::user::SignupError,
};

/// POST /api/signup
/// Creates an unverified account and emails its first verification link.
async fn signup(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SignupRequest>,
) -> Response {
    let base_url = request_base_url(&app_state.config, &headers);
    let result = app_state
        .signup_use_cases
        .sign_up(&payload.name, &payload.email, &payload.password, &base_url)
        .await;

    match result {
        Ok(user) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                success: true,
                message: Some(format!(
                    "Account created. Check {} for a verification link.",
                    user.email
                )),
                ..Default::default()
            }),
        )
            .into_response(),
        Err(SignupError::Validation(errors)) => {
            signup_error(StatusCode::BAD_REQUEST, errors).into_response()
        }
        Err(SignupError::EmailTaken) => signup_error(
            StatusCode::CONFLICT,
            field_error("email", SignupError::EmailTaken.to_string()),
        )
        .into_response(),
        Err(SignupError::VerificationEmail(failure)) => {
            let (status, _) = failure.status();
            signup_error(
                status,
                field_error("general", "Failed to send verification email".into()),
            )
            .into_response()
        }
        Err(SignupError::App(err)) => err.into_response(),
    }
}

fn field_error(field: &str, message: String) -> HashMap<String, Vec<String>> {
    HashMap::from([(field.to_string(), vec![message])])
}

fn signup_error(
    status: StatusCode,
    errors: HashMap<String, Vec<String>>,
) -> (StatusCode, Json<SignupResponse>) {
    (
        status,
        Json(SignupResponse {
            success: false,
            errors,
            ..Default::default()
        }),
    )
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/signup", post(signup))
}
