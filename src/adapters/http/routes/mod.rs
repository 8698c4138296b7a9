pub mod signup;
pub mod verification;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(verification::router())
        .merge(signup::router())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
