//! Health check route, mounted at the root level (not under `/api/v1`).

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::error::AppResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// GET /health
///
/// 200 when the server is up and the database answers.
async fn health(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    roomkey_db::health_check(&state.pool).await?;

    Ok(Json(json!({ "status": "ok" })))
}
