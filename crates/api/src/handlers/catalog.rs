//! Public catalog browsing: themes and time slots.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use roomkey_db::repositories::{ReservationTimeRepo, ThemeRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/themes
///
/// List all escape-room themes.
pub async fn list_themes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let themes = ThemeRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: themes }))
}

/// GET /api/v1/times
///
/// List all bookable time slots, earliest first.
pub async fn list_times(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let times = ReservationTimeRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: times }))
}
