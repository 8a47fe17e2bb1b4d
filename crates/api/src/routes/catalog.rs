//! Route definitions for the public catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Theme catalog routes mounted at `/themes`.
pub fn themes_router() -> Router<AppState> {
    Router::new().route("/", get(catalog::list_themes))
}

/// Time-slot catalog routes mounted at `/times`.
pub fn times_router() -> Router<AppState> {
    Router::new().route("/", get(catalog::list_times))
}
