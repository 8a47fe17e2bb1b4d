//! Admin route definitions, mounted at `/admin`.
//!
//! ```text
//! POST   /reservations       -> admin_create_reservation
//! DELETE /reservations/{id}  -> admin_delete_reservation
//! ```

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::reservations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/reservations",
            post(reservations::admin_create_reservation),
        )
        .route(
            "/reservations/{id}",
            delete(reservations::admin_delete_reservation),
        )
}
