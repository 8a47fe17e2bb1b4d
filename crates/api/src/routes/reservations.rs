//! Route definitions for bookings and the waitlist, mounted at `/reservations`.
//!
//! ```text
//! GET    /               -> list_reservations
//! POST   /               -> create_reservation
//! GET    /my             -> my_reservations
//! POST   /waitlist       -> join_waitlist
//! DELETE /waitlist/{id}  -> cancel_reservation
//! DELETE /{id}           -> cancel_reservation
//! ```
//!
//! The two delete routes share one handler: cancelling a waitlist entry and
//! cancelling a booking have identical semantics, including the promotion
//! side effect.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::reservations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route("/my", get(reservations::my_reservations))
        .route("/waitlist", post(reservations::join_waitlist))
        .route("/waitlist/{id}", delete(reservations::cancel_reservation))
        .route("/{id}", delete(reservations::cancel_reservation))
}
