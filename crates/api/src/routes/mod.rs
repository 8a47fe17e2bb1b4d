pub mod admin;
pub mod catalog;
pub mod health;
pub mod reservations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reservations                      list (public), create booking (auth)
/// /reservations/{id}                 cancel claim (auth, owner or admin)
/// /reservations/my                   caller's claims with status (auth)
/// /reservations/waitlist             join waitlist (auth)
/// /reservations/waitlist/{id}        cancel waitlist entry (auth)
///
/// /themes                            list themes (public)
/// /times                             list time slots (public)
///
/// /admin/reservations                create booking for any member (admin)
/// /admin/reservations/{id}           delete reservation + claims (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reservations", reservations::router())
        .nest("/themes", catalog::themes_router())
        .nest("/times", catalog::times_router())
        .nest("/admin", admin::router())
}
