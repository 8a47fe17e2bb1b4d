//! End-to-end tests for the reservation API.
//!
//! Each test runs against a freshly migrated database and the full
//! middleware stack. Members, themes, and time slots are seeded directly
//! through the repository layer (member rows normally come from the
//! external auth subsystem).

mod common;

use axum::http::{header, Method, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveTime, Utc};
use roomkey_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use serde_json::json;
use sqlx::PgPool;

use roomkey_db::models::member::{CreateMember, Member};
use roomkey_db::models::reservation_time::{CreateReservationTime, ReservationTime};
use roomkey_db::models::theme::{CreateTheme, Theme};
use roomkey_db::repositories::{MemberRepo, ReservationRepo, ReservationTimeRepo, ThemeRepo};

use common::{bearer, build_test_app, send, send_json};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_member(pool: &PgPool, name: &str, role: &str) -> Member {
    MemberRepo::create(
        pool,
        &CreateMember {
            name: name.to_string(),
            email: format!("{name}@roomkey.test"),
            role: role.to_string(),
        },
    )
    .await
    .expect("member insert should succeed")
}

async fn seed_catalog(pool: &PgPool) -> (ReservationTime, Theme) {
    let time = ReservationTimeRepo::create(
        pool,
        &CreateReservationTime {
            start_at: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        },
    )
    .await
    .unwrap();
    let theme = ThemeRepo::create(
        pool,
        &CreateTheme {
            name: "vault".to_string(),
            description: Some("Break out of the bank vault".to_string()),
        },
    )
    .await
    .unwrap();
    (time, theme)
}

fn booking_body(date: &str, time_id: i64, theme_id: i64) -> serde_json::Value {
    json!({ "date": date, "timeId": time_id, "themeId": theme_id })
}

async fn book(
    app: &Router,
    auth: &str,
    date: &str,
    time_id: i64,
    theme_id: i64,
) -> (StatusCode, serde_json::Value) {
    send_json(
        app,
        Method::POST,
        "/api/v1/reservations",
        Some(auth),
        Some(booking_body(date, time_id, theme_id)),
    )
    .await
}

async fn join_waitlist(
    app: &Router,
    auth: &str,
    date: &str,
    time_id: i64,
    theme_id: i64,
) -> (StatusCode, serde_json::Value) {
    send_json(
        app,
        Method::POST,
        "/api/v1/reservations/waitlist",
        Some(auth),
        Some(booking_body(date, time_id, theme_id)),
    )
    .await
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_returns_201_with_location(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let auth = bearer(member.id, &member.role);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/reservations",
        Some(&auth),
        Some(booking_body("2100-04-18", time.id, theme.id)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("Location header must be present")
        .to_str()
        .unwrap()
        .to_string();

    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let claim = &body["data"];

    assert_eq!(
        location,
        format!("/api/v1/reservations/{}", claim["memberReservationId"])
    );
    assert_eq!(claim["status"], "approved");
    assert_eq!(claim["date"], "2100-04-18");
    assert_eq!(claim["member"]["name"], "choco");
    assert_eq!(claim["time"]["id"], time.id);
    assert_eq!(claim["theme"]["name"], "vault");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_without_token_returns_401(pool: PgPool) {
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/reservations",
        None,
        Some(booking_body("2100-04-18", time.id, theme.id)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_past_date_returns_400(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let auth = bearer(member.id, &member.role);

    let (status, body) = book(&app, &auth, "2000-01-01", time.id, theme.id).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_today_is_allowed(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let auth = bearer(member.id, &member.role);

    let today = Utc::now().date_naive().to_string();
    let (status, _) = book(&app, &auth, &today, time.id, theme.id).await;

    assert_eq!(status, StatusCode::CREATED, "date == today is not past");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_booking_returns_409(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let auth = bearer(member.id, &member.role);

    let (first, _) = book(&app, &auth, "2100-04-18", time.id, theme.id).await;
    assert_eq!(first, StatusCode::CREATED);

    let (second, body) = book(&app, &auth, "2100-04-18", time.id, theme.id).await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_taken_slot_returns_409(pool: PgPool) {
    let choco = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let clover = seed_member(&pool, "clover", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);

    let (status, _) = book(
        &app,
        &bearer(choco.id, &choco.role),
        "2100-04-18",
        time.id,
        theme.id,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Another member booking the same slot through the booking endpoint is
    // rejected and pointed at the waitlist.
    let (status, body) = book(
        &app,
        &bearer(clover.id, &clover.role),
        "2100-04-18",
        time.id,
        theme.id,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("waitlist"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_booking_unknown_theme_returns_404(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let (time, _) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let auth = bearer(member.id, &member.role);

    let (status, body) = book(&app, &auth, "2100-04-18", time.id, 9999).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Theme with id 9999 not found");
}

// ---------------------------------------------------------------------------
// Waitlist and promotion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_waitlist_creates_pending_claim(pool: PgPool) {
    let choco = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let clover = seed_member(&pool, "clover", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);

    let (status, _) = book(
        &app,
        &bearer(choco.id, &choco.role),
        "2100-04-18",
        time.id,
        theme.id,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = join_waitlist(
        &app,
        &bearer(clover.id, &clover.role),
        "2100-04-18",
        time.id,
        theme.id,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["member"]["name"], "clover");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_waitlist_on_unbooked_slot_is_allowed(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let auth = bearer(member.id, &member.role);

    // Nobody has booked the slot; joining the waitlist still works and the
    // claim stays pending rather than taking the slot.
    let (status, body) = join_waitlist(&app, &auth, "2100-04-18", time.id, theme.id).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");

    let (_, body) = send_json(
        &app,
        Method::GET,
        "/api/v1/reservations?status=approved",
        None,
        None,
    )
    .await;
    assert_eq!(
        body["data"].as_array().unwrap().len(),
        0,
        "the slot must have no approved holder"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cancellation_promotes_waitlisted_member(pool: PgPool) {
    let choco = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let clover = seed_member(&pool, "clover", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let choco_auth = bearer(choco.id, &choco.role);
    let clover_auth = bearer(clover.id, &clover.role);

    // Member A books, member B waitlists the same tuple.
    let (_, booked) = book(&app, &choco_auth, "2100-04-18", time.id, theme.id).await;
    let claim_id = booked["data"]["memberReservationId"].as_i64().unwrap();

    let (status, _) = join_waitlist(&app, &clover_auth, "2100-04-18", time.id, theme.id).await;
    assert_eq!(status, StatusCode::OK);

    // Member A cancels; member B's claim becomes approved.
    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/reservations/{claim_id}"),
        Some(&choco_auth),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, body) = send_json(
        &app,
        Method::GET,
        "/api/v1/reservations/my",
        Some(&clover_auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let claims = body["data"].as_array().unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["status"], "approved");

    // No pending claims remain for the slot.
    let (_, body) = send_json(
        &app,
        Method::GET,
        "/api/v1/reservations?status=pending",
        None,
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cancel_waitlist_entry_does_not_promote(pool: PgPool) {
    let choco = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let clover = seed_member(&pool, "clover", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let choco_auth = bearer(choco.id, &choco.role);
    let clover_auth = bearer(clover.id, &clover.role);

    book(&app, &choco_auth, "2100-04-18", time.id, theme.id).await;
    let (_, waitlisted) = join_waitlist(&app, &clover_auth, "2100-04-18", time.id, theme.id).await;
    let waitlist_id = waitlisted["data"]["memberReservationId"].as_i64().unwrap();

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/reservations/waitlist/{waitlist_id}"),
        Some(&clover_auth),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Member A's booking is untouched.
    let (_, body) = send_json(
        &app,
        Method::GET,
        "/api/v1/reservations/my",
        Some(&choco_auth),
        None,
    )
    .await;
    let claims = body["data"].as_array().unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["status"], "approved");
}

// ---------------------------------------------------------------------------
// Cancellation authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cancel_other_members_claim_is_forbidden(pool: PgPool) {
    let choco = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let clover = seed_member(&pool, "clover", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);

    let (_, booked) = book(
        &app,
        &bearer(choco.id, &choco.role),
        "2100-04-18",
        time.id,
        theme.id,
    )
    .await;
    let claim_id = booked["data"]["memberReservationId"].as_i64().unwrap();

    let (status, body) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/v1/reservations/{claim_id}"),
        Some(&bearer(clover.id, &clover.role)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_can_cancel_any_claim(pool: PgPool) {
    let choco = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let admin = seed_member(&pool, "warden", ROLE_ADMIN).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);

    let (_, booked) = book(
        &app,
        &bearer(choco.id, &choco.role),
        "2100-04-18",
        time.id,
        theme.id,
    )
    .await;
    let claim_id = booked["data"]["memberReservationId"].as_i64().unwrap();

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/reservations/{claim_id}"),
        Some(&bearer(admin.id, &admin.role)),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_cancel_missing_claim_returns_404(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let app = build_test_app(pool);

    let (status, body) = send_json(
        &app,
        Method::DELETE,
        "/api/v1/reservations/424242",
        Some(&bearer(member.id, &member.role)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Listing and filters
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_listing_is_public_and_filters_compose(pool: PgPool) {
    let choco = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let clover = seed_member(&pool, "clover", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let other_theme = ThemeRepo::create(
        &pool,
        &CreateTheme {
            name: "asylum".to_string(),
            description: None,
        },
    )
    .await
    .unwrap();
    let app = build_test_app(pool);

    book(
        &app,
        &bearer(choco.id, &choco.role),
        "2100-04-18",
        time.id,
        theme.id,
    )
    .await;
    book(
        &app,
        &bearer(clover.id, &clover.role),
        "2100-04-18",
        time.id,
        other_theme.id,
    )
    .await;

    // Unfiltered: both claims, no auth required.
    let (status, body) = send_json(&app, Method::GET, "/api/v1/reservations", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // themeId + memberId compose conjunctively.
    let uri = format!(
        "/api/v1/reservations?themeId={}&memberId={}",
        theme.id, choco.id
    );
    let (_, body) = send_json(&app, Method::GET, &uri, None, None).await;
    let claims = body["data"].as_array().unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["member"]["name"], "choco");
    assert_eq!(claims[0]["theme"]["name"], "vault");

    // Mismatched conjunction returns nothing.
    let uri = format!(
        "/api/v1/reservations?themeId={}&memberId={}",
        other_theme.id, choco.id
    );
    let (_, body) = send_json(&app, Method::GET, &uri, None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_date_range_filter_is_inclusive(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);
    let auth = bearer(member.id, &member.role);

    book(&app, &auth, "2100-04-18", time.id, theme.id).await;

    let (_, body) = send_json(
        &app,
        Method::GET,
        "/api/v1/reservations?dateFrom=2100-04-18&dateTo=2100-04-18",
        None,
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send_json(
        &app,
        Method::GET,
        "/api/v1/reservations?dateFrom=2100-04-19",
        None,
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_creates_reservation_for_member(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let admin = seed_member(&pool, "warden", ROLE_ADMIN).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/reservations",
        Some(&bearer(admin.id, &admin.role)),
        Some(json!({
            "memberId": member.id,
            "date": "2100-04-18",
            "timeId": time.id,
            "themeId": theme.id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["member"]["id"], member.id);
    assert_eq!(body["data"]["status"], "approved");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_routes_reject_regular_members(pool: PgPool) {
    let member = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/v1/admin/reservations",
        Some(&bearer(member.id, &member.role)),
        Some(json!({
            "memberId": member.id,
            "date": "2100-04-18",
            "timeId": time.id,
            "themeId": theme.id,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_delete_reservation_removes_claims(pool: PgPool) {
    let choco = seed_member(&pool, "choco", ROLE_MEMBER).await;
    let admin = seed_member(&pool, "warden", ROLE_ADMIN).await;
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool.clone());
    let admin_auth = bearer(admin.id, &admin.role);

    book(
        &app,
        &bearer(choco.id, &choco.role),
        "2100-04-18",
        time.id,
        theme.id,
    )
    .await;

    // find_or_create is idempotent, so this resolves the same reservation
    // row the booking created.
    let reservation = ReservationRepo::find_or_create(
        &pool,
        NaiveDate::from_ymd_opt(2100, 4, 18).unwrap(),
        time.id,
        theme.id,
    )
    .await
    .unwrap();

    let response = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/admin/reservations/{}", reservation.id),
        Some(&admin_auth),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Claims went with the reservation.
    let (_, body) = send_json(&app, Method::GET, "/api/v1/reservations", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // Deleting again reports not found.
    let (status, _) = send_json(
        &app,
        Method::DELETE,
        &format!("/api/v1/admin/reservations/{}", reservation.id),
        Some(&admin_auth),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_catalog_listings_are_public(pool: PgPool) {
    let (time, theme) = seed_catalog(&pool).await;
    let app = build_test_app(pool);

    let (status, body) = send_json(&app, Method::GET, "/api/v1/themes", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let themes = body["data"].as_array().unwrap();
    assert_eq!(themes.len(), 1);
    assert_eq!(themes[0]["id"], theme.id);
    assert_eq!(themes[0]["name"], "vault");

    let (status, body) = send_json(&app, Method::GET, "/api/v1/times", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let times = body["data"].as_array().unwrap();
    assert_eq!(times.len(), 1);
    assert_eq!(times[0]["id"], time.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_endpoint(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send_json(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
