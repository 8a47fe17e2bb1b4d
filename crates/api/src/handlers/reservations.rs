//! Handlers for bookings, the waitlist, and cancellation.
//!
//! Booking and waitlisting share one resolution pipeline: resolve the time
//! slot, theme, and member, get-or-create the reservation row for the
//! (date, time, theme) tuple, enforce the booking rules, insert the claim.
//! The only difference is the inserted status.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use roomkey_core::booking::validate_booking_date;
use roomkey_core::error::CoreError;
use roomkey_core::roles::ROLE_ADMIN;
use roomkey_core::types::DbId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use roomkey_db::models::member::Member;
use roomkey_db::models::member_reservation::{
    ClaimDetails, ClaimFilter, MemberReservation, ReservationStatus,
};
use roomkey_db::models::reservation::Reservation;
use roomkey_db::models::reservation_time::ReservationTime;
use roomkey_db::models::theme::Theme;
use roomkey_db::repositories::{
    MemberRepo, MemberReservationRepo, ReservationRepo, ReservationTimeRepo, ThemeRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /reservations` and `POST /reservations/waitlist`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub date: NaiveDate,
    #[validate(range(min = 1))]
    pub time_id: DbId,
    #[validate(range(min = 1))]
    pub theme_id: DbId,
}

/// Body for `POST /admin/reservations`: like a booking, but on behalf of
/// an explicitly named member.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateReservationRequest {
    #[validate(range(min = 1))]
    pub member_id: DbId,
    pub date: NaiveDate,
    #[validate(range(min = 1))]
    pub time_id: DbId,
    #[validate(range(min = 1))]
    pub theme_id: DbId,
}

/// Optional conjunctive filters for `GET /reservations`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReservationQueryParams {
    pub theme_id: Option<DbId>,
    pub member_id: Option<DbId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}

impl From<ReservationQueryParams> for ClaimFilter {
    fn from(params: ReservationQueryParams) -> Self {
        ClaimFilter {
            theme_id: params.theme_id,
            member_id: params.member_id,
            date_from: params.date_from,
            date_to: params.date_to,
            status: params.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberSummary {
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotSummary {
    pub id: DbId,
    pub start_at: NaiveTime,
}

#[derive(Debug, Serialize)]
pub struct ThemeSummary {
    pub id: DbId,
    pub name: String,
}

/// The claim projection returned by every reservation endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub member_reservation_id: DbId,
    pub status: ReservationStatus,
    pub date: NaiveDate,
    pub member: MemberSummary,
    pub time: TimeSlotSummary,
    pub theme: ThemeSummary,
}

impl From<ClaimDetails> for ReservationResponse {
    fn from(details: ClaimDetails) -> Self {
        ReservationResponse {
            member_reservation_id: details.id,
            status: details.status,
            date: details.date,
            member: MemberSummary {
                id: details.member_id,
                name: details.member_name,
            },
            time: TimeSlotSummary {
                id: details.time_id,
                start_at: details.start_at,
            },
            theme: ThemeSummary {
                id: details.theme_id,
                name: details.theme_name,
            },
        }
    }
}

impl ReservationResponse {
    fn from_parts(
        claim: &MemberReservation,
        reservation: &Reservation,
        member: Member,
        time: ReservationTime,
        theme: Theme,
    ) -> Self {
        ReservationResponse {
            member_reservation_id: claim.id,
            status: claim.status,
            date: reservation.date,
            member: MemberSummary {
                id: member.id,
                name: member.name,
            },
            time: TimeSlotSummary {
                id: time.id,
                start_at: time.start_at,
            },
            theme: ThemeSummary {
                id: theme.id,
                name: theme.name,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Shared claim-creation pipeline
// ---------------------------------------------------------------------------

/// Resolve all referenced entities, enforce the booking rules, and insert a
/// claim with the given status.
async fn create_claim(
    state: &AppState,
    member_id: DbId,
    date: NaiveDate,
    time_id: DbId,
    theme_id: DbId,
    status: ReservationStatus,
) -> AppResult<ReservationResponse> {
    let time = ReservationTimeRepo::find_by_id(&state.pool, time_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ReservationTime",
            id: time_id,
        }))?;
    let theme = ThemeRepo::find_by_id(&state.pool, theme_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Theme",
            id: theme_id,
        }))?;
    let member = MemberRepo::find_by_id(&state.pool, member_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Member",
            id: member_id,
        }))?;

    validate_booking_date(date, Utc::now().date_naive()).map_err(AppError::Core)?;

    let reservation = ReservationRepo::find_or_create(&state.pool, date, time.id, theme.id).await?;

    let duplicate =
        MemberReservationRepo::exists_same_kind(&state.pool, member.id, reservation.id, status)
            .await?;
    if duplicate {
        return Err(AppError::Core(CoreError::Conflict(
            "Duplicate reservation".into(),
        )));
    }

    // Booking a slot another member already holds is rejected up front with
    // a pointer to the waitlist. The partial unique index on approved claims
    // is the race-proof backstop.
    if status == ReservationStatus::Approved {
        if let Some(holder) =
            MemberReservationRepo::find_approved(&state.pool, reservation.id).await?
        {
            if holder.member_id != member.id {
                return Err(AppError::Core(CoreError::Conflict(
                    "Slot is already booked; join the waitlist instead".into(),
                )));
            }
        }
    }

    let claim =
        MemberReservationRepo::create(&state.pool, member.id, reservation.id, status).await?;

    tracing::info!(
        claim_id = claim.id,
        member_id = member.id,
        reservation_id = reservation.id,
        status = ?claim.status,
        "Claim created",
    );

    Ok(ReservationResponse::from_parts(
        &claim,
        &reservation,
        member,
        time,
        theme,
    ))
}

fn validation_error(err: validator::ValidationErrors) -> AppError {
    AppError::Core(CoreError::Validation(err.to_string()))
}

// ---------------------------------------------------------------------------
// Member endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/reservations
///
/// Public filtered listing of claims. All filters optional and conjunctive.
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(params): Query<ReservationQueryParams>,
) -> AppResult<impl IntoResponse> {
    let claims = MemberReservationRepo::find_filtered(&state.pool, &params.into()).await?;
    let data: Vec<ReservationResponse> = claims.into_iter().map(Into::into).collect();

    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/reservations
///
/// Create an approved booking for the authenticated member. Responds 201
/// with a Location header pointing at the created claim.
pub async fn create_reservation(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateReservationRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(validation_error)?;

    let response = create_claim(
        &state,
        caller.member_id,
        input.date,
        input.time_id,
        input.theme_id,
        ReservationStatus::Approved,
    )
    .await?;

    let location = format!("/api/v1/reservations/{}", response.member_reservation_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(DataResponse { data: response }),
    ))
}

/// POST /api/v1/reservations/waitlist
///
/// Join the waitlist for a slot: same pipeline as booking but the claim is
/// inserted as pending. Multiple pending claims per slot are allowed.
pub async fn join_waitlist(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateReservationRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(validation_error)?;

    let response = create_claim(
        &state,
        caller.member_id,
        input.date,
        input.time_id,
        input.theme_id,
        ReservationStatus::Pending,
    )
    .await?;

    Ok(Json(DataResponse { data: response }))
}

/// GET /api/v1/reservations/my
///
/// List the authenticated member's own claims, status included so the
/// caller can tell a booking from a waitlist entry.
pub async fn my_reservations(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let claims = MemberReservationRepo::list_for_member(&state.pool, caller.member_id).await?;
    let data: Vec<ReservationResponse> = claims.into_iter().map(Into::into).collect();

    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/reservations/{id} (also mounted at /reservations/waitlist/{id})
///
/// Cancel a claim. Only the claim's owner or an admin may cancel. When the
/// cancelled claim held the approved slot, the oldest pending claim on the
/// same reservation is promoted in the same transaction.
pub async fn cancel_reservation(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(claim_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let claim = MemberReservationRepo::find_by_id(&state.pool, claim_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MemberReservation",
            id: claim_id,
        }))?;

    if claim.member_id != caller.member_id && caller.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a reservation member".into(),
        )));
    }

    let outcome = MemberReservationRepo::delete_and_promote(&state.pool, claim_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MemberReservation",
            id: claim_id,
        }))?;

    tracing::info!(
        claim_id,
        member_id = caller.member_id,
        promoted_claim_id = outcome.promoted.as_ref().map(|c| c.id),
        "Claim cancelled",
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/reservations
///
/// Create an approved booking on behalf of any member.
pub async fn admin_create_reservation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<AdminCreateReservationRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate().map_err(validation_error)?;

    let response = create_claim(
        &state,
        input.member_id,
        input.date,
        input.time_id,
        input.theme_id,
        ReservationStatus::Approved,
    )
    .await?;

    tracing::info!(
        admin_id = admin.member_id,
        member_id = input.member_id,
        claim_id = response.member_reservation_id,
        "Admin created reservation on behalf of member",
    );

    let location = format!("/api/v1/reservations/{}", response.member_reservation_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(DataResponse { data: response }),
    ))
}

/// DELETE /api/v1/admin/reservations/{id}
///
/// Delete a reservation slot instance and every claim referencing it.
pub async fn admin_delete_reservation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(reservation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = ReservationRepo::delete(&state.pool, reservation_id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Reservation",
            id: reservation_id,
        }));
    }

    tracing::info!(
        reservation_id,
        admin_id = admin.member_id,
        "Reservation deleted with all claims",
    );

    Ok(StatusCode::NO_CONTENT)
}
