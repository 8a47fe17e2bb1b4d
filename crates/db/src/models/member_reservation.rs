//! Claim models: one member's booking or waitlist entry on a reservation.

use chrono::{NaiveDate, NaiveTime};
use roomkey_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Claim status, mirroring the `reservation_status` Postgres enum.
///
/// `Approved` holds the slot; `Pending` waits for it. The schema allows at
/// most one approved claim per reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Approved,
    Pending,
}

/// A row from the `member_reservations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MemberReservation {
    pub id: DbId,
    pub member_id: DbId,
    pub reservation_id: DbId,
    pub status: ReservationStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A claim joined with its reservation, slot, theme, and member rows.
///
/// This is the flat projection behind every listing endpoint; the API layer
/// reshapes it into a nested response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClaimDetails {
    pub id: DbId,
    pub status: ReservationStatus,
    pub member_id: DbId,
    pub member_name: String,
    pub reservation_id: DbId,
    pub date: NaiveDate,
    pub time_id: DbId,
    pub start_at: NaiveTime,
    pub theme_id: DbId,
    pub theme_name: String,
}

/// Optional conjunctive filters for claim listings.
///
/// `None` in any field means "match all" for that dimension; the date range
/// is inclusive on both ends.
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub theme_id: Option<DbId>,
    pub member_id: Option<DbId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
}

/// Result of an atomic cancellation: the removed claim plus the pending
/// claim promoted in its place, if any.
#[derive(Debug, Clone)]
pub struct CancellationOutcome {
    pub deleted: MemberReservation,
    pub promoted: Option<MemberReservation>,
}
