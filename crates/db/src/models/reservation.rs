//! Bookable slot instance model.

use chrono::NaiveDate;
use roomkey_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reservations` table: one (date, time, theme) slot
/// instance, shared by every claim referencing it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub date: NaiveDate,
    pub time_id: DbId,
    pub theme_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
