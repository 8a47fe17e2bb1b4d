//! Reservation time-slot model.

use chrono::NaiveTime;
use roomkey_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reservation_times` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReservationTime {
    pub id: DbId,
    pub start_at: NaiveTime,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a time slot.
#[derive(Debug, Clone)]
pub struct CreateReservationTime {
    pub start_at: NaiveTime,
}
