//! Repository for the `reservation_times` table.

use roomkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::reservation_time::{CreateReservationTime, ReservationTime};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, start_at, created_at, updated_at";

/// Provides operations for the time-slot catalog.
pub struct ReservationTimeRepo;

impl ReservationTimeRepo {
    /// Insert a new time slot, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateReservationTime,
    ) -> Result<ReservationTime, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservation_times (start_at)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReservationTime>(&query)
            .bind(input.start_at)
            .fetch_one(pool)
            .await
    }

    /// Find a time slot by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReservationTime>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservation_times WHERE id = $1");
        sqlx::query_as::<_, ReservationTime>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all time slots ordered by start time ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<ReservationTime>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservation_times ORDER BY start_at ASC");
        sqlx::query_as::<_, ReservationTime>(&query)
            .fetch_all(pool)
            .await
    }
}
