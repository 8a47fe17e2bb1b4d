//! Repository for the `reservations` table.

use chrono::NaiveDate;
use roomkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::reservation::Reservation;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, date, time_id, theme_id, created_at, updated_at";

/// Provides operations for bookable slot instances.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Return the reservation for the (date, time, theme) tuple, creating it
    /// if none exists.
    ///
    /// Implemented as a conditional insert guarded by `uq_reservations_slot`
    /// rather than check-then-insert: when the insert returns no row the
    /// tuple already exists (possibly created by a concurrent request) and
    /// is re-fetched. Repeated calls for the same tuple return the same row.
    pub async fn find_or_create(
        pool: &PgPool,
        date: NaiveDate,
        time_id: DbId,
        theme_id: DbId,
    ) -> Result<Reservation, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservations (date, time_id, theme_id)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_reservations_slot DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Reservation>(&query)
            .bind(date)
            .bind(time_id)
            .bind(theme_id)
            .fetch_optional(pool)
            .await?;

        if let Some(reservation) = inserted {
            return Ok(reservation);
        }

        // Lost the insert race or the row predates this call; fetch it.
        let query = format!(
            "SELECT {COLUMNS} FROM reservations
             WHERE date = $1 AND time_id = $2 AND theme_id = $3"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(date)
            .bind(time_id)
            .bind(theme_id)
            .fetch_one(pool)
            .await
    }

    /// Find a reservation by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a reservation and, via `ON DELETE CASCADE`, every claim
    /// referencing it. Returns `false` if the ID does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
