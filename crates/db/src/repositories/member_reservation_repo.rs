//! Repository for the `member_reservations` table: claims and the waitlist.

use roomkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::member_reservation::{
    CancellationOutcome, ClaimDetails, ClaimFilter, MemberReservation, ReservationStatus,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, member_id, reservation_id, status, created_at, updated_at";

/// Select list for the joined claim projection used by listing queries.
const DETAIL_SELECT: &str = "SELECT
        mr.id,
        mr.status,
        m.id AS member_id,
        m.name AS member_name,
        r.id AS reservation_id,
        r.date,
        t.id AS time_id,
        t.start_at,
        th.id AS theme_id,
        th.name AS theme_name
     FROM member_reservations mr
     JOIN members m ON m.id = mr.member_id
     JOIN reservations r ON r.id = mr.reservation_id
     JOIN reservation_times t ON t.id = r.time_id
     JOIN themes th ON th.id = r.theme_id";

/// Provides claim CRUD plus the atomic cancel-and-promote operation.
pub struct MemberReservationRepo;

impl MemberReservationRepo {
    /// Insert a new claim with the given status, returning the created row.
    ///
    /// The schema rejects a second claim by the same member on the same
    /// reservation and a second approved claim on any reservation; both
    /// surface as unique violations on `uq_`-prefixed constraints.
    pub async fn create(
        pool: &PgPool,
        member_id: DbId,
        reservation_id: DbId,
        status: ReservationStatus,
    ) -> Result<MemberReservation, sqlx::Error> {
        let query = format!(
            "INSERT INTO member_reservations (member_id, reservation_id, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MemberReservation>(&query)
            .bind(member_id)
            .bind(reservation_id)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Find a claim by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MemberReservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM member_reservations WHERE id = $1");
        sqlx::query_as::<_, MemberReservation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether the member already holds a claim of this kind on the
    /// reservation.
    pub async fn exists_same_kind(
        pool: &PgPool,
        member_id: DbId,
        reservation_id: DbId,
        status: ReservationStatus,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM member_reservations
                WHERE member_id = $1 AND reservation_id = $2 AND status = $3
             )",
        )
        .bind(member_id)
        .bind(reservation_id)
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Find the approved claim on a reservation, if any.
    pub async fn find_approved(
        pool: &PgPool,
        reservation_id: DbId,
    ) -> Result<Option<MemberReservation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM member_reservations
             WHERE reservation_id = $1 AND status = 'approved'"
        );
        sqlx::query_as::<_, MemberReservation>(&query)
            .bind(reservation_id)
            .fetch_optional(pool)
            .await
    }

    /// List claims matching the filter, joined with member/slot/theme data.
    ///
    /// Every filter dimension is optional and they compose conjunctively.
    /// Ordered by date ascending then claim ID ascending for determinism.
    pub async fn find_filtered(
        pool: &PgPool,
        filter: &ClaimFilter,
    ) -> Result<Vec<ClaimDetails>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE ($1::BIGINT IS NULL OR th.id = $1)
               AND ($2::BIGINT IS NULL OR m.id = $2)
               AND ($3::DATE IS NULL OR r.date >= $3)
               AND ($4::DATE IS NULL OR r.date <= $4)
               AND ($5::reservation_status IS NULL OR mr.status = $5)
             ORDER BY r.date ASC, mr.id ASC"
        );
        sqlx::query_as::<_, ClaimDetails>(&query)
            .bind(filter.theme_id)
            .bind(filter.member_id)
            .bind(filter.date_from)
            .bind(filter.date_to)
            .bind(filter.status)
            .fetch_all(pool)
            .await
    }

    /// List all of one member's claims, newest slot dates last.
    pub async fn list_for_member(
        pool: &PgPool,
        member_id: DbId,
    ) -> Result<Vec<ClaimDetails>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE mr.member_id = $1
             ORDER BY r.date ASC, mr.id ASC"
        );
        sqlx::query_as::<_, ClaimDetails>(&query)
            .bind(member_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a claim and promote the oldest pending claim on the same
    /// reservation when the deleted claim held the approved slot.
    ///
    /// Runs as one transaction serialized per slot: the parent reservation
    /// row is locked first, so cancellations racing on the same reservation
    /// queue up and each sees the others' committed outcome before picking
    /// a promotion candidate. A `LIMIT 1 FOR UPDATE` pick alone is not
    /// enough -- under READ COMMITTED the lock applies after the limit, so
    /// a candidate cancelled while the pick waits yields zero rows instead
    /// of falling through to the next pending claim. A failed promotion
    /// rolls the whole cancellation back.
    ///
    /// Returns `None` if the claim no longer exists.
    pub async fn delete_and_promote(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CancellationOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Unlocked read to learn which reservation the claim belongs to.
        let query = format!("SELECT {COLUMNS} FROM member_reservations WHERE id = $1");
        let claim = sqlx::query_as::<_, MemberReservation>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(claim) = claim else {
            return Ok(None);
        };

        // Serialize on the slot. Deleting the reservation row itself also
        // takes this lock, so cascade deletes queue up here too.
        sqlx::query("SELECT id FROM reservations WHERE id = $1 FOR UPDATE")
            .bind(claim.reservation_id)
            .execute(&mut *tx)
            .await?;

        // Re-read under the slot lock; the claim (and its status) may have
        // changed while we waited.
        let claim = sqlx::query_as::<_, MemberReservation>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(claim) = claim else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM member_reservations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let mut promoted = None;
        if claim.status == ReservationStatus::Approved {
            let query = format!(
                "UPDATE member_reservations
                 SET status = 'approved', updated_at = now()
                 WHERE id = (
                     SELECT id FROM member_reservations
                     WHERE reservation_id = $1 AND status = 'pending'
                     ORDER BY id ASC
                     LIMIT 1
                 )
                 RETURNING {COLUMNS}"
            );
            promoted = sqlx::query_as::<_, MemberReservation>(&query)
                .bind(claim.reservation_id)
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(ref next) = promoted {
                tracing::debug!(
                    claim_id = next.id,
                    reservation_id = claim.reservation_id,
                    "Promoted pending claim to approved"
                );
            }
        }

        tx.commit().await?;
        Ok(Some(CancellationOutcome {
            deleted: claim,
            promoted,
        }))
    }
}
