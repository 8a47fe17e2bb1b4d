//! Repository for the `members` table.
//!
//! Member rows are written by the external auth subsystem; `create` exists
//! for seeding and tests.

use roomkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::{CreateMember, Member};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, role, created_at, updated_at";

/// Provides read (and seed-time write) operations for members.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a new member row, returning it.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (name, email, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a member by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
