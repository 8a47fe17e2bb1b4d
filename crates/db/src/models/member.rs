//! Member entity model.
//!
//! Member rows are owned by the external auth subsystem; this service reads
//! them to resolve claim ownership. `CreateMember` exists for seeding
//! (tests, bootstrap scripts).

use roomkey_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a member row.
#[derive(Debug, Clone)]
pub struct CreateMember {
    pub name: String,
    pub email: String,
    pub role: String,
}
