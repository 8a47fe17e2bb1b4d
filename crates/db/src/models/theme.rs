//! Escape-room theme model.

use roomkey_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `themes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Theme {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a theme row.
#[derive(Debug, Clone)]
pub struct CreateTheme {
    pub name: String,
    pub description: Option<String>,
}
