//! Repository for the `themes` table.

use roomkey_core::types::DbId;
use sqlx::PgPool;

use crate::models::theme::{CreateTheme, Theme};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides operations for the theme catalog.
pub struct ThemeRepo;

impl ThemeRepo {
    /// Insert a new theme, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTheme) -> Result<Theme, sqlx::Error> {
        let query = format!(
            "INSERT INTO themes (name, description)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Theme>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a theme by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes WHERE id = $1");
        sqlx::query_as::<_, Theme>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all themes ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Theme>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM themes ORDER BY id ASC");
        sqlx::query_as::<_, Theme>(&query).fetch_all(pool).await
    }
}
