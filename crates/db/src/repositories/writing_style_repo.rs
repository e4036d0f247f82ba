//! Repository for the `writing_styles` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::writing_style::{CreateWritingStyle, WritingStyle};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, name, style_type, preset_id, description, prompt_content, \
     order_index, created_at";

/// Provides CRUD operations for user-scoped writing styles.
pub struct WritingStyleRepo;

impl WritingStyleRepo {
    /// Insert a new writing style, returning the created row.
    ///
    /// If `order_index` is `None`, defaults to 0. `(user_id, name)` is
    /// unique; inserting a duplicate name for the same user fails.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWritingStyle,
    ) -> Result<WritingStyle, sqlx::Error> {
        let query = format!(
            "INSERT INTO writing_styles
                (user_id, name, style_type, preset_id, description, prompt_content, order_index)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WritingStyle>(&query)
            .bind(input.user_id)
            .bind(&input.name)
            .bind(&input.style_type)
            .bind(&input.preset_id)
            .bind(&input.description)
            .bind(&input.prompt_content)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    /// List all custom styles for a user, ordered by order index ascending.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WritingStyle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM writing_styles
             WHERE user_id = $1
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, WritingStyle>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a user's style by name. Used for import deduplication.
    pub async fn find_by_user_and_name(
        pool: &PgPool,
        user_id: DbId,
        name: &str,
    ) -> Result<Option<WritingStyle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM writing_styles WHERE user_id = $1 AND name = $2"
        );
        sqlx::query_as::<_, WritingStyle>(&query)
            .bind(user_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
