//! Repository for the `prompt_templates` table (per-user overrides).

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::prompt_template::{CreatePromptTemplate, PromptTemplate};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, template_key, template_name, template_content, is_active, \
     created_at, updated_at";

/// Provides CRUD operations for prompt template overrides.
pub struct PromptTemplateRepo;

impl PromptTemplateRepo {
    /// Insert a new override, returning the created row.
    ///
    /// If `is_active` is `None`, defaults to true.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePromptTemplate,
    ) -> Result<PromptTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO prompt_templates
                (user_id, template_key, template_name, template_content, is_active)
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromptTemplate>(&query)
            .bind(input.user_id)
            .bind(&input.template_key)
            .bind(&input.template_name)
            .bind(&input.template_content)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a user's active override for a template key.
    pub async fn find_active(
        pool: &PgPool,
        user_id: DbId,
        template_key: &str,
    ) -> Result<Option<PromptTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompt_templates
             WHERE user_id = $1 AND template_key = $2 AND is_active = TRUE
             ORDER BY updated_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, PromptTemplate>(&query)
            .bind(user_id)
            .bind(template_key)
            .fetch_optional(pool)
            .await
    }

    /// List all of a user's overrides, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PromptTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prompt_templates
             WHERE user_id = $1
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, PromptTemplate>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Deactivate an override, restoring the built-in default for its
    /// key. Returns `true` if a row was deactivated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE prompt_templates SET is_active = FALSE, updated_at = NOW()
             WHERE id = $1 AND is_active = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
