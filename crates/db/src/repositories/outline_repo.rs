//! Repository for the `outlines` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::outline::{CreateOutline, Outline};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, content, structure, order_index, created_at";

/// Provides CRUD operations for outlines.
pub struct OutlineRepo;

impl OutlineRepo {
    /// Insert a new outline, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateOutline) -> Result<Outline, sqlx::Error> {
        let query = format!(
            "INSERT INTO outlines (project_id, title, content, structure, order_index)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Outline>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.structure)
            .bind(input.order_index)
            .fetch_one(pool)
            .await
    }

    /// List all outlines for a project, ordered by order index ascending.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Outline>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM outlines
             WHERE project_id = $1
             ORDER BY order_index ASC"
        );
        sqlx::query_as::<_, Outline>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch the outlines with the given IDs in one batched query.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Outline>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outlines WHERE id = ANY($1)");
        sqlx::query_as::<_, Outline>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
