//! Repository for the `generation_history` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::generation_history::{
    CreateGenerationHistory, GenerationHistory, HistoryWithChapter,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, chapter_id, prompt, generated_content, model, tokens_used, \
     generation_time, created_at";

/// Provides operations for generation-history records.
pub struct GenerationHistoryRepo;

impl GenerationHistoryRepo {
    /// Insert a new history record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGenerationHistory,
    ) -> Result<GenerationHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO generation_history
                (project_id, chapter_id, prompt, generated_content, model,
                 tokens_used, generation_time)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationHistory>(&query)
            .bind(input.project_id)
            .bind(input.chapter_id)
            .bind(&input.prompt)
            .bind(&input.generated_content)
            .bind(&input.model)
            .bind(input.tokens_used)
            .bind(input.generation_time)
            .fetch_one(pool)
            .await
    }

    /// List the most recent history records for a project, newest
    /// first, left-joined with their chapter titles, capped at `limit`.
    pub async fn list_recent_with_chapter(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
    ) -> Result<Vec<HistoryWithChapter>, sqlx::Error> {
        sqlx::query_as::<_, HistoryWithChapter>(
            "SELECT h.prompt, h.generated_content, h.model, h.tokens_used,
                    h.generation_time, h.created_at, c.title AS chapter_title
             FROM generation_history h
             LEFT JOIN chapters c ON h.chapter_id = c.id
             WHERE h.project_id = $1
             ORDER BY h.created_at DESC
             LIMIT $2",
        )
        .bind(project_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
