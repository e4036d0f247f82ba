//! Repository for the `chapters` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::chapter::{Chapter, CreateChapter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, outline_id, title, content, summary, chapter_number, word_count, \
     status, sub_index, expansion_plan, created_at";

/// Provides CRUD operations for chapters.
pub struct ChapterRepo;

impl ChapterRepo {
    /// Insert a new chapter, returning the created row.
    ///
    /// If `word_count` is `None`, defaults to 0. If `status` is `None`,
    /// defaults to `draft`.
    pub async fn create(pool: &PgPool, input: &CreateChapter) -> Result<Chapter, sqlx::Error> {
        let query = format!(
            "INSERT INTO chapters
                (project_id, outline_id, title, content, summary, chapter_number,
                 word_count, status, sub_index, expansion_plan)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), COALESCE($8, 'draft'), $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(input.project_id)
            .bind(input.outline_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.summary)
            .bind(input.chapter_number)
            .bind(input.word_count)
            .bind(&input.status)
            .bind(input.sub_index)
            .bind(&input.expansion_plan)
            .fetch_one(pool)
            .await
    }

    /// Find a chapter by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Chapter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chapters WHERE id = $1");
        sqlx::query_as::<_, Chapter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all chapters for a project, ordered by chapter number ascending.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Chapter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chapters
             WHERE project_id = $1
             ORDER BY chapter_number ASC"
        );
        sqlx::query_as::<_, Chapter>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
