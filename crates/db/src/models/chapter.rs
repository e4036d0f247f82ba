//! Chapter entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `chapters` table. `expansion_plan` holds serialized
/// JSON; the export path parses it back to structured data.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chapter {
    pub id: DbId,
    pub project_id: DbId,
    pub outline_id: Option<DbId>,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub chapter_number: Option<i32>,
    pub word_count: i32,
    pub status: String,
    pub sub_index: Option<i32>,
    pub expansion_plan: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new chapter.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChapter {
    pub project_id: DbId,
    pub outline_id: Option<DbId>,
    pub title: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    pub chapter_number: Option<i32>,
    /// Defaults to 0 if omitted.
    pub word_count: Option<i32>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
    pub sub_index: Option<i32>,
    pub expansion_plan: Option<String>,
}
