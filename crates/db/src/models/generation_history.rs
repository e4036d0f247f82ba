//! Generation history entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `generation_history` table. `chapter_id` goes NULL if
/// the chapter is later deleted; history is never dropped with it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationHistory {
    pub id: DbId,
    pub project_id: DbId,
    pub chapter_id: Option<DbId>,
    pub prompt: Option<String>,
    pub generated_content: Option<String>,
    pub model: Option<String>,
    pub tokens_used: Option<i32>,
    pub generation_time: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for creating a new generation-history record.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGenerationHistory {
    pub project_id: DbId,
    pub chapter_id: Option<DbId>,
    pub prompt: Option<String>,
    pub generated_content: Option<String>,
    pub model: Option<String>,
    pub tokens_used: Option<i32>,
    pub generation_time: Option<f64>,
}

/// History row left-joined with its chapter's title (absent when the
/// chapter is gone or was never linked).
#[derive(Debug, Clone, FromRow)]
pub struct HistoryWithChapter {
    pub prompt: Option<String>,
    pub generated_content: Option<String>,
    pub model: Option<String>,
    pub tokens_used: Option<i32>,
    pub generation_time: Option<f64>,
    pub created_at: Timestamp,
    pub chapter_title: Option<String>,
}
