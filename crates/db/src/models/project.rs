//! Project entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub genre: Option<String>,
    pub target_words: Option<i32>,
    pub current_words: i32,
    pub status: String,
    pub world_time_period: Option<String>,
    pub world_location: Option<String>,
    pub world_atmosphere: Option<String>,
    pub world_rules: Option<String>,
    pub chapter_count: Option<i32>,
    pub narrative_perspective: Option<String>,
    pub character_count: Option<i32>,
    pub outline_mode: String,
    pub wizard_step: i32,
    pub wizard_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub genre: Option<String>,
    pub target_words: Option<i32>,
    pub chapter_count: Option<i32>,
    pub narrative_perspective: Option<String>,
    /// Defaults to `one-to-many` if omitted.
    pub outline_mode: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub theme: Option<String>,
    pub genre: Option<String>,
    pub target_words: Option<i32>,
    pub status: Option<String>,
    pub narrative_perspective: Option<String>,
}
