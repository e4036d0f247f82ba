//! Writing style entity model and DTOs.
//!
//! Styles are scoped to a user, not to a project; `(user_id, name)` is
//! unique.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `writing_styles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WritingStyle {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub style_type: Option<String>,
    pub preset_id: Option<String>,
    pub description: Option<String>,
    pub prompt_content: Option<String>,
    pub order_index: i32,
    pub created_at: Timestamp,
}

/// DTO for creating a new writing style.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWritingStyle {
    pub user_id: DbId,
    pub name: String,
    pub style_type: Option<String>,
    pub preset_id: Option<String>,
    pub description: Option<String>,
    pub prompt_content: Option<String>,
    /// Defaults to 0 if omitted.
    pub order_index: Option<i32>,
}
