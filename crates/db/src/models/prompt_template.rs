//! Per-user prompt template override model and DTOs.
//!
//! An active row for `(user_id, template_key)` shadows the built-in
//! template of the same key; deactivating it restores the default.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `prompt_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PromptTemplate {
    pub id: DbId,
    pub user_id: DbId,
    pub template_key: String,
    pub template_name: String,
    pub template_content: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new template override.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromptTemplate {
    pub user_id: DbId,
    pub template_key: String,
    pub template_name: String,
    pub template_content: String,
    /// Defaults to true if omitted.
    pub is_active: Option<bool>,
}
