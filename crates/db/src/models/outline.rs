//! Outline entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `outlines` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Outline {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub structure: Option<String>,
    pub order_index: Option<i32>,
    pub created_at: Timestamp,
}

/// DTO for creating a new outline.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOutline {
    pub project_id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub structure: Option<String>,
    pub order_index: Option<i32>,
}
