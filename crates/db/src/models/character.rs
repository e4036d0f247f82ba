//! Character entity model and DTOs.
//!
//! Organizations are character rows with `is_organization` set; their
//! org-specific detail lives in the `organizations` table keyed back to
//! the character.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `characters` table. `traits` holds serialized JSON.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub is_organization: bool,
    pub role_type: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub appearance: Option<String>,
    pub traits: Option<String>,
    pub organization_type: Option<String>,
    pub organization_purpose: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacter {
    pub project_id: DbId,
    pub name: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    /// Defaults to false if omitted.
    pub is_organization: Option<bool>,
    pub role_type: Option<String>,
    pub personality: Option<String>,
    pub background: Option<String>,
    pub appearance: Option<String>,
    pub traits: Option<String>,
    pub organization_type: Option<String>,
    pub organization_purpose: Option<String>,
}
