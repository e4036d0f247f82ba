//! Character relationship entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `character_relationships` table. Directed: `from` is
/// the relationship's source, `to` its target.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterRelationship {
    pub id: DbId,
    pub project_id: DbId,
    pub character_from_id: DbId,
    pub character_to_id: DbId,
    pub relationship_name: Option<String>,
    pub intimacy_level: i32,
    pub status: String,
    pub description: Option<String>,
    pub started_at: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new relationship.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRelationship {
    pub project_id: DbId,
    pub character_from_id: DbId,
    pub character_to_id: DbId,
    pub relationship_name: Option<String>,
    /// Defaults to 50 if omitted.
    pub intimacy_level: Option<i32>,
    /// Defaults to `active` if omitted.
    pub status: Option<String>,
    pub description: Option<String>,
    pub started_at: Option<String>,
}

/// Relationship row joined with its source character's name. The export
/// path resolves the target name with a separate per-row lookup.
#[derive(Debug, Clone, FromRow)]
pub struct RelationshipWithSource {
    pub character_to_id: DbId,
    pub relationship_name: Option<String>,
    pub intimacy_level: i32,
    pub status: String,
    pub description: Option<String>,
    pub started_at: Option<String>,
    pub source_name: String,
}
