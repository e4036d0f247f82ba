//! Repository for the `character_relationships` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::relationship::{
    CharacterRelationship, CreateRelationship, RelationshipWithSource,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, character_from_id, character_to_id, relationship_name, \
     intimacy_level, status, description, started_at, created_at";

/// Provides CRUD operations for character relationships.
pub struct RelationshipRepo;

impl RelationshipRepo {
    /// Insert a new relationship, returning the created row.
    ///
    /// If `intimacy_level` is `None`, defaults to 50. If `status` is
    /// `None`, defaults to `active`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRelationship,
    ) -> Result<CharacterRelationship, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_relationships
                (project_id, character_from_id, character_to_id, relationship_name,
                 intimacy_level, status, description, started_at)
             VALUES ($1, $2, $3, $4, COALESCE($5, 50), COALESCE($6, 'active'), $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterRelationship>(&query)
            .bind(input.project_id)
            .bind(input.character_from_id)
            .bind(input.character_to_id)
            .bind(&input.relationship_name)
            .bind(input.intimacy_level)
            .bind(&input.status)
            .bind(&input.description)
            .bind(&input.started_at)
            .fetch_one(pool)
            .await
    }

    /// List all relationships for a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CharacterRelationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_relationships WHERE project_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, CharacterRelationship>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List a project's relationships joined with each source
    /// character's name. Targets are resolved separately by the caller.
    pub async fn list_with_source(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<RelationshipWithSource>, sqlx::Error> {
        sqlx::query_as::<_, RelationshipWithSource>(
            "SELECT r.character_to_id, r.relationship_name, r.intimacy_level, r.status,
                    r.description, r.started_at, c.name AS source_name
             FROM character_relationships r
             JOIN characters c ON r.character_from_id = c.id
             WHERE r.project_id = $1
             ORDER BY r.id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
