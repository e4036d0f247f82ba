//! Repository for the `characters` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::character::{Character, CreateCharacter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, name, age, gender, is_organization, role_type, personality, \
     background, appearance, traits, organization_type, organization_purpose, created_at";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    ///
    /// If `is_organization` is `None`, defaults to false.
    pub async fn create(pool: &PgPool, input: &CreateCharacter) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters
                (project_id, name, age, gender, is_organization, role_type, personality,
                 background, appearance, traits, organization_type, organization_purpose)
             VALUES ($1, $2, $3, $4, COALESCE($5, FALSE), $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(input.project_id)
            .bind(&input.name)
            .bind(input.age)
            .bind(&input.gender)
            .bind(input.is_organization)
            .bind(&input.role_type)
            .bind(&input.personality)
            .bind(&input.background)
            .bind(&input.appearance)
            .bind(&input.traits)
            .bind(&input.organization_type)
            .bind(&input.organization_purpose)
            .fetch_one(pool)
            .await
    }

    /// Find a character by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all characters for a project in insertion order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters WHERE project_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
