//! Repository for the `organizations` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{CreateOrganization, Organization, OrganizationWithOwner};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, character_id, parent_org_id, power_level, member_count, \
     location, motto, color, created_at";

/// Provides CRUD operations for organizations.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Insert a new organization, returning the created row.
    ///
    /// If `power_level` is `None`, defaults to 50. If `member_count` is
    /// `None`, defaults to 0.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganization,
    ) -> Result<Organization, sqlx::Error> {
        let query = format!(
            "INSERT INTO organizations
                (project_id, character_id, parent_org_id, power_level, member_count,
                 location, motto, color)
             VALUES ($1, $2, $3, COALESCE($4, 50), COALESCE($5, 0), $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(input.project_id)
            .bind(input.character_id)
            .bind(input.parent_org_id)
            .bind(input.power_level)
            .bind(input.member_count)
            .bind(&input.location)
            .bind(&input.motto)
            .bind(&input.color)
            .fetch_one(pool)
            .await
    }

    /// Find an organization by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all organizations for a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Organization>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM organizations WHERE project_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, Organization>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List a project's organizations joined with each owning
    /// character's name. Rows whose owning character is gone are
    /// excluded by the inner join.
    pub async fn list_with_owner(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<OrganizationWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, OrganizationWithOwner>(
            "SELECT o.id, o.parent_org_id, o.power_level, o.member_count, o.location,
                    o.motto, o.color, c.name AS character_name
             FROM organizations o
             JOIN characters c ON o.character_id = c.id
             WHERE o.project_id = $1
             ORDER BY o.id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Resolve an organization's owning character name.
    pub async fn find_owner_name(
        pool: &PgPool,
        org_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT c.name
             FROM organizations o
             JOIN characters c ON o.character_id = c.id
             WHERE o.id = $1",
        )
        .bind(org_id)
        .fetch_optional(pool)
        .await
    }
}
