//! Repository for the `organization_members` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization_member::{
    CreateOrganizationMember, MemberWithOrganization, OrganizationMember,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, organization_id, character_id, position, rank, status, joined_at, \
     loyalty, contribution, notes, created_at";

/// Provides CRUD operations for organization members.
pub struct OrganizationMemberRepo;

impl OrganizationMemberRepo {
    /// Insert a new membership, returning the created row.
    ///
    /// `rank` and `contribution` default to 0, `loyalty` to 50, and
    /// `status` to `active` when omitted.
    pub async fn create(
        pool: &PgPool,
        input: &CreateOrganizationMember,
    ) -> Result<OrganizationMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO organization_members
                (organization_id, character_id, position, rank, status, joined_at,
                 loyalty, contribution, notes)
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, 'active'), $6,
                     COALESCE($7, 50), COALESCE($8, 0), $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(input.organization_id)
            .bind(input.character_id)
            .bind(&input.position)
            .bind(input.rank)
            .bind(&input.status)
            .bind(&input.joined_at)
            .bind(input.loyalty)
            .bind(input.contribution)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List all memberships of a project's organizations.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<OrganizationMember>, sqlx::Error> {
        let query = format!(
            "SELECT m.id, m.organization_id, m.character_id, m.position, m.rank, m.status,
                    m.joined_at, m.loyalty, m.contribution, m.notes, m.created_at
             FROM organization_members m
             JOIN organizations o ON m.organization_id = o.id
             WHERE o.project_id = $1
             ORDER BY m.id ASC"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List a project's memberships joined with the owning
    /// organization's character name. Each member's own character name
    /// is resolved separately by the caller.
    pub async fn list_with_organization(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<MemberWithOrganization>, sqlx::Error> {
        sqlx::query_as::<_, MemberWithOrganization>(
            "SELECT m.character_id, m.position, m.rank, m.status, m.joined_at,
                    m.loyalty, m.contribution, m.notes, c.name AS organization_name
             FROM organization_members m
             JOIN organizations o ON m.organization_id = o.id
             JOIN characters c ON o.character_id = c.id
             WHERE o.project_id = $1
             ORDER BY m.id ASC",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}
