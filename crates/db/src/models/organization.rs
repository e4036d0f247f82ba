//! Organization entity model and DTOs.
//!
//! An organization row carries the org-specific detail for a character
//! flagged `is_organization`. Organizations form a tree through
//! `parent_org_id`.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub project_id: DbId,
    pub character_id: DbId,
    pub parent_org_id: Option<DbId>,
    pub power_level: i32,
    pub member_count: i32,
    pub location: Option<String>,
    pub motto: Option<String>,
    pub color: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new organization.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganization {
    pub project_id: DbId,
    pub character_id: DbId,
    pub parent_org_id: Option<DbId>,
    /// Defaults to 50 if omitted.
    pub power_level: Option<i32>,
    /// Defaults to 0 if omitted.
    pub member_count: Option<i32>,
    pub location: Option<String>,
    pub motto: Option<String>,
    pub color: Option<String>,
}

/// Organization row joined with its owning character's name.
#[derive(Debug, Clone, FromRow)]
pub struct OrganizationWithOwner {
    pub id: DbId,
    pub parent_org_id: Option<DbId>,
    pub power_level: i32,
    pub member_count: i32,
    pub location: Option<String>,
    pub motto: Option<String>,
    pub color: Option<String>,
    pub character_name: String,
}
