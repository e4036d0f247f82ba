//! Organization membership entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `organization_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizationMember {
    pub id: DbId,
    pub organization_id: DbId,
    pub character_id: DbId,
    pub position: Option<String>,
    pub rank: i32,
    pub status: String,
    pub joined_at: Option<String>,
    pub loyalty: i32,
    pub contribution: i32,
    pub notes: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for creating a new organization member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganizationMember {
    pub organization_id: DbId,
    pub character_id: DbId,
    pub position: Option<String>,
    /// Defaults to 0 if omitted.
    pub rank: Option<i32>,
    /// Defaults to `active` if omitted.
    pub status: Option<String>,
    pub joined_at: Option<String>,
    /// Defaults to 50 if omitted.
    pub loyalty: Option<i32>,
    /// Defaults to 0 if omitted.
    pub contribution: Option<i32>,
    pub notes: Option<String>,
}

/// Membership row joined with the owning organization's character name.
/// The member's own character name is resolved with a separate per-row
/// lookup on the export path.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithOrganization {
    pub character_id: DbId,
    pub position: Option<String>,
    pub rank: i32,
    pub status: String,
    pub joined_at: Option<String>,
    pub loyalty: i32,
    pub contribution: i32,
    pub notes: Option<String>,
    pub organization_name: String,
}
