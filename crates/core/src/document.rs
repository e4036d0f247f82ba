//! The portable project document: the JSON payload produced by export
//! and consumed by import.
//!
//! Cross-entity references inside the document are carried by name or
//! title, never by database id. A fresh set of ids is minted on every
//! import, so the document must stay resolvable with nothing but the
//! natural keys it ships.
//!
//! Deserialization is deliberately lenient: every collection defaults to
//! empty, the project block is optional, and unknown fields are ignored.
//! A candidate document always parses; [`crate::validation`] decides
//! whether it is importable.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Format version written by the exporter. A mismatch on import is a
/// warning, not an error.
pub const SUPPORTED_VERSION: &str = "1.0.0";

/// Number of generation-history records exported per project, newest
/// first. Fixed; the export format offers no pagination.
pub const GENERATION_HISTORY_EXPORT_CAP: i64 = 100;

fn default_intimacy() -> i32 {
    50
}

fn default_power_level() -> i32 {
    50
}

fn default_loyalty() -> i32 {
    50
}

fn default_active_status() -> String {
    "active".to_string()
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Complete export/import payload for one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub export_time: Option<Timestamp>,
    #[serde(default)]
    pub project: Option<ProjectRecord>,
    #[serde(default)]
    pub chapters: Vec<ChapterRecord>,
    #[serde(default)]
    pub characters: Vec<CharacterRecord>,
    #[serde(default)]
    pub outlines: Vec<OutlineRecord>,
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
    #[serde(default)]
    pub organizations: Vec<OrganizationRecord>,
    #[serde(default)]
    pub organization_members: Vec<OrganizationMemberRecord>,
    #[serde(default)]
    pub writing_styles: Vec<WritingStyleRecord>,
    #[serde(default)]
    pub generation_history: Vec<GenerationHistoryRecord>,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Scalar project fields. The owning user id is informational only: the
/// importer always re-homes the project under the importing user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub target_words: Option<i32>,
    #[serde(default)]
    pub current_words: Option<i32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub world_time_period: Option<String>,
    #[serde(default)]
    pub world_location: Option<String>,
    #[serde(default)]
    pub world_atmosphere: Option<String>,
    #[serde(default)]
    pub world_rules: Option<String>,
    #[serde(default)]
    pub chapter_count: Option<i32>,
    #[serde(default)]
    pub narrative_perspective: Option<String>,
    #[serde(default)]
    pub character_count: Option<i32>,
    #[serde(default)]
    pub outline_mode: Option<String>,
    #[serde(default)]
    pub user_id: Option<DbId>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// One chapter. `outline_title` is a lossy back-reference resolved
/// against the document's outlines on import; an unresolvable title
/// leaves the imported chapter unlinked rather than failing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChapterRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub chapter_number: Option<i32>,
    #[serde(default)]
    pub word_count: i32,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub outline_title: Option<String>,
    #[serde(default)]
    pub sub_index: Option<i32>,
    /// Structured expansion plan. Exported as parsed JSON; anything
    /// unparseable in storage exports as `None`.
    #[serde(default)]
    pub expansion_plan: Option<serde_json::Value>,
}

/// One character (or organization avatar — organizations are character
/// rows with `is_organization` set). `name` is the resolution target
/// for relationships, organizations, and memberships, so it must be
/// unique within the document for those links to survive a round trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub is_organization: bool,
    #[serde(default)]
    pub role_type: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub appearance: Option<String>,
    #[serde(default)]
    pub traits: Option<serde_json::Value>,
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub organization_purpose: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// One outline node. `title` is the resolution target for
/// `ChapterRecord::outline_title`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutlineRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub order_index: Option<i32>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// A directed relationship between two characters, addressed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRecord {
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub target_name: String,
    #[serde(default)]
    pub relationship_name: Option<String>,
    #[serde(default = "default_intimacy")]
    pub intimacy_level: i32,
    #[serde(default = "default_active_status")]
    pub status: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
}

/// Organization detail attached to a character row. `parent_org_name`
/// names another organization's owning character and may forward-reference
/// one that appears later in the array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationRecord {
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub parent_org_name: Option<String>,
    #[serde(default = "default_power_level")]
    pub power_level: i32,
    #[serde(default)]
    pub member_count: i32,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub motto: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Membership of a character in an organization, both ends by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMemberRecord {
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub rank: i32,
    #[serde(default = "default_active_status")]
    pub status: String,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default = "default_loyalty")]
    pub loyalty: i32,
    #[serde(default)]
    pub contribution: i32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A user-scoped custom writing style. Deduplicated on import by
/// (owning user, name).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WritingStyleRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub style_type: Option<String>,
    #[serde(default)]
    pub preset_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prompt_content: Option<String>,
    #[serde(default)]
    pub order_index: i32,
}

/// A generation-history record. Export-only: the importer ignores this
/// collection entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationHistoryRecord {
    #[serde(default)]
    pub chapter_title: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub generated_content: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tokens_used: Option<i32>,
    #[serde(default)]
    pub generation_time: Option<f64>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses_to_empty_document() {
        let doc: ProjectDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.version.is_empty());
        assert!(doc.project.is_none());
        assert!(doc.chapters.is_empty());
        assert!(doc.generation_history.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let doc: ProjectDocument = serde_json::from_str(
            r#"{ "version": "2.0.0", "future_field": { "nested": true } }"#,
        )
        .unwrap();
        assert_eq!(doc.version, "2.0.0");
    }

    #[test]
    fn relationship_defaults_applied() {
        let rel: RelationshipRecord = serde_json::from_str(
            r#"{ "source_name": "林风", "target_name": "苏瑶" }"#,
        )
        .unwrap();
        assert_eq!(rel.intimacy_level, 50);
        assert_eq!(rel.status, "active");
        assert!(rel.relationship_name.is_none());
    }

    #[test]
    fn member_defaults_applied() {
        let member: OrganizationMemberRecord = serde_json::from_str(
            r#"{ "organization_name": "青云宗", "character_name": "林风" }"#,
        )
        .unwrap();
        assert_eq!(member.rank, 0);
        assert_eq!(member.loyalty, 50);
        assert_eq!(member.contribution, 0);
        assert_eq!(member.status, "active");
    }

    #[test]
    fn organization_defaults_applied() {
        let org: OrganizationRecord =
            serde_json::from_str(r#"{ "character_name": "青云宗" }"#).unwrap();
        assert_eq!(org.power_level, 50);
        assert_eq!(org.member_count, 0);
        assert!(org.parent_org_name.is_none());
    }

    #[test]
    fn document_round_trip() {
        let doc = ProjectDocument {
            version: SUPPORTED_VERSION.to_string(),
            export_time: Some(chrono::Utc::now()),
            project: Some(ProjectRecord {
                title: "星落之城".to_string(),
                genre: Some("玄幻".to_string()),
                ..Default::default()
            }),
            chapters: vec![ChapterRecord {
                title: "第一章 雨夜".to_string(),
                word_count: 3200,
                outline_title: Some("开篇".to_string()),
                expansion_plan: Some(serde_json::json!({ "scenes": 3 })),
                ..Default::default()
            }],
            ..Default::default()
        };

        let json = serde_json::to_string(&doc).unwrap();
        let parsed: ProjectDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.version, SUPPORTED_VERSION);
        assert_eq!(parsed.project.unwrap().title, "星落之城");
        assert_eq!(parsed.chapters[0].word_count, 3200);
        assert_eq!(
            parsed.chapters[0].expansion_plan,
            Some(serde_json::json!({ "scenes": 3 }))
        );
    }
}
