//! Project export: flatten one project's entity graph into a portable
//! [`ProjectDocument`].
//!
//! Internal ids never leave the database; every cross-entity reference
//! is rewritten to the referenced row's name or title so the document
//! can be re-linked on import. Rows whose references no longer resolve
//! (a deleted target character, an ownerless organization) are dropped
//! from the export rather than failing it.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;

use fabula_core::document::{
    ChapterRecord, CharacterRecord, GenerationHistoryRecord, OrganizationMemberRecord,
    OrganizationRecord, OutlineRecord, ProjectDocument, ProjectRecord, RelationshipRecord,
    WritingStyleRecord, GENERATION_HISTORY_EXPORT_CAP, SUPPORTED_VERSION,
};
use fabula_core::error::CoreError;
use fabula_core::types::DbId;

use crate::repositories::{
    ChapterRepo, CharacterRepo, GenerationHistoryRepo, OrganizationMemberRepo, OrganizationRepo,
    OutlineRepo, ProjectRepo, RelationshipRepo, WritingStyleRepo,
};
use crate::services::ServiceError;

/// What to include beyond the core graph.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub include_generation_history: bool,
    pub include_writing_styles: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_generation_history: false,
            include_writing_styles: true,
        }
    }
}

/// Read-only assembler for the export document.
pub struct ExportService;

impl ExportService {
    /// Export a project's full graph. Fails with `NotFound` when the
    /// project does not exist; read-only otherwise.
    pub async fn export_project(
        pool: &PgPool,
        project_id: DbId,
        options: &ExportOptions,
    ) -> Result<ProjectDocument, ServiceError> {
        info!(project_id, "exporting project");

        let project = ProjectRepo::find_by_id(pool, project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "project",
                id: project_id,
            })?;

        let project_record = ProjectRecord {
            title: project.title.clone(),
            description: project.description.clone(),
            theme: project.theme.clone(),
            genre: project.genre.clone(),
            target_words: project.target_words,
            current_words: Some(project.current_words),
            status: Some(project.status.clone()),
            world_time_period: project.world_time_period.clone(),
            world_location: project.world_location.clone(),
            world_atmosphere: project.world_atmosphere.clone(),
            world_rules: project.world_rules.clone(),
            chapter_count: project.chapter_count,
            narrative_perspective: project.narrative_perspective.clone(),
            character_count: project.character_count,
            outline_mode: Some(project.outline_mode.clone()),
            user_id: Some(project.user_id),
            created_at: Some(project.created_at),
        };

        let chapters = Self::export_chapters(pool, project_id).await?;
        info!(count = chapters.len(), "exported chapters");

        let characters = Self::export_characters(pool, project_id).await?;
        info!(count = characters.len(), "exported characters");

        let outlines = Self::export_outlines(pool, project_id).await?;
        info!(count = outlines.len(), "exported outlines");

        let relationships = Self::export_relationships(pool, project_id).await?;
        info!(count = relationships.len(), "exported relationships");

        let organizations = Self::export_organizations(pool, project_id).await?;
        info!(count = organizations.len(), "exported organizations");

        let organization_members = Self::export_organization_members(pool, project_id).await?;
        info!(count = organization_members.len(), "exported organization members");

        let writing_styles = if options.include_writing_styles {
            let styles = Self::export_writing_styles(pool, project.user_id).await?;
            info!(count = styles.len(), "exported writing styles");
            styles
        } else {
            Vec::new()
        };

        let generation_history = if options.include_generation_history {
            let history = Self::export_generation_history(pool, project_id).await?;
            info!(count = history.len(), "exported generation history");
            history
        } else {
            Vec::new()
        };

        info!(project_id, "project export complete");

        Ok(ProjectDocument {
            version: SUPPORTED_VERSION.to_string(),
            export_time: Some(chrono::Utc::now()),
            project: Some(project_record),
            chapters,
            characters,
            outlines,
            relationships,
            organizations,
            organization_members,
            writing_styles,
            generation_history,
        })
    }

    async fn export_chapters(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ChapterRecord>, ServiceError> {
        let chapters = ChapterRepo::list_by_project(pool, project_id).await?;

        // One batched lookup for all referenced outline titles.
        let outline_ids: Vec<DbId> = chapters.iter().filter_map(|ch| ch.outline_id).collect();
        let outline_titles: HashMap<DbId, String> = if outline_ids.is_empty() {
            HashMap::new()
        } else {
            OutlineRepo::find_by_ids(pool, &outline_ids)
                .await?
                .into_iter()
                .map(|ol| (ol.id, ol.title))
                .collect()
        };

        Ok(chapters
            .into_iter()
            .map(|ch| ChapterRecord {
                outline_title: ch
                    .outline_id
                    .and_then(|id| outline_titles.get(&id).cloned()),
                expansion_plan: parse_structured(ch.expansion_plan.as_deref()),
                title: ch.title,
                content: ch.content,
                summary: ch.summary,
                chapter_number: ch.chapter_number,
                word_count: ch.word_count,
                status: Some(ch.status),
                created_at: Some(ch.created_at),
                sub_index: ch.sub_index,
            })
            .collect())
    }

    async fn export_characters(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<CharacterRecord>, ServiceError> {
        let characters = CharacterRepo::list_by_project(pool, project_id).await?;

        Ok(characters
            .into_iter()
            .map(|ch| CharacterRecord {
                traits: parse_structured(ch.traits.as_deref()),
                name: ch.name,
                age: ch.age,
                gender: ch.gender,
                is_organization: ch.is_organization,
                role_type: ch.role_type,
                personality: ch.personality,
                background: ch.background,
                appearance: ch.appearance,
                organization_type: ch.organization_type,
                organization_purpose: ch.organization_purpose,
                created_at: Some(ch.created_at),
            })
            .collect())
    }

    async fn export_outlines(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<OutlineRecord>, ServiceError> {
        let outlines = OutlineRepo::list_by_project(pool, project_id).await?;

        Ok(outlines
            .into_iter()
            .map(|ol| OutlineRecord {
                title: ol.title,
                content: ol.content,
                structure: ol.structure,
                order_index: ol.order_index,
                created_at: Some(ol.created_at),
            })
            .collect())
    }

    async fn export_relationships(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<RelationshipRecord>, ServiceError> {
        let relationships = RelationshipRepo::list_with_source(pool, project_id).await?;

        let mut exported = Vec::new();
        for rel in relationships {
            // Target resolved individually; a vanished target drops the
            // relationship from the export.
            let Some(target) = CharacterRepo::find_by_id(pool, rel.character_to_id).await? else {
                continue;
            };
            exported.push(RelationshipRecord {
                source_name: rel.source_name,
                target_name: target.name,
                relationship_name: rel.relationship_name,
                intimacy_level: rel.intimacy_level,
                status: rel.status,
                description: rel.description,
                started_at: rel.started_at,
            });
        }

        Ok(exported)
    }

    async fn export_organizations(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<OrganizationRecord>, ServiceError> {
        let organizations = OrganizationRepo::list_with_owner(pool, project_id).await?;

        let mut exported = Vec::new();
        for org in organizations {
            let parent_org_name = match org.parent_org_id {
                Some(parent_id) => OrganizationRepo::find_owner_name(pool, parent_id).await?,
                None => None,
            };
            exported.push(OrganizationRecord {
                character_name: org.character_name,
                parent_org_name,
                power_level: org.power_level,
                member_count: org.member_count,
                location: org.location,
                motto: org.motto,
                color: org.color,
            });
        }

        Ok(exported)
    }

    async fn export_organization_members(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<OrganizationMemberRecord>, ServiceError> {
        let members = OrganizationMemberRepo::list_with_organization(pool, project_id).await?;

        let mut exported = Vec::new();
        for member in members {
            let Some(character) = CharacterRepo::find_by_id(pool, member.character_id).await?
            else {
                continue;
            };
            exported.push(OrganizationMemberRecord {
                organization_name: member.organization_name,
                character_name: character.name,
                position: member.position,
                rank: member.rank,
                status: member.status,
                joined_at: member.joined_at,
                loyalty: member.loyalty,
                contribution: member.contribution,
                notes: member.notes,
            });
        }

        Ok(exported)
    }

    async fn export_writing_styles(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<WritingStyleRecord>, ServiceError> {
        let styles = WritingStyleRepo::list_by_user(pool, user_id).await?;

        Ok(styles
            .into_iter()
            .map(|style| WritingStyleRecord {
                name: style.name,
                style_type: style.style_type,
                preset_id: style.preset_id,
                description: style.description,
                prompt_content: style.prompt_content,
                order_index: style.order_index,
            })
            .collect())
    }

    async fn export_generation_history(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<GenerationHistoryRecord>, ServiceError> {
        let histories = GenerationHistoryRepo::list_recent_with_chapter(
            pool,
            project_id,
            GENERATION_HISTORY_EXPORT_CAP,
        )
        .await?;

        Ok(histories
            .into_iter()
            .map(|h| GenerationHistoryRecord {
                chapter_title: h.chapter_title,
                prompt: h.prompt,
                generated_content: h.generated_content,
                model: h.model,
                tokens_used: h.tokens_used,
                generation_time: h.generation_time,
                created_at: Some(h.created_at),
            })
            .collect())
    }
}

/// Parse serialized JSON back to structured data; anything unparseable
/// exports as `None` rather than failing the export.
fn parse_structured(raw: Option<&str>) -> Option<serde_json::Value> {
    raw.and_then(|s| serde_json::from_str(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_exclude_history_include_styles() {
        let options = ExportOptions::default();
        assert!(!options.include_generation_history);
        assert!(options.include_writing_styles);
    }

    #[test]
    fn parse_structured_accepts_valid_json() {
        let parsed = parse_structured(Some(r#"{"scenes": 3}"#)).unwrap();
        assert_eq!(parsed["scenes"], 3);
    }

    #[test]
    fn parse_structured_swallows_garbage() {
        assert!(parse_structured(Some("not json")).is_none());
        assert!(parse_structured(None).is_none());
    }
}
