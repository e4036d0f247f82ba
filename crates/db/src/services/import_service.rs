//! Project import: create a brand-new project graph from a portable
//! [`ProjectDocument`].
//!
//! All writes happen inside one transaction; any failure rolls the
//! whole import back and is reported through [`ImportOutcome`] rather
//! than an error, so the caller can always render statistics and
//! warnings.
//!
//! Name-based re-linking imposes a strict step order: characters and
//! outlines are created first (each building a resolution map from its
//! exported natural key to its freshly minted id), then the rows that
//! reference them. Organizations get two passes of their own, because a
//! child may appear in the document before its parent: every
//! organization row is created and indexed first, and only then are
//! parent links wired up.
//!
//! Unresolvable cross-references (a relationship endpoint, an
//! organization owner, a membership endpoint) skip just that row. The
//! skips surface only as lower created-counts, never as errors.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, error, info};

use fabula_core::document::{ProjectDocument, ProjectRecord};
use fabula_core::types::DbId;
use fabula_core::validation::validate_document;

/// Per-category created counts. On failure these hold whatever had
/// accumulated before the error; nothing they count was persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub characters: usize,
    pub outlines: usize,
    pub chapters: usize,
    pub relationships: usize,
    pub organizations: usize,
    pub organization_members: usize,
    pub writing_styles: usize,
}

/// Structured result of an import attempt.
#[derive(Debug, Clone, Serialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub project_id: Option<DbId>,
    pub message: String,
    pub statistics: ImportStats,
    pub warnings: Vec<String>,
}

/// Transactional assembler for imported project graphs.
pub struct ImportService;

impl ImportService {
    /// Import a document as a new project owned by `user_id`. Never
    /// merges into an existing project, and never returns an error:
    /// validation failures and storage failures both come back as an
    /// unsuccessful outcome.
    pub async fn import_project(
        pool: &PgPool,
        doc: &ProjectDocument,
        user_id: DbId,
    ) -> ImportOutcome {
        let report = validate_document(doc);
        let project = match doc.project.as_ref() {
            Some(project) if report.valid => project,
            _ => {
                return ImportOutcome {
                    success: false,
                    project_id: None,
                    message: format!("数据验证失败: {}", report.errors.join(", ")),
                    statistics: ImportStats::default(),
                    warnings: report.warnings,
                };
            }
        };

        info!(project_name = %report.project_name, "importing project");

        let mut stats = ImportStats::default();
        match Self::run(pool, doc, project, user_id, &mut stats).await {
            Ok(project_id) => {
                info!(project_id, "project import complete");
                ImportOutcome {
                    success: true,
                    project_id: Some(project_id),
                    message: "项目导入成功".to_string(),
                    statistics: stats,
                    warnings: report.warnings,
                }
            }
            Err(e) => {
                error!(error = %e, "project import failed, rolling back");
                ImportOutcome {
                    success: false,
                    project_id: None,
                    message: format!("导入失败: {e}"),
                    statistics: stats,
                    warnings: report.warnings,
                }
            }
        }
    }

    /// The write sequence. Dropping the transaction on any `?` rolls
    /// everything back.
    async fn run(
        pool: &PgPool,
        doc: &ProjectDocument,
        project: &ProjectRecord,
        user_id: DbId,
        stats: &mut ImportStats,
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project_id = Self::create_project(&mut tx, project, user_id).await?;
        info!(project_id, "created project");

        // Characters first: relationships and organizations resolve
        // against this map.
        let char_map = Self::import_characters(&mut tx, doc, project_id).await?;
        stats.characters = char_map.len();
        info!(count = stats.characters, "imported characters");

        // Outlines before chapters, so chapter back-references resolve.
        let outline_map = Self::import_outlines(&mut tx, doc, project_id).await?;
        stats.outlines = outline_map.len();
        info!(count = stats.outlines, "imported outlines");

        stats.chapters = Self::import_chapters(&mut tx, doc, project_id, &outline_map).await?;
        info!(count = stats.chapters, "imported chapters");

        stats.relationships =
            Self::import_relationships(&mut tx, doc, project_id, &char_map).await?;
        info!(count = stats.relationships, "imported relationships");

        let org_map = Self::import_organizations(&mut tx, doc, project_id, &char_map).await?;
        stats.organizations = org_map.len();
        info!(count = stats.organizations, "imported organizations");

        stats.organization_members =
            Self::import_organization_members(&mut tx, doc, &char_map, &org_map).await?;
        info!(count = stats.organization_members, "imported organization members");

        stats.writing_styles = Self::import_writing_styles(&mut tx, doc, user_id).await?;
        info!(count = stats.writing_styles, "imported writing styles");

        tx.commit().await?;
        Ok(project_id)
    }

    /// Create the project row under the importing user. The document's
    /// original owner is ignored, the onboarding wizard is forced to
    /// completed, and the exported word count is preserved as-is.
    async fn create_project(
        tx: &mut Transaction<'_, Postgres>,
        project: &ProjectRecord,
        user_id: DbId,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO projects
                (user_id, title, description, theme, genre, target_words, status,
                 world_time_period, world_location, world_atmosphere, world_rules,
                 chapter_count, narrative_perspective, character_count, outline_mode,
                 current_words, wizard_step, wizard_status)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'planning'),
                     $8, $9, $10, $11, $12, $13, $14, COALESCE($15, 'one-to-many'),
                     COALESCE($16, 0), 4, 'completed')
             RETURNING id",
        )
        .bind(user_id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.theme)
        .bind(&project.genre)
        .bind(project.target_words)
        .bind(&project.status)
        .bind(&project.world_time_period)
        .bind(&project.world_location)
        .bind(&project.world_atmosphere)
        .bind(&project.world_rules)
        .bind(project.chapter_count)
        .bind(&project.narrative_perspective)
        .bind(project.character_count)
        .bind(&project.outline_mode)
        .bind(project.current_words)
        .fetch_one(&mut **tx)
        .await
    }

    /// Create all characters, returning the name -> new id resolution
    /// map. Each row is flushed individually because its id feeds the
    /// maps later steps resolve against.
    async fn import_characters(
        tx: &mut Transaction<'_, Postgres>,
        doc: &ProjectDocument,
        project_id: DbId,
    ) -> Result<HashMap<String, DbId>, sqlx::Error> {
        let mut char_map = HashMap::new();

        for record in &doc.characters {
            let id = sqlx::query_scalar::<_, DbId>(
                "INSERT INTO characters
                    (project_id, name, age, gender, is_organization, role_type,
                     personality, background, appearance, traits, organization_type,
                     organization_purpose)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                 RETURNING id",
            )
            .bind(project_id)
            .bind(&record.name)
            .bind(record.age)
            .bind(&record.gender)
            .bind(record.is_organization)
            .bind(&record.role_type)
            .bind(&record.personality)
            .bind(&record.background)
            .bind(&record.appearance)
            .bind(serialize_structured(record.traits.as_ref()))
            .bind(&record.organization_type)
            .bind(&record.organization_purpose)
            .fetch_one(&mut **tx)
            .await?;

            char_map.insert(record.name.clone(), id);
        }

        Ok(char_map)
    }

    /// Create all outlines, returning the title -> new id resolution map.
    async fn import_outlines(
        tx: &mut Transaction<'_, Postgres>,
        doc: &ProjectDocument,
        project_id: DbId,
    ) -> Result<HashMap<String, DbId>, sqlx::Error> {
        let mut outline_map = HashMap::new();

        for record in &doc.outlines {
            let id = sqlx::query_scalar::<_, DbId>(
                "INSERT INTO outlines (project_id, title, content, structure, order_index)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id",
            )
            .bind(project_id)
            .bind(&record.title)
            .bind(&record.content)
            .bind(&record.structure)
            .bind(record.order_index)
            .fetch_one(&mut **tx)
            .await?;

            outline_map.insert(record.title.clone(), id);
        }

        Ok(outline_map)
    }

    /// Create chapters, re-linking each exported outline title through
    /// the outline map. An unresolvable title leaves the chapter
    /// unlinked; it never fails the chapter.
    async fn import_chapters(
        tx: &mut Transaction<'_, Postgres>,
        doc: &ProjectDocument,
        project_id: DbId,
        outline_map: &HashMap<String, DbId>,
    ) -> Result<usize, sqlx::Error> {
        let mut count = 0;

        for record in &doc.chapters {
            let outline_id = record
                .outline_title
                .as_ref()
                .and_then(|title| outline_map.get(title))
                .copied();

            sqlx::query(
                "INSERT INTO chapters
                    (project_id, outline_id, title, content, summary, chapter_number,
                     word_count, status, sub_index, expansion_plan)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'draft'), $9, $10)",
            )
            .bind(project_id)
            .bind(outline_id)
            .bind(&record.title)
            .bind(&record.content)
            .bind(&record.summary)
            .bind(record.chapter_number)
            .bind(record.word_count)
            .bind(&record.status)
            .bind(record.sub_index)
            .bind(serialize_structured(record.expansion_plan.as_ref()))
            .execute(&mut **tx)
            .await?;

            count += 1;
        }

        Ok(count)
    }

    /// Create relationships whose two endpoints both resolve; skip the
    /// rest silently.
    async fn import_relationships(
        tx: &mut Transaction<'_, Postgres>,
        doc: &ProjectDocument,
        project_id: DbId,
        char_map: &HashMap<String, DbId>,
    ) -> Result<usize, sqlx::Error> {
        let mut count = 0;

        for record in &doc.relationships {
            let (Some(&source_id), Some(&target_id)) = (
                char_map.get(&record.source_name),
                char_map.get(&record.target_name),
            ) else {
                continue;
            };

            sqlx::query(
                "INSERT INTO character_relationships
                    (project_id, character_from_id, character_to_id, relationship_name,
                     intimacy_level, status, description, started_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(project_id)
            .bind(source_id)
            .bind(target_id)
            .bind(&record.relationship_name)
            .bind(record.intimacy_level)
            .bind(&record.status)
            .bind(&record.description)
            .bind(&record.started_at)
            .execute(&mut **tx)
            .await?;

            count += 1;
        }

        Ok(count)
    }

    /// Create organizations in two passes and return the owner-name ->
    /// new organization id map.
    ///
    /// Pass one creates every row whose owning character resolves (no
    /// parent yet) and re-derives the owner's name from the database to
    /// index the new id. Pass two wires parent links against that
    /// index, so a child listed before its parent still resolves.
    async fn import_organizations(
        tx: &mut Transaction<'_, Postgres>,
        doc: &ProjectDocument,
        project_id: DbId,
        char_map: &HashMap<String, DbId>,
    ) -> Result<HashMap<String, DbId>, sqlx::Error> {
        let mut created: Vec<(DbId, DbId, Option<String>)> = Vec::new();

        for record in &doc.organizations {
            let Some(&character_id) = char_map.get(&record.character_name) else {
                continue;
            };

            let org_id = sqlx::query_scalar::<_, DbId>(
                "INSERT INTO organizations
                    (project_id, character_id, power_level, member_count, location,
                     motto, color)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id",
            )
            .bind(project_id)
            .bind(character_id)
            .bind(record.power_level)
            .bind(record.member_count)
            .bind(&record.location)
            .bind(&record.motto)
            .bind(&record.color)
            .fetch_one(&mut **tx)
            .await?;

            created.push((org_id, character_id, record.parent_org_name.clone()));
        }

        let mut org_map = HashMap::new();
        for (org_id, character_id, _) in &created {
            let name = sqlx::query_scalar::<_, String>(
                "SELECT name FROM characters WHERE id = $1",
            )
            .bind(character_id)
            .fetch_optional(&mut **tx)
            .await?;
            if let Some(name) = name {
                org_map.insert(name, *org_id);
            }
        }

        for (org_id, _, parent_name) in &created {
            let Some(parent_name) = parent_name else {
                continue;
            };
            if let Some(&parent_id) = org_map.get(parent_name) {
                sqlx::query("UPDATE organizations SET parent_org_id = $2 WHERE id = $1")
                    .bind(org_id)
                    .bind(parent_id)
                    .execute(&mut **tx)
                    .await?;
            }
        }

        Ok(org_map)
    }

    /// Create memberships whose organization and character both
    /// resolve; skip the rest silently.
    async fn import_organization_members(
        tx: &mut Transaction<'_, Postgres>,
        doc: &ProjectDocument,
        char_map: &HashMap<String, DbId>,
        org_map: &HashMap<String, DbId>,
    ) -> Result<usize, sqlx::Error> {
        let mut count = 0;

        for record in &doc.organization_members {
            let (Some(&org_id), Some(&character_id)) = (
                org_map.get(&record.organization_name),
                char_map.get(&record.character_name),
            ) else {
                continue;
            };

            sqlx::query(
                "INSERT INTO organization_members
                    (organization_id, character_id, position, rank, status, joined_at,
                     loyalty, contribution, notes)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(org_id)
            .bind(character_id)
            .bind(&record.position)
            .bind(record.rank)
            .bind(&record.status)
            .bind(&record.joined_at)
            .bind(record.loyalty)
            .bind(record.contribution)
            .bind(&record.notes)
            .execute(&mut **tx)
            .await?;

            count += 1;
        }

        Ok(count)
    }

    /// Create writing styles for the importing user, skipping any whose
    /// name that user already has. Check-then-create, not upsert: an
    /// existing style is left untouched.
    async fn import_writing_styles(
        tx: &mut Transaction<'_, Postgres>,
        doc: &ProjectDocument,
        user_id: DbId,
    ) -> Result<usize, sqlx::Error> {
        let mut count = 0;

        for record in &doc.writing_styles {
            let existing = sqlx::query_scalar::<_, DbId>(
                "SELECT id FROM writing_styles WHERE user_id = $1 AND name = $2",
            )
            .bind(user_id)
            .bind(&record.name)
            .fetch_optional(&mut **tx)
            .await?;

            if existing.is_some() {
                debug!(name = %record.name, "writing style already exists, skipping");
                continue;
            }

            sqlx::query(
                "INSERT INTO writing_styles
                    (user_id, name, style_type, preset_id, description, prompt_content,
                     order_index)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(user_id)
            .bind(&record.name)
            .bind(&record.style_type)
            .bind(&record.preset_id)
            .bind(&record.description)
            .bind(&record.prompt_content)
            .bind(record.order_index)
            .execute(&mut **tx)
            .await?;

            count += 1;
        }

        Ok(count)
    }
}

/// Serialize structured data back to its TEXT storage form. A JSON
/// string stays a bare string rather than gaining quotes.
fn serialize_structured(value: Option<&serde_json::Value>) -> Option<String> {
    value.map(|v| match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_structured_keeps_bare_strings() {
        let value = serde_json::Value::String("已序列化".to_string());
        assert_eq!(
            serialize_structured(Some(&value)).unwrap(),
            "已序列化"
        );
    }

    #[test]
    fn serialize_structured_serializes_objects() {
        let value = serde_json::json!({ "scenes": 3 });
        assert_eq!(
            serialize_structured(Some(&value)).unwrap(),
            r#"{"scenes":3}"#
        );
        assert!(serialize_structured(None).is_none());
    }
}
