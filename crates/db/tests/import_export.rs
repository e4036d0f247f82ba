//! Integration tests for project export and import.
//!
//! Exercises the full round trip against a real database: name-based
//! re-linking, best-effort reference drops, two-pass organization
//! parent resolution, writing-style dedup, and whole-import atomicity.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;

use fabula_core::document::{
    ChapterRecord, CharacterRecord, OrganizationRecord, OutlineRecord, ProjectDocument,
    ProjectRecord, RelationshipRecord, WritingStyleRecord, SUPPORTED_VERSION,
};
use fabula_core::error::CoreError;
use fabula_core::types::DbId;
use fabula_db::models::character::CreateCharacter;
use fabula_db::models::relationship::CreateRelationship;
use fabula_db::repositories::{
    CharacterRepo, ChapterRepo, OrganizationRepo, OutlineRepo, ProjectRepo, RelationshipRepo,
    WritingStyleRepo,
};
use fabula_db::services::{ExportOptions, ExportService, ImportService, ServiceError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_character(project_id: DbId, name: &str) -> CreateCharacter {
    CreateCharacter {
        project_id,
        name: name.to_string(),
        age: None,
        gender: None,
        is_organization: None,
        role_type: None,
        personality: None,
        background: None,
        appearance: None,
        traits: None,
        organization_type: None,
        organization_purpose: None,
    }
}

fn character_record(name: &str) -> CharacterRecord {
    CharacterRecord {
        name: name.to_string(),
        ..Default::default()
    }
}

fn relationship_record(source: &str, target: &str, name: &str) -> RelationshipRecord {
    RelationshipRecord {
        source_name: source.to_string(),
        target_name: target.to_string(),
        relationship_name: Some(name.to_string()),
        intimacy_level: 50,
        status: "active".to_string(),
        description: None,
        started_at: None,
    }
}

fn organization_record(owner: &str, parent: Option<&str>) -> OrganizationRecord {
    OrganizationRecord {
        character_name: owner.to_string(),
        parent_org_name: parent.map(str::to_string),
        power_level: 50,
        member_count: 0,
        location: None,
        motto: None,
        color: None,
    }
}

fn style_record(name: &str) -> WritingStyleRecord {
    WritingStyleRecord {
        name: name.to_string(),
        prompt_content: Some("克制、冷峻".to_string()),
        ..Default::default()
    }
}

/// A minimal valid document with the given title and nothing else.
fn base_document(title: &str) -> ProjectDocument {
    ProjectDocument {
        version: SUPPORTED_VERSION.to_string(),
        project: Some(ProjectRecord {
            title: title.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn round_trip_preserves_relationship_endpoints(pool: PgPool) {
    let author = common::seed_user(&pool, "author").await;
    let project_id = common::seed_project(&pool, author, "原著").await;

    let lin = CharacterRepo::create(&pool, &new_character(project_id, "林风"))
        .await
        .unwrap();
    let su = CharacterRepo::create(&pool, &new_character(project_id, "苏瑶"))
        .await
        .unwrap();
    RelationshipRepo::create(
        &pool,
        &CreateRelationship {
            project_id,
            character_from_id: lin.id,
            character_to_id: su.id,
            relationship_name: Some("师徒".to_string()),
            intimacy_level: Some(80),
            status: None,
            description: None,
            started_at: None,
        },
    )
    .await
    .unwrap();

    let doc = ExportService::export_project(&pool, project_id, &ExportOptions::default())
        .await
        .unwrap();
    assert_eq!(doc.version, SUPPORTED_VERSION);
    assert_eq!(doc.relationships.len(), 1);
    assert_eq!(doc.relationships[0].source_name, "林风");
    assert_eq!(doc.relationships[0].target_name, "苏瑶");

    let importer = common::seed_user(&pool, "importer").await;
    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(outcome.success, "{}", outcome.message);
    let new_project = outcome.project_id.unwrap();
    assert_ne!(new_project, project_id);
    assert_eq!(outcome.statistics.characters, 2);
    assert_eq!(outcome.statistics.relationships, 1);

    let rels = RelationshipRepo::list_with_source(&pool, new_project)
        .await
        .unwrap();
    assert_eq!(rels.len(), 1);
    assert_eq!(rels[0].source_name, "林风");
    assert_eq!(rels[0].intimacy_level, 80);
    let target = CharacterRepo::find_by_id(&pool, rels[0].character_to_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(target.name, "苏瑶");
    // New ids were minted.
    assert_ne!(target.id, su.id);
}

#[sqlx::test]
async fn import_rehomes_project_and_completes_wizard(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("流浪诗人");
    {
        let project = doc.project.as_mut().unwrap();
        project.user_id = Some(987_654); // Original owner: ignored.
        project.current_words = Some(123_456);
        project.status = Some("writing".to_string());
    }

    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(outcome.success, "{}", outcome.message);

    let project = ProjectRepo::find_by_id(&pool, outcome.project_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(project.user_id, importer);
    assert_eq!(project.current_words, 123_456);
    assert_eq!(project.status, "writing");
    assert_eq!(project.wizard_status, "completed");
    assert_eq!(project.wizard_step, 4);
}

// ---------------------------------------------------------------------------
// Reference resolution
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn dangling_relationship_dropped_on_import(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("孤岛");
    doc.characters = vec![character_record("林风"), character_record("苏瑶")];
    doc.relationships = vec![
        relationship_record("林风", "苏瑶", "同门"),
        relationship_record("林风", "不存在的人", "宿敌"),
    ];

    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(outcome.success, "{}", outcome.message);
    // Only the resolvable relationship was created, not the raw array length.
    assert_eq!(outcome.statistics.relationships, 1);

    let rels = RelationshipRepo::list_by_project(&pool, outcome.project_id.unwrap())
        .await
        .unwrap();
    assert_eq!(rels.len(), 1);
    assert_eq!(rels[0].relationship_name.as_deref(), Some("同门"));
}

#[sqlx::test]
async fn chapter_outline_relink_by_title(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("山河");
    doc.outlines = vec![OutlineRecord {
        title: "第一卷".to_string(),
        order_index: Some(1),
        ..Default::default()
    }];
    doc.chapters = vec![
        ChapterRecord {
            title: "第一章".to_string(),
            chapter_number: Some(1),
            outline_title: Some("第一卷".to_string()),
            ..Default::default()
        },
        ChapterRecord {
            title: "第二章".to_string(),
            chapter_number: Some(2),
            outline_title: Some("失落之卷".to_string()),
            ..Default::default()
        },
    ];

    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.statistics.chapters, 2);
    let new_project = outcome.project_id.unwrap();

    let outlines = OutlineRepo::list_by_project(&pool, new_project).await.unwrap();
    assert_eq!(outlines.len(), 1);
    let chapters = ChapterRepo::list_by_project(&pool, new_project).await.unwrap();
    assert_eq!(chapters[0].outline_id, Some(outlines[0].id));
    // The unresolvable title leaves the chapter unlinked, not failed.
    assert_eq!(chapters[1].outline_id, None);
}

#[sqlx::test]
async fn organization_parent_chain_resolves_regardless_of_order(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("宗门志");
    doc.characters = vec![
        character_record("青云宗"),
        character_record("外门"),
        character_record("杂役堂"),
    ];
    // Child listed before parent, parent before grandparent.
    doc.organizations = vec![
        organization_record("杂役堂", Some("外门")),
        organization_record("外门", Some("青云宗")),
        organization_record("青云宗", None),
    ];

    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.statistics.organizations, 3);

    let orgs = OrganizationRepo::list_with_owner(&pool, outcome.project_id.unwrap())
        .await
        .unwrap();
    let by_owner = |name: &str| orgs.iter().find(|o| o.character_name == name).unwrap();

    let root = by_owner("青云宗");
    let middle = by_owner("外门");
    let leaf = by_owner("杂役堂");
    assert_eq!(root.parent_org_id, None);
    assert_eq!(middle.parent_org_id, Some(root.id));
    assert_eq!(leaf.parent_org_id, Some(middle.id));
}

#[sqlx::test]
async fn organization_without_owner_is_skipped(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("断线");
    doc.characters = vec![character_record("青云宗")];
    doc.organizations = vec![
        organization_record("青云宗", None),
        organization_record("不存在的势力", None),
    ];

    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(outcome.success, "{}", outcome.message);
    assert_eq!(outcome.statistics.organizations, 1);
}

// ---------------------------------------------------------------------------
// Writing styles
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn writing_style_import_is_idempotent(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("文风集");
    doc.writing_styles = vec![style_record("冷峻"), style_record("华丽")];

    let first = ImportService::import_project(&pool, &doc, importer).await;
    assert!(first.success, "{}", first.message);
    assert_eq!(first.statistics.writing_styles, 2);

    let second = ImportService::import_project(&pool, &doc, importer).await;
    assert!(second.success, "{}", second.message);
    assert_eq!(second.statistics.writing_styles, 0);

    let styles = WritingStyleRepo::list_by_user(&pool, importer).await.unwrap();
    assert_eq!(styles.len(), 2);
}

// ---------------------------------------------------------------------------
// Validation and atomicity
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn invalid_document_writes_nothing(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("无名");
    doc.project = None;

    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("数据验证失败"));
    assert_eq!(outcome.statistics, Default::default());

    let projects = ProjectRepo::list_by_user(&pool, importer).await.unwrap();
    assert!(projects.is_empty());
}

#[sqlx::test]
async fn version_mismatch_warning_carried_into_outcome(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("旧档案");
    doc.version = "0.9.0".to_string();

    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(outcome.success, "{}", outcome.message);
    assert!(outcome.warnings.iter().any(|w| w.contains("版本不匹配")));
}

#[sqlx::test]
async fn storage_failure_rolls_back_entire_import(pool: PgPool) {
    let importer = common::seed_user(&pool, "importer").await;

    let mut doc = base_document("断层");
    doc.characters = vec![character_record("林风"), character_record("青云宗")];
    doc.outlines = vec![OutlineRecord {
        title: "第一卷".to_string(),
        ..Default::default()
    }];
    doc.chapters = vec![ChapterRecord {
        title: "第一章".to_string(),
        ..Default::default()
    }];
    // Exceeds the color column width and fails at the organization step,
    // after project/characters/outlines/chapters were already staged.
    doc.organizations = vec![OrganizationRecord {
        color: Some("x".repeat(64)),
        ..organization_record("青云宗", None)
    }];

    let outcome = ImportService::import_project(&pool, &doc, importer).await;
    assert!(!outcome.success);
    assert!(outcome.message.contains("导入失败"));
    // Statistics accumulated before the failure are reported...
    assert_eq!(outcome.statistics.characters, 2);
    assert_eq!(outcome.statistics.chapters, 1);
    // ...but nothing was persisted.
    assert!(ProjectRepo::list_by_user(&pool, importer).await.unwrap().is_empty());
    let characters: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM characters")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(characters, 0);
    let chapters: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(chapters, 0);
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn export_missing_project_fails_with_not_found(pool: PgPool) {
    let err = ExportService::export_project(&pool, 424_242, &ExportOptions::default())
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::Core(CoreError::NotFound { entity: "project", id: 424_242 })
    );
}

#[sqlx::test]
async fn export_normalizes_structured_text_fields(pool: PgPool) {
    let author = common::seed_user(&pool, "author").await;
    let project_id = common::seed_project(&pool, author, "残卷").await;

    sqlx::query(
        "INSERT INTO chapters (project_id, title, chapter_number, expansion_plan)
         VALUES ($1, '第一章', 1, '{\"scenes\": 3}'),
                ($1, '第二章', 2, 'not valid json')",
    )
    .bind(project_id)
    .execute(&pool)
    .await
    .unwrap();

    let doc = ExportService::export_project(&pool, project_id, &ExportOptions::default())
        .await
        .unwrap();
    assert_eq!(doc.chapters.len(), 2);
    assert_eq!(
        doc.chapters[0].expansion_plan,
        Some(serde_json::json!({ "scenes": 3 }))
    );
    // Unparseable plans export as absent, never as an error.
    assert_eq!(doc.chapters[1].expansion_plan, None);
}

#[sqlx::test]
async fn export_drops_relationship_with_vanished_target(pool: PgPool) {
    let author = common::seed_user(&pool, "author").await;
    let project_id = common::seed_project(&pool, author, "残局").await;

    let lin = CharacterRepo::create(&pool, &new_character(project_id, "林风"))
        .await
        .unwrap();
    let su = CharacterRepo::create(&pool, &new_character(project_id, "苏瑶"))
        .await
        .unwrap();
    RelationshipRepo::create(
        &pool,
        &CreateRelationship {
            project_id,
            character_from_id: lin.id,
            character_to_id: su.id,
            relationship_name: Some("同门".to_string()),
            intimacy_level: None,
            status: None,
            description: None,
            started_at: None,
        },
    )
    .await
    .unwrap();
    // Sever the target from under the relationship row.
    sqlx::query("ALTER TABLE character_relationships DROP CONSTRAINT character_relationships_character_to_id_fkey")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM characters WHERE id = $1")
        .bind(su.id)
        .execute(&pool)
        .await
        .unwrap();

    let doc = ExportService::export_project(&pool, project_id, &ExportOptions::default())
        .await
        .unwrap();
    assert!(doc.relationships.is_empty());
}

#[sqlx::test]
async fn export_options_gate_optional_collections(pool: PgPool) {
    let author = common::seed_user(&pool, "author").await;
    let project_id = common::seed_project(&pool, author, "选集").await;

    sqlx::query(
        "INSERT INTO writing_styles (user_id, name) VALUES ($1, '冷峻')",
    )
    .bind(author)
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO generation_history (project_id, prompt) VALUES ($1, '写一段开头')",
    )
    .bind(project_id)
    .execute(&pool)
    .await
    .unwrap();

    let default_doc = ExportService::export_project(&pool, project_id, &ExportOptions::default())
        .await
        .unwrap();
    assert_eq!(default_doc.writing_styles.len(), 1);
    assert!(default_doc.generation_history.is_empty());

    let full = ExportOptions {
        include_generation_history: true,
        include_writing_styles: false,
    };
    let full_doc = ExportService::export_project(&pool, project_id, &full)
        .await
        .unwrap();
    assert!(full_doc.writing_styles.is_empty());
    assert_eq!(full_doc.generation_history.len(), 1);
}
