//! Integration tests for prompt template resolution: per-user overrides
//! shadowing the built-in catalog, fallback behaviour, and strict
//! rendering through the service.

mod common;

use std::collections::HashMap;

use assert_matches::assert_matches;
use sqlx::PgPool;

use fabula_core::error::CoreError;
use fabula_core::prompt::template_content;
use fabula_db::models::prompt_template::CreatePromptTemplate;
use fabula_db::repositories::PromptTemplateRepo;
use fabula_db::services::{ServiceError, TemplateService};

fn override_for(user_id: i64, key: &str, content: &str) -> CreatePromptTemplate {
    CreatePromptTemplate {
        user_id,
        template_key: key.to_string(),
        template_name: "我的模板".to_string(),
        template_content: content.to_string(),
        is_active: None,
    }
}

fn params(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[sqlx::test]
async fn builtin_used_without_user_context(pool: PgPool) {
    let resolved = TemplateService::resolve(&pool, None, "WORLD_BUILDING")
        .await
        .unwrap();
    assert_eq!(resolved, template_content("WORLD_BUILDING").unwrap());
}

#[sqlx::test]
async fn builtin_used_when_user_has_no_override(pool: PgPool) {
    let user = common::seed_user(&pool, "writer").await;
    let resolved = TemplateService::resolve(&pool, Some(user), "PLOT_ANALYSIS")
        .await
        .unwrap();
    assert_eq!(resolved, template_content("PLOT_ANALYSIS").unwrap());
}

#[sqlx::test]
async fn active_override_shadows_builtin(pool: PgPool) {
    let user = common::seed_user(&pool, "writer").await;
    PromptTemplateRepo::create(
        &pool,
        &override_for(user, "WORLD_BUILDING", "自定义：为《{title}》构建世界观"),
    )
    .await
    .unwrap();

    let resolved = TemplateService::resolve(&pool, Some(user), "WORLD_BUILDING")
        .await
        .unwrap();
    assert_eq!(resolved, "自定义：为《{title}》构建世界观");
}

#[sqlx::test]
async fn override_is_scoped_to_its_user(pool: PgPool) {
    let owner = common::seed_user(&pool, "owner").await;
    let other = common::seed_user(&pool, "other").await;
    PromptTemplateRepo::create(&pool, &override_for(owner, "WORLD_BUILDING", "私有模板"))
        .await
        .unwrap();

    let resolved = TemplateService::resolve(&pool, Some(other), "WORLD_BUILDING")
        .await
        .unwrap();
    assert_eq!(resolved, template_content("WORLD_BUILDING").unwrap());
}

#[sqlx::test]
async fn deactivated_override_falls_back_to_builtin(pool: PgPool) {
    let user = common::seed_user(&pool, "writer").await;
    let created = PromptTemplateRepo::create(
        &pool,
        &override_for(user, "WORLD_BUILDING", "即将停用"),
    )
    .await
    .unwrap();

    assert!(PromptTemplateRepo::deactivate(&pool, created.id).await.unwrap());

    let resolved = TemplateService::resolve(&pool, Some(user), "WORLD_BUILDING")
        .await
        .unwrap();
    assert_eq!(resolved, template_content("WORLD_BUILDING").unwrap());
}

#[sqlx::test]
async fn unknown_key_without_override_is_an_error(pool: PgPool) {
    let err = TemplateService::resolve(&pool, None, "NO_SUCH_TEMPLATE")
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::UnknownTemplate(key)) if key == "NO_SUCH_TEMPLATE");
}

#[sqlx::test]
async fn render_injects_genre_strategy_through_override(pool: PgPool) {
    let user = common::seed_user(&pool, "writer").await;
    PromptTemplateRepo::create(
        &pool,
        &override_for(user, "WORLD_BUILDING", "《{title}》类型策略：{genre_strategy}"),
    )
    .await
    .unwrap();

    let rendered = TemplateService::render_for_user(
        &pool,
        Some(user),
        "WORLD_BUILDING",
        &params(&[("title", "剑引九霄"), ("genre", "仙侠")]),
    )
    .await
    .unwrap();
    assert!(rendered.contains("剑引九霄"));
    assert!(rendered.contains("位面飞升"));
}

#[sqlx::test]
async fn render_missing_parameter_fails_fast(pool: PgPool) {
    let err = TemplateService::render_for_user(
        &pool,
        None,
        "PLOT_ANALYSIS",
        &params(&[("chapter_number", "1"), ("title", "第一章")]),
    )
    .await
    .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::MissingParameter(_)));
}
