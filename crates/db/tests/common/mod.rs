//! Shared helpers for db integration tests.

use fabula_core::types::DbId;
use fabula_db::models::project::CreateProject;
use fabula_db::models::user::CreateUser;
use fabula_db::repositories::{ProjectRepo, UserRepo};
use sqlx::PgPool;

pub async fn seed_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
        },
    )
    .await
    .expect("create user")
    .id
}

#[allow(dead_code)] // Not every test binary seeds a project.
pub async fn seed_project(pool: &PgPool, user_id: DbId, title: &str) -> DbId {
    ProjectRepo::create(
        pool,
        &CreateProject {
            user_id,
            title: title.to_string(),
            description: None,
            theme: None,
            genre: None,
            target_words: None,
            chapter_count: None,
            narrative_perspective: None,
            outline_mode: None,
        },
    )
    .await
    .expect("create project")
    .id
}
