//! Prompt template resolution with per-user overrides.
//!
//! The built-in catalog lives in `fabula_core::prompt`; this service
//! layers the `prompt_templates` table on top. An active override row
//! for `(user, key)` shadows the built-in of the same key, and
//! everything falls back to the built-in when there is no user context
//! or no override.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;

use fabula_core::error::CoreError;
use fabula_core::prompt::{render_template, template_content};
use fabula_core::types::DbId;

use crate::repositories::PromptTemplateRepo;
use crate::services::ServiceError;

/// Resolves template text and renders prompts for a user.
pub struct TemplateService;

impl TemplateService {
    /// Resolve the template content for a key: the user's active
    /// override when present, otherwise the built-in default. Without a
    /// user context the built-in is returned directly.
    pub async fn resolve(
        pool: &PgPool,
        user_id: Option<DbId>,
        template_key: &str,
    ) -> Result<String, ServiceError> {
        if let Some(user_id) = user_id {
            if let Some(custom) = PromptTemplateRepo::find_active(pool, user_id, template_key).await?
            {
                info!(user_id, template_key, template_name = %custom.template_name,
                    "using custom prompt template");
                return Ok(custom.template_content);
            }
            info!(user_id, template_key, "no custom template, using built-in default");
        }

        template_content(template_key)
            .map(str::to_string)
            .ok_or_else(|| CoreError::UnknownTemplate(template_key.to_string()).into())
    }

    /// Resolve a template and substitute `params` into it. Substitution
    /// is strict: a placeholder missing from `params` fails the call.
    pub async fn render_for_user(
        pool: &PgPool,
        user_id: Option<DbId>,
        template_key: &str,
        params: &HashMap<String, String>,
    ) -> Result<String, ServiceError> {
        let template = Self::resolve(pool, user_id, template_key).await?;
        Ok(render_template(&template, params)?)
    }
}
