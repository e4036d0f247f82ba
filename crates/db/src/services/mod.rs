//! Service layer: project export/import and prompt template resolution.

pub mod export_service;
pub mod import_service;
pub mod template_service;

pub use export_service::{ExportOptions, ExportService};
pub use import_service::{ImportOutcome, ImportService, ImportStats};
pub use template_service::TemplateService;

use fabula_core::error::CoreError;

/// Errors surfaced by the service layer. Import is the exception: it
/// reports failure through [`ImportOutcome`] instead of an error so the
/// caller can always render statistics and warnings.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
