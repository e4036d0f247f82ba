use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A template referenced a placeholder absent from the supplied
    /// parameter map. A partially substituted prompt sent to a
    /// generation model corrupts output silently, so this fails fast.
    #[error("Missing required template parameter: {0}")]
    MissingParameter(String),

    #[error("Unknown prompt template: {0}")]
    UnknownTemplate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
