//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Query-specific row structs where a repository joins across tables

pub mod chapter;
pub mod character;
pub mod generation_history;
pub mod organization;
pub mod organization_member;
pub mod outline;
pub mod project;
pub mod prompt_template;
pub mod relationship;
pub mod user;
pub mod writing_style;
