//! Structural validation of a candidate import document.
//!
//! Pure: inspects the document and reports, never touches storage. The
//! importer re-runs this and refuses to write anything when `valid` is
//! false; warnings are carried through to the import result.

use serde::Serialize;

use crate::document::{ProjectDocument, SUPPORTED_VERSION};

/// Display name used when the document carries no project title.
pub const FALLBACK_PROJECT_NAME: &str = "未知项目";

/// Per-collection element counts. Computed even for invalid documents
/// so the caller can always show what the file contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub chapters: usize,
    pub characters: usize,
    pub outlines: usize,
    pub relationships: usize,
    pub organizations: usize,
    pub organization_members: usize,
    pub writing_styles: usize,
    pub generation_history: usize,
}

impl DocumentStats {
    pub fn of(doc: &ProjectDocument) -> Self {
        Self {
            chapters: doc.chapters.len(),
            characters: doc.characters.len(),
            outlines: doc.outlines.len(),
            relationships: doc.relationships.len(),
            organizations: doc.organizations.len(),
            organization_members: doc.organization_members.len(),
            writing_styles: doc.writing_styles.len(),
            generation_history: doc.generation_history.len(),
        }
    }
}

/// Outcome of validating a document. Errors block import; warnings do not.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Version string declared by the document (empty when absent).
    pub version: String,
    /// Project title, or [`FALLBACK_PROJECT_NAME`] when missing.
    pub project_name: String,
    pub statistics: DocumentStats,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a document's structural minimum: version tag present, project
/// block present, project title non-empty. Version mismatch and empty
/// chapter/character collections only warn.
pub fn validate_document(doc: &ProjectDocument) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if doc.version.is_empty() {
        errors.push("缺少版本信息".to_string());
    } else if doc.version != SUPPORTED_VERSION {
        warnings.push(format!(
            "版本不匹配: 导入文件版本为 {}, 当前支持版本为 {}",
            doc.version, SUPPORTED_VERSION
        ));
    }

    match &doc.project {
        None => errors.push("缺少项目信息".to_string()),
        Some(project) if project.title.is_empty() => {
            errors.push("项目标题不能为空".to_string());
        }
        Some(_) => {}
    }

    let statistics = DocumentStats::of(doc);

    if statistics.chapters == 0 {
        warnings.push("项目没有章节数据".to_string());
    }
    if statistics.characters == 0 {
        warnings.push("项目没有角色数据".to_string());
    }

    let project_name = doc
        .project
        .as_ref()
        .filter(|p| !p.title.is_empty())
        .map(|p| p.title.clone())
        .unwrap_or_else(|| FALLBACK_PROJECT_NAME.to_string());

    ValidationReport {
        valid: errors.is_empty(),
        version: doc.version.clone(),
        project_name,
        statistics,
        errors,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
