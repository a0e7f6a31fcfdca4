//! Local data-room checklist and root README pointer check.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;

use driftwatch_core::manifest::{AliasEntry, DataRoomSection};

use crate::error::{io_err, AuditError};

/// Heading that introduces the pointer block in the root README.
pub const POINTER_HEADING: &str = "## Data Room";

/// File inside `alias_dir` that must reference the canonical documents.
pub const METHODOLOGY_README: &str = "README.md";

// ---------------------------------------------------------------------------
// Data room
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChecklistReport {
    pub missing_required: Vec<String>,
    pub missing_aliases: Vec<AliasEntry>,
    pub missing_references: Vec<String>,
}

impl ChecklistReport {
    pub fn passed(&self) -> bool {
        self.missing_required.is_empty()
            && self.missing_aliases.is_empty()
            && self.missing_references.is_empty()
    }
}

/// Check the data room under `repo`.
///
/// When any required file is missing, alias and reference checks are not
/// attempted.
pub fn check_data_room(repo: &Path, section: &DataRoomSection) -> Result<ChecklistReport, AuditError> {
    let missing_required: Vec<String> = section
        .required
        .iter()
        .filter(|p| !repo.join(p.as_str()).exists())
        .cloned()
        .collect();
    if !missing_required.is_empty() {
        for path in &missing_required {
            tracing::warn!(path = %path, "missing required file");
        }
        return Ok(ChecklistReport { missing_required, ..Default::default() });
    }

    let alias_dir = repo.join(&section.alias_dir);
    let missing_aliases: Vec<AliasEntry> = section
        .aliases
        .iter()
        .filter(|alias| !alias_dir.join(&alias.file).exists())
        .cloned()
        .collect();

    let readme = read_or_empty(&alias_dir.join(METHODOLOGY_README))?;
    let missing_references: Vec<String> = section
        .readme_references
        .iter()
        .filter(|r| !readme.contains(r.as_str()))
        .cloned()
        .collect();

    for alias in &missing_aliases {
        tracing::warn!(file = %alias.file, "alias document missing");
    }
    for reference in &missing_references {
        tracing::warn!(reference = %reference, "methodology README missing reference");
    }

    Ok(ChecklistReport { missing_required, missing_aliases, missing_references })
}

// ---------------------------------------------------------------------------
// Root README pointer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerStatus {
    Present,
    Missing,
    /// No root README at all; reported as a warning, not a failure.
    NoReadme,
}

impl PointerStatus {
    pub fn is_pass(&self) -> bool {
        !matches!(self, PointerStatus::Missing)
    }
}

pub fn root_readme_path(repo: &Path) -> PathBuf {
    repo.join("README.md")
}

/// The root README must contain both the pointer heading and `target`.
pub fn check_readme_pointer(repo: &Path, target: &str) -> Result<PointerStatus, AuditError> {
    let path = root_readme_path(repo);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PointerStatus::NoReadme),
        Err(e) => return Err(io_err(&path, e)),
    };
    if content.contains(POINTER_HEADING) && content.contains(target) {
        Ok(PointerStatus::Present)
    } else {
        Ok(PointerStatus::Missing)
    }
}

pub(crate) fn read_or_empty(path: &Path) -> Result<String, AuditError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content.replace("\r\n", "\n")),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(io_err(path, e)),
    }
}
