//! Local fixes: alias documents and the root README pointer.
//!
//! ## Write protocol
//!
//! 1. Render content (done while planning).
//! 2. Back up an existing file that is about to be rewritten.
//! 3. Write to `<path>.driftwatch.tmp`.
//! 4. Rename to the final path (atomic on POSIX).
//!
//! Nothing here talks to the remote store.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use driftwatch_core::manifest::DataRoomSection;
use driftwatch_renderer::{AliasContext, PointerContext, Renderer};

use crate::checklist::{read_or_empty, root_readme_path, ChecklistReport, PointerStatus};
use crate::error::{io_err, AuditError};

/// Suffix format of backup files: `README.md.bak.2026-01-02_093000`.
pub const BACKUP_STAMP: &str = "%Y-%m-%d_%H%M%S";

// ---------------------------------------------------------------------------
// Planned fixes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    /// A new alias document.
    Alias,
    /// The root README with the pointer block appended.
    ReadmePointer,
}

/// One file `--fix` would write, with its full new content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFix {
    pub kind: FixKind,
    pub path: PathBuf,
    /// Path relative to the repository root, `/`-separated.
    pub relative: String,
    pub content: String,
}

/// Render every fix the checklist results call for.
pub fn plan_fixes(
    repo: &Path,
    section: &DataRoomSection,
    checklist: &ChecklistReport,
    pointer: PointerStatus,
    renderer: &Renderer,
    now: NaiveDateTime,
) -> Result<Vec<PlannedFix>, AuditError> {
    let mut plans = Vec::new();

    for alias in &checklist.missing_aliases {
        let relative = Path::new(&section.alias_dir).join(&alias.file);
        let ctx = AliasContext::new(&relative, Path::new(&alias.canonical), &alias.title, now);
        plans.push(PlannedFix {
            kind: FixKind::Alias,
            path: repo.join(&relative),
            relative: format!("{}/{}", section.alias_dir.trim_end_matches('/'), alias.file),
            content: renderer.render_alias(&ctx)?,
        });
    }

    if let (PointerStatus::Missing, Some(target)) = (pointer, section.root_readme_pointer.as_deref()) {
        let path = root_readme_path(repo);
        let existing = read_or_empty(&path)?;
        let block = renderer.render_pointer(&PointerContext::new(target))?;
        plans.push(PlannedFix {
            kind: FixKind::ReadmePointer,
            path,
            relative: "README.md".to_string(),
            content: format!("{}\n\n{}", existing.trim_end(), block),
        });
    }

    Ok(plans)
}

// ---------------------------------------------------------------------------
// Applying fixes
// ---------------------------------------------------------------------------

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WriteResult {
    Written { path: PathBuf, backup: Option<PathBuf> },
    /// Dry run: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

/// Apply planned fixes in order; an existing README is backed up first.
pub fn apply_fixes(
    plans: &[PlannedFix],
    now: NaiveDateTime,
    dry_run: bool,
) -> Result<Vec<WriteResult>, AuditError> {
    let mut results = Vec::with_capacity(plans.len());
    for plan in plans {
        if dry_run {
            tracing::info!("[dry-run] would write: {}", plan.path.display());
            results.push(WriteResult::WouldWrite { path: plan.path.clone() });
            continue;
        }
        let backup = if plan.kind == FixKind::ReadmePointer && plan.path.exists() {
            Some(backup_file(&plan.path, now)?)
        } else {
            None
        };
        atomic_write(&plan.path, &plan.content)?;
        results.push(WriteResult::Written { path: plan.path.clone(), backup });
    }
    Ok(results)
}

/// Copy `path` to `<path>.bak.<timestamp>` and return the backup path.
pub fn backup_file(path: &Path, now: NaiveDateTime) -> Result<PathBuf, AuditError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let backup = path.with_file_name(format!("{name}.bak.{}", now.format(BACKUP_STAMP)));
    std::fs::copy(path, &backup).map_err(|e| io_err(path, e))?;
    tracing::info!("backup: {} -> {}", path.display(), backup.display());
    Ok(backup)
}

/// Atomically write `content` to `path`, creating parent directories.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), AuditError> {
    let tmp = PathBuf::from(format!("{}.driftwatch.tmp", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), AuditError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    tracing::info!("wrote: {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
