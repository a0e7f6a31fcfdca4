//! Unified-diff preview of `--fix` for `driftwatch diff`.

use similar::TextDiff;

use crate::checklist::read_or_empty;
use crate::error::AuditError;
use crate::writer::PlannedFix;

/// A single planned write rendered as a diff against on-disk content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub relative: String,
    pub unified_diff: String,
}

/// Compare each planned fix with what is on disk. Writes nothing.
///
/// Plans whose content already matches the file are omitted.
pub fn diff_fixes(plans: &[PlannedFix]) -> Result<Vec<FileDiff>, AuditError> {
    let mut diffs = Vec::new();
    for plan in plans {
        let existing = read_or_empty(&plan.path)?;
        let rendered = plan.content.replace("\r\n", "\n");
        if existing == rendered {
            continue;
        }

        let old_header = format!("a/{}", plan.relative);
        let new_header = format!("b/{}", plan.relative);
        let unified = TextDiff::from_lines(&existing, &rendered)
            .unified_diff()
            .header(&old_header, &new_header)
            .context_radius(3)
            .to_string();

        diffs.push(FileDiff { relative: plan.relative.clone(), unified_diff: unified });
    }
    Ok(diffs)
}
