//! Warn-only preflight of the emergency auto-approve workflow.
//!
//! Nothing here fails a run: every finding is a warning string.

use std::io::ErrorKind;
use std::path::Path;

use serde_yaml::Value;

use crate::error::{io_err, AuditError};

pub const EMERGENCY_WORKFLOW: &str = ".github/workflows/emergency-auto-approve.yml";

/// Check `<repo>/.github/workflows/emergency-auto-approve.yml`.
///
/// Returns the warnings found; an empty list means the workflow looks sane.
pub fn preflight_at(repo: &Path) -> Result<Vec<String>, AuditError> {
    let path = repo.join(EMERGENCY_WORKFLOW);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(vec![format!(
                "{EMERGENCY_WORKFLOW} not found. Emergency auto-approve safeguard is missing."
            )]);
        }
        Err(e) => return Err(io_err(&path, e)),
    };
    Ok(preflight(&text))
}

/// Structural checks over the workflow source.
pub fn preflight(text: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let data: Value = match serde_yaml::from_str(text) {
        Ok(data) => data,
        Err(e) => return vec![format!("{EMERGENCY_WORKFLOW} is not valid YAML: {e}")],
    };
    if !data.is_mapping() {
        return vec![format!("{EMERGENCY_WORKFLOW} YAML root is not a mapping.")];
    }

    let name_ok = data
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|n| n.contains("Emergency"));
    if !name_ok {
        warnings.push("missing/odd top-level 'name' (expected to include 'Emergency').".into());
    }

    match data.get("on").and_then(|on| on.get("workflow_run")) {
        None => warnings.push("missing 'on.workflow_run' trigger.".into()),
        Some(run) => {
            if !lists(run.get("workflows"), "Compliance") {
                warnings.push("on.workflow_run.workflows does not include 'Compliance'.".into());
            }
            if !lists(run.get("types"), "completed") {
                warnings.push("on.workflow_run.types does not include 'completed'.".into());
            }
        }
    }

    match data.get("permissions") {
        Some(perms) if perms.is_mapping() => {
            if perms.get("pull-requests").and_then(Value::as_str) != Some("write") {
                warnings.push("permissions.pull-requests should be 'write'.".into());
            }
        }
        _ => warnings.push("missing/invalid top-level 'permissions'.".into()),
    }

    let Some(approve) = data.get("jobs").and_then(|jobs| jobs.get("approve")) else {
        warnings.push("missing jobs.approve.".into());
        return warnings;
    };
    if approve.get("steps").is_some_and(|steps| !steps.is_sequence()) {
        warnings.push("jobs.approve.steps is not a list.".into());
        return warnings;
    }

    if !text.contains("QT_EMERGENCY_REVIEW_TOKEN") {
        warnings.push("QT_EMERGENCY_REVIEW_TOKEN is not referenced.".into());
    }
    if !text.contains("EMERGENCY-MODE:") {
        warnings.push("EMERGENCY-MODE: gate is not present.".into());
    }
    warnings
}

/// `value` is `wanted` itself or a sequence containing it.
fn lists(value: Option<&Value>, wanted: &str) -> bool {
    match value {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Sequence(items)) => items.iter().any(|v| v.as_str() == Some(wanted)),
        _ => false,
    }
}
