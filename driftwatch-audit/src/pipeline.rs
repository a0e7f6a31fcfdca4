//! Audit entrypoints shared by every CLI command.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;

use driftwatch_core::{
    resolve_hubs, resolve_remote, AuditManifest, DriftReport, RemoteSettings,
};
use driftwatch_renderer::Renderer;

use crate::checklist::{check_data_room, check_readme_pointer, ChecklistReport, PointerStatus};
use crate::client::{BlockSource, NotionClient};
use crate::diff::{diff_fixes, FileDiff};
use crate::error::AuditError;
use crate::reconcile::{CrawlPlan, Reconciler, Remote};
use crate::writer::{apply_fixes, plan_fixes, PlannedFix, WriteResult};

// ---------------------------------------------------------------------------
// Drift
// ---------------------------------------------------------------------------

impl From<&RemoteSettings> for CrawlPlan {
    fn from(settings: &RemoteSettings) -> Self {
        CrawlPlan {
            root: settings.root.clone(),
            max_depth: settings.max_depth,
            page_size: settings.page_size,
            marker: settings.marker.clone(),
        }
    }
}

/// Reconcile against the live remote configured through `lookup`.
pub fn run_drift<F>(repo: &Path, manifest: &AuditManifest, lookup: F) -> DriftReport
where
    F: Fn(&str) -> Option<String>,
{
    run_drift_with(repo, manifest, lookup, |settings| {
        Box::new(NotionClient::from_settings(settings))
    })
}

/// As [`run_drift`], with the block source built by `connect`.
pub fn run_drift_with<F, C>(repo: &Path, manifest: &AuditManifest, lookup: F, connect: C) -> DriftReport
where
    F: Fn(&str) -> Option<String>,
    C: FnOnce(&RemoteSettings) -> Box<dyn BlockSource>,
{
    let hubs = resolve_hubs(&manifest.hubs, &lookup);
    match resolve_remote(&manifest.remote, &lookup) {
        Ok(settings) => {
            let source = connect(&settings);
            let remote = Remote { source: source.as_ref(), plan: CrawlPlan::from(&settings) };
            Reconciler::new(repo, Ok(remote)).reconcile(
                &manifest.local_paths,
                &manifest.expected_titles,
                &hubs,
            )
        }
        Err(missing) => Reconciler::new(repo, Err(missing)).reconcile(
            &manifest.local_paths,
            &manifest.expected_titles,
            &hubs,
        ),
    }
}

// ---------------------------------------------------------------------------
// Data room
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    Off,
    /// Plan fixes and report them without touching disk.
    DryRun,
    Apply,
}

/// Data-room checklist and README pointer, after any fixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataRoomOutcome {
    /// `None` when the manifest has no data-room section.
    pub checklist: Option<ChecklistReport>,
    /// `None` when no pointer target is configured.
    pub pointer: Option<PointerStatus>,
    pub fixes: Vec<WriteResult>,
}

impl DataRoomOutcome {
    pub fn passed(&self) -> bool {
        self.checklist.as_ref().map_or(true, ChecklistReport::passed)
            && self.pointer.map_or(true, |p| p.is_pass())
    }
}

fn check_local(repo: &Path, manifest: &AuditManifest) -> Result<DataRoomOutcome, AuditError> {
    let Some(section) = &manifest.data_room else {
        return Ok(DataRoomOutcome::default());
    };
    let checklist = check_data_room(repo, section)?;
    let pointer = match &section.root_readme_pointer {
        Some(target) => Some(check_readme_pointer(repo, target)?),
        None => None,
    };
    Ok(DataRoomOutcome { checklist: Some(checklist), pointer, fixes: Vec::new() })
}

fn planned(repo: &Path, manifest: &AuditManifest, now: NaiveDateTime) -> Result<Vec<PlannedFix>, AuditError> {
    let Some(section) = &manifest.data_room else {
        return Ok(Vec::new());
    };
    let current = check_local(repo, manifest)?;
    let checklist = current.checklist.unwrap_or_default();
    let pointer = current.pointer.unwrap_or(PointerStatus::Present);
    let renderer = Renderer::for_repo(repo)?;
    plan_fixes(repo, section, &checklist, pointer, &renderer, now)
}

/// Check the data room, applying fixes first when asked.
pub fn data_room_at(
    repo: &Path,
    manifest: &AuditManifest,
    mode: FixMode,
    now: NaiveDateTime,
) -> Result<DataRoomOutcome, AuditError> {
    if mode == FixMode::Off {
        return check_local(repo, manifest);
    }
    let plans = planned(repo, manifest, now)?;
    let fixes = apply_fixes(&plans, now, mode == FixMode::DryRun)?;
    let mut outcome = check_local(repo, manifest)?;
    outcome.fixes = fixes;
    Ok(outcome)
}

/// What `--fix` would change, as unified diffs.
pub fn preview_fixes(repo: &Path, manifest: &AuditManifest, now: NaiveDateTime) -> Result<Vec<FileDiff>, AuditError> {
    diff_fixes(&planned(repo, manifest, now)?)
}

// ---------------------------------------------------------------------------
// Verify
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub data_room: DataRoomOutcome,
    pub drift: DriftReport,
}

impl VerifyReport {
    pub fn passed(&self) -> bool {
        self.data_room.passed() && self.drift.passed()
    }
}

/// Data room (with optional fixes) followed by drift reconciliation.
pub fn verify<F>(
    repo: &Path,
    manifest: &AuditManifest,
    lookup: F,
    mode: FixMode,
    now: NaiveDateTime,
) -> Result<VerifyReport, AuditError>
where
    F: Fn(&str) -> Option<String>,
{
    let data_room = data_room_at(repo, manifest, mode, now)?;
    let drift = run_drift(repo, manifest, lookup);
    Ok(VerifyReport { data_room, drift })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;

    use chrono::NaiveDate;
    use driftwatch_core::{Block, PhaseOutcome};
    use tempfile::TempDir;

    use crate::client::ChildrenPage;

    use super::*;

    const ROOT: &str = "22222222222222222222222222222222";
    const CANON: &str = "cccccccccccccccccccccccccccccccc";

    struct Static(Vec<Block>);

    impl BlockSource for Static {
        fn fetch_children(&self, _: &str, _: u32, _: Option<&str>) -> Result<ChildrenPage, AuditError> {
            Ok(ChildrenPage { results: self.0.clone(), has_more: false, next_cursor: None })
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 6)
            .and_then(|d| d.and_hms_opt(7, 8, 9))
            .expect("valid date")
    }

    fn manifest() -> AuditManifest {
        serde_yaml::from_str(
            "local_paths: [docs]\n\
             expected_titles: [QT - Canon]\n\
             hubs:\n  - name: canon\n    env: CANON_ID\n\
             data_room:\n  required: [ARCH.md]\n  alias_dir: docs/pm\n  \
             aliases:\n    - {file: ARCH.md, canonical: ARCH.md, title: Architecture}\n  \
             root_readme_pointer: docs/README.md\n",
        )
        .expect("manifest")
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn repo() -> TempDir {
        let repo = TempDir::new().expect("tempdir");
        fs::create_dir_all(repo.path().join("docs")).expect("mkdir");
        fs::write(repo.path().join("ARCH.md"), "# arch\n").expect("write");
        fs::write(repo.path().join("README.md"), "# Project\n").expect("write");
        repo
    }

    #[test]
    fn drift_without_credentials_skips_remote_phases() {
        let repo = repo();
        let report = run_drift(repo.path(), &manifest(), env(&[]));
        assert_eq!(report.local, PhaseOutcome::Passed);
        assert!(matches!(&report.remote_titles, PhaseOutcome::Skipped { reason } if reason.contains("NOTION_API_KEY")));
        assert!(report.passed());
    }

    #[test]
    fn drift_with_injected_source() {
        let repo = repo();
        let lookup = env(&[
            ("NOTION_API_KEY", "k"),
            ("QT_BIG_PICTURE_PAGE_ID", ROOT),
            ("CANON_ID", CANON),
        ]);
        let blocks = vec![
            Block::child_page("p", "QT - Canon"),
            Block::callout("m", "New Navigation Block"),
            Block::link_to_page("l", CANON),
        ];
        let report = run_drift_with(repo.path(), &manifest(), lookup, |settings| {
            assert_eq!(settings.max_depth, 8);
            Box::new(Static(blocks))
        });
        assert!(report.passed(), "{report:?}");
        assert_eq!(report.hub_links, PhaseOutcome::Passed);
    }

    #[test]
    fn fix_modes() {
        let repo = repo();
        let m = manifest();

        let before = data_room_at(repo.path(), &m, FixMode::Off, now()).expect("check");
        assert!(!before.passed());
        assert_eq!(before.pointer, Some(PointerStatus::Missing));

        let dry = data_room_at(repo.path(), &m, FixMode::DryRun, now()).expect("dry run");
        assert_eq!(dry.fixes.len(), 2);
        assert!(!dry.passed());

        let diffs = preview_fixes(repo.path(), &m, now()).expect("preview");
        assert_eq!(diffs.len(), 2);

        let fixed = data_room_at(repo.path(), &m, FixMode::Apply, now()).expect("apply");
        assert!(fixed.passed(), "{fixed:?}");
        assert!(preview_fixes(repo.path(), &m, now()).expect("preview").is_empty());
    }

    #[test]
    fn verify_combines_both_halves() {
        let repo = repo();
        let report = verify(repo.path(), &manifest(), env(&[]), FixMode::Off, now()).expect("verify");
        assert!(report.drift.passed());
        assert!(!report.passed(), "data room gaps must fail verify");
    }
}
