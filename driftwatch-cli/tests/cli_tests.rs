use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const REMOTE_KEYS: &[&str] = &[
    "NOTION_API_KEY",
    "QT_BIG_PICTURE_PAGE_ID",
    "QT_CANON_PAGE_ID",
    "QT_LOG_PAGE_ID",
    "QT_TODO_PAGE_ID",
    "QT_WBS_CROSSWALK_PAGE_ID",
    "QT_DUE_DILIGENCE_PAGE_ID",
    "QT_INVESTORS_PAGE_ID",
];

fn driftwatch_cmd(repo: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("driftwatch"));
    cmd.arg("--repo").arg(repo).env("NO_COLOR", "1").env_remove("RUST_LOG");
    for key in REMOTE_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

fn write(repo: &Path, relative: &str, content: &str) {
    let path = repo.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, content).expect("write file");
}

const LOCAL_ONLY: &str = "\
local_paths: [docs]
expected_titles: [Intro]
hubs:
  - name: canon
    env: QT_CANON_PAGE_ID
";

const DATA_ROOM: &str = "\
local_paths: [docs]
data_room:
  required: [ARCHITECTURE.md]
  alias_dir: docs/room
  aliases:
    - file: ARCHITECTURE.md
      canonical: ARCHITECTURE.md
      title: Architecture
  readme_references: [ARCHITECTURE.md]
  root_readme_pointer: docs/room/README.md
";

fn data_room_repo() -> TempDir {
    let repo = TempDir::new().expect("repo");
    write(repo.path(), "driftwatch.yaml", DATA_ROOM);
    write(repo.path(), "ARCHITECTURE.md", "# Architecture\n");
    write(repo.path(), "docs/room/README.md", "See ARCHITECTURE.md\n");
    write(repo.path(), "README.md", "# Project\n");
    repo
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_writes_manifest_once() {
    let repo = TempDir::new().expect("repo");

    driftwatch_cmd(repo.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Wrote"))
        .stdout(contains("NOTION_API_KEY"));
    assert!(repo.path().join("driftwatch.yaml").exists());

    driftwatch_cmd(repo.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("already exists"));

    driftwatch_cmd(repo.path())
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(contains("Overwrote"));
}

#[test]
fn commands_without_manifest_point_at_init() {
    let repo = TempDir::new().expect("repo");
    driftwatch_cmd(repo.path())
        .arg("verify")
        .assert()
        .failure()
        .stderr(contains("driftwatch init"));
}

// ---------------------------------------------------------------------------
// drift
// ---------------------------------------------------------------------------

#[test]
fn drift_without_credentials_skips_remote_phases_and_passes() {
    let repo = TempDir::new().expect("repo");
    write(repo.path(), "driftwatch.yaml", LOCAL_ONLY);
    fs::create_dir_all(repo.path().join("docs")).expect("docs");

    driftwatch_cmd(repo.path())
        .arg("drift")
        .assert()
        .success()
        .stdout(contains("SKIP:"))
        .stdout(contains("NOTION_API_KEY"));
}

#[test]
fn drift_missing_local_path_exits_with_audit_failure() {
    let repo = TempDir::new().expect("repo");
    write(repo.path(), "driftwatch.yaml", LOCAL_ONLY);

    driftwatch_cmd(repo.path())
        .arg("drift")
        .assert()
        .code(2)
        .stdout(contains("missing local path: docs"));
}

#[test]
fn drift_json_reports_phase_statuses() {
    let repo = TempDir::new().expect("repo");
    write(repo.path(), "driftwatch.yaml", LOCAL_ONLY);
    fs::create_dir_all(repo.path().join("docs")).expect("docs");

    let output = driftwatch_cmd(repo.path())
        .args(["drift", "--json"])
        .output()
        .expect("run drift");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["local"]["status"], "passed");
    assert_eq!(report["remote_titles"]["status"], "skipped");
    assert_eq!(report["hub_links"]["status"], "skipped");
}

#[test]
fn env_file_values_are_loaded() {
    let repo = TempDir::new().expect("repo");
    write(repo.path(), "driftwatch.yaml", LOCAL_ONLY);
    fs::create_dir_all(repo.path().join("docs")).expect("docs");
    write(repo.path(), ".env", "NOTION_API_KEY=secret\nQT_BIG_PICTURE_PAGE_ID=1234\n");

    let output = driftwatch_cmd(repo.path())
        .args(["drift", "--json"])
        .output()
        .expect("run drift");
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let reason = report["remote_titles"]["reason"].as_str().unwrap_or_default();
    assert!(reason.contains("QT_BIG_PICTURE_PAGE_ID (not a page id)"), "reason: {reason}");
    assert!(!reason.contains("NOTION_API_KEY"), "reason: {reason}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("secret"));
}

// ---------------------------------------------------------------------------
// verify / diff
// ---------------------------------------------------------------------------

#[test]
fn verify_reports_missing_alias_and_pointer() {
    let repo = data_room_repo();
    fs::create_dir_all(repo.path().join("docs")).expect("docs");

    driftwatch_cmd(repo.path())
        .arg("verify")
        .assert()
        .code(2)
        .stdout(contains("alias missing: ARCHITECTURE.md"))
        .stdout(contains("Data Room pointer missing"))
        .stdout(contains("CHECKS FAILED"));
}

#[test]
fn verify_fix_dry_run_writes_nothing() {
    let repo = data_room_repo();
    fs::create_dir_all(repo.path().join("docs")).expect("docs");

    driftwatch_cmd(repo.path())
        .args(["verify", "--fix", "--dry-run"])
        .assert()
        .code(2)
        .stdout(contains("[dry-run] would write"));

    assert!(!repo.path().join("docs/room/ARCHITECTURE.md").exists());
    let readme = fs::read_to_string(repo.path().join("README.md")).expect("readme");
    assert_eq!(readme, "# Project\n");
}

#[test]
fn dry_run_requires_fix() {
    let repo = data_room_repo();
    driftwatch_cmd(repo.path())
        .args(["verify", "--dry-run"])
        .assert()
        .failure();
}

#[test]
fn verify_fix_repairs_data_room_and_passes() {
    let repo = data_room_repo();
    fs::create_dir_all(repo.path().join("docs")).expect("docs");

    driftwatch_cmd(repo.path())
        .args(["verify", "--fix"])
        .assert()
        .success()
        .stdout(contains("ALL CHECKS PASSED"));

    let alias = fs::read_to_string(repo.path().join("docs/room/ARCHITECTURE.md")).expect("alias");
    assert!(alias.contains("Architecture"));
    let readme = fs::read_to_string(repo.path().join("README.md")).expect("readme");
    assert!(readme.starts_with("# Project"));
    assert!(readme.contains("## Data Room"));
    assert!(readme.contains("docs/room/README.md"));

    let backups = fs::read_dir(repo.path())
        .expect("read repo")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("README.md.bak."))
        .count();
    assert_eq!(backups, 1);

    driftwatch_cmd(repo.path())
        .arg("verify")
        .assert()
        .success()
        .stdout(contains("Data Room pointer present"));
}

#[test]
fn diff_previews_fixes_without_writing() {
    let repo = data_room_repo();

    driftwatch_cmd(repo.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(contains("b/docs/room/ARCHITECTURE.md"))
        .stdout(contains("+## Data Room"));
    assert!(!repo.path().join("docs/room/ARCHITECTURE.md").exists());

    driftwatch_cmd(repo.path()).args(["verify", "--fix"]).assert().success();
    driftwatch_cmd(repo.path())
        .arg("diff")
        .assert()
        .success()
        .stdout(contains("nothing to fix"));
}

// ---------------------------------------------------------------------------
// release / workflow
// ---------------------------------------------------------------------------

#[test]
fn release_check_passes_and_fails() {
    let repo = TempDir::new().expect("repo");
    write(
        repo.path(),
        "RELEASE.md",
        "# Releases\n\n## v1.0.0 — 2025-01-02\n\n- first\n\n## v1.1.0 — 2025-02-01\n\n- second\n",
    );
    driftwatch_cmd(repo.path())
        .arg("release")
        .assert()
        .success()
        .stdout(contains("2 releases, latest v1.1.0"));

    write(
        repo.path(),
        "NOTES.md",
        "## v2.0.0 — 2025-01-02\n\n- a\n\n## v1.0.0 — 2025-03-01\n\n- b\n",
    );
    driftwatch_cmd(repo.path())
        .args(["release", "NOTES.md"])
        .assert()
        .code(1)
        .stdout(contains("strictly increasing"));
}

#[test]
fn workflow_preflight_is_warn_only() {
    let repo = TempDir::new().expect("repo");
    driftwatch_cmd(repo.path())
        .arg("workflow")
        .assert()
        .success()
        .stdout(contains("not found"))
        .stdout(contains("warn-only"));
}
