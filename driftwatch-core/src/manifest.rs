//! Per-repository audit manifest.
//!
//! # Storage layout
//!
//! ```text
//! <repo>/
//!   driftwatch.yaml   (expected structure, hub mapping, remote settings)
//!   .env              (optional; credentials and page ids, never committed)
//! ```
//!
//! The manifest names *which* environment keys hold identifiers; it never
//! stores credentials or page ids itself.
//!
//! # API pattern
//!
//! Every function takes the repository root explicitly (`_at`), so tests run
//! against a `TempDir` and the CLI passes `--repo`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// File name of the manifest inside the audited repository.
pub const MANIFEST_FILE: &str = "driftwatch.yaml";

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";
pub const DEFAULT_MARKER: &str = "New Navigation Block";

// ---------------------------------------------------------------------------
// Manifest structs
// ---------------------------------------------------------------------------

/// Root of `driftwatch.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditManifest {
    #[serde(default)]
    pub remote: RemoteSection,
    /// Relative paths that must exist in the documentation tree.
    #[serde(default)]
    pub local_paths: Vec<String>,
    /// Labels that must appear somewhere under the remote root page.
    #[serde(default)]
    pub expected_titles: Vec<String>,
    /// Expected hub mapping: logical name -> env key holding the page id.
    #[serde(default)]
    pub hubs: Vec<HubEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_room: Option<DataRoomSection>,
}

/// Remote workspace connection and crawl settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSection {
    pub api_base: String,
    pub api_version: String,
    pub api_key_env: String,
    pub root_page_env: String,
    pub max_depth: usize,
    pub page_size: u32,
    pub timeout_secs: u64,
    /// Text that opens the currently active navigation section.
    pub marker: String,
}

impl Default for RemoteSection {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key_env: "NOTION_API_KEY".to_string(),
            root_page_env: "QT_BIG_PICTURE_PAGE_ID".to_string(),
            max_depth: 8,
            page_size: 100,
            timeout_secs: 30,
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// One hub of the expected mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubEntry {
    pub name: String,
    pub env: String,
}

/// Investor-facing data-room checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRoomSection {
    /// Files that must exist, relative to the repo root.
    #[serde(default)]
    pub required: Vec<String>,
    /// Directory holding alias documents and the methodology README.
    pub alias_dir: String,
    #[serde(default)]
    pub aliases: Vec<AliasEntry>,
    /// Strings the methodology README must mention.
    #[serde(default)]
    pub readme_references: Vec<String>,
    /// Path the root README's data-room pointer must reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_readme_pointer: Option<String>,
}

/// An alias document inside `alias_dir` pointing at a canonical file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub file: String,
    pub canonical: String,
    pub title: String,
}

impl AuditManifest {
    /// The manifest `init` writes: the documentation hub layout this tool
    /// was first built to guard.
    pub fn starter() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let hub = |name: &str, env: &str| HubEntry { name: name.to_string(), env: env.to_string() };
        let alias = |file: &str, canonical: &str, title: &str| AliasEntry {
            file: file.to_string(),
            canonical: canonical.to_string(),
            title: title.to_string(),
        };

        Self {
            remote: RemoteSection::default(),
            local_paths: strings(&[
                "docs/00_Administration",
                "docs/01_Legal",
                "docs/02_Finance",
                "docs/03_Technical",
                "docs/04_Defense",
                "docs/Data_Room",
            ]),
            expected_titles: strings(&[
                "QT - Canon",
                "QT - Log",
                "QT - ToDo",
                "QT - WBS Crosswalk",
                "QT - Due Diligence",
                "QT - Investors",
            ]),
            hubs: vec![
                hub("canon", "QT_CANON_PAGE_ID"),
                hub("log", "QT_LOG_PAGE_ID"),
                hub("todo", "QT_TODO_PAGE_ID"),
                hub("wbs_crosswalk", "QT_WBS_CROSSWALK_PAGE_ID"),
                hub("due_diligence", "QT_DUE_DILIGENCE_PAGE_ID"),
                hub("investors", "QT_INVESTORS_PAGE_ID"),
            ],
            data_room: Some(DataRoomSection {
                required: strings(&[
                    "docs/Data_Room/README.md",
                    "docs/Data_Room/01_Execution_Track_Record/Project_Management_Methodology/README.md",
                    "docs/WBS_MASTER_FORMAT.md",
                    "ARCHITECTURE.md",
                    "SECURITY.md",
                    "docs/SOP_NOTION_LOG_ORDERING.md",
                    "docs/EXEC_SUMMARY.md",
                    "qtlog.sh",
                    "CHANGELOG.md",
                ]),
                alias_dir: "docs/Data_Room/01_Execution_Track_Record/Project_Management_Methodology"
                    .to_string(),
                aliases: vec![
                    alias("WBS_MASTER_FORMAT.md", "docs/WBS_MASTER_FORMAT.md", "WBS Master Format"),
                    alias("ARCHITECTURE.md", "ARCHITECTURE.md", "Architecture"),
                    alias(
                        "SOP_NOTION_LOG_ORDERING.md",
                        "docs/SOP_NOTION_LOG_ORDERING.md",
                        "Notion Log Ordering SOP",
                    ),
                    alias(
                        "EXEC_SUMMARY.md",
                        "docs/EXEC_SUMMARY.md",
                        "Executive Summary (Non-Technical)",
                    ),
                ],
                readme_references: strings(&[
                    "docs/WBS_MASTER_FORMAT.md",
                    "qtlog.sh",
                    "CHANGELOG.md",
                    "docs/EXEC_SUMMARY.md",
                    "docs/SOP_NOTION_LOG_ORDERING.md",
                    "ARCHITECTURE.md",
                ]),
                root_readme_pointer: Some("docs/Data_Room/README.md".to_string()),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<repo>/driftwatch.yaml`. Pure, no I/O.
pub fn manifest_path_at(repo: &Path) -> PathBuf {
    repo.join(MANIFEST_FILE)
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load `<repo>/driftwatch.yaml`.
///
/// Returns `ManifestError::ManifestNotFound` if absent,
/// `ManifestError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(repo: &Path) -> Result<AuditManifest, ManifestError> {
    let path = manifest_path_at(repo);
    if !path.exists() {
        return Err(ManifestError::ManifestNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ManifestError::Parse { path, source: e })
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save the manifest: serialize → `.yaml.tmp` sibling → `rename`.
pub fn save_at(repo: &Path, manifest: &AuditManifest) -> Result<(), ManifestError> {
    let path = manifest_path_at(repo);
    let tmp_path = path.with_file_name(format!("{MANIFEST_FILE}.tmp"));

    let yaml = serde_yaml::to_string(manifest)?;
    std::fs::write(&tmp_path, yaml)?;
    if let Err(e) = std::fs::rename(&tmp_path, &path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Outcome of [`init_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    /// A manifest was already present and left untouched.
    Existing,
    Overwritten,
}

/// Write the starter manifest into `repo`.
///
/// Idempotent: an existing manifest is loaded and returned unchanged unless
/// `force` is set.
pub fn init_at(repo: &Path, force: bool) -> Result<(AuditManifest, InitOutcome), ManifestError> {
    let path = manifest_path_at(repo);
    let existed = path.exists();
    if existed && !force {
        return Ok((load_at(repo)?, InitOutcome::Existing));
    }

    let manifest = AuditManifest::starter();
    save_at(repo, &manifest)?;
    let outcome = if existed { InitOutcome::Overwritten } else { InitOutcome::Created };
    Ok((manifest, outcome))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
