//! Subcommands and the output helpers they share.

pub mod diff;
pub mod drift;
pub mod init;
pub mod release;
pub mod verify;
pub mod workflow;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use driftwatch_core::{manifest, AuditManifest, DriftReport, PhaseOutcome};

/// Exit status for a failed audit.
pub const EXIT_AUDIT_FAILED: u8 = 2;

pub fn load_manifest(repo: &Path) -> Result<AuditManifest> {
    manifest::load_at(repo)
        .with_context(|| format!("cannot load manifest in '{}'; run `driftwatch init` first", repo.display()))
}

/// Load `<repo>/.env` into the process environment, if present.
/// Variables already set take precedence.
pub fn load_dotenv(repo: &Path) -> Result<()> {
    let path = repo.join(".env");
    if !path.exists() {
        return Ok(());
    }
    dotenvy::from_path(&path).with_context(|| format!("failed to read {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded environment file");
    Ok(())
}

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

// ---------------------------------------------------------------------------
// Status lines
// ---------------------------------------------------------------------------

pub fn ok(msg: impl AsRef<str>) {
    println!("{} {}", "OK:".green().bold(), msg.as_ref());
}

pub fn warn(msg: impl AsRef<str>) {
    println!("{} {}", "WARN:".yellow().bold(), msg.as_ref());
}

pub fn skip(msg: impl AsRef<str>) {
    println!("{} {}", "SKIP:".bright_black().bold(), msg.as_ref());
}

pub fn fail(msg: impl AsRef<str>) {
    println!("{} {}", "FAIL:".red().bold(), msg.as_ref());
}

// ---------------------------------------------------------------------------
// Drift report
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct PhaseRow {
    #[tabled(rename = "phase")]
    phase: &'static str,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn phase_detail(outcome: &PhaseOutcome, missing: usize) -> String {
    match outcome {
        PhaseOutcome::Passed => "all expectations met".to_string(),
        PhaseOutcome::Failed => format!("{missing} missing"),
        PhaseOutcome::Skipped { reason } => reason.clone(),
        PhaseOutcome::Errored { cause } => cause.clone(),
    }
}

fn status_cell(outcome: &PhaseOutcome) -> String {
    let label = outcome.label();
    match outcome {
        PhaseOutcome::Passed => label.green().bold().to_string(),
        PhaseOutcome::Failed | PhaseOutcome::Errored { .. } => label.red().bold().to_string(),
        PhaseOutcome::Skipped { .. } => label.bright_black().bold().to_string(),
    }
}

/// Itemized discrepancies followed by a per-phase table.
pub fn print_drift(report: &DriftReport) {
    for path in &report.missing_paths {
        fail(format!("missing local path: {path}"));
    }
    for title in &report.missing_titles {
        fail(format!("expected remote title not found: {title}"));
    }
    for hub in &report.missing_hubs {
        match &hub.expected {
            Some(id) => fail(format!("hub '{}' not linked after marker (expected {id})", hub.name)),
            None => fail(format!("hub '{}': {} is not a valid page id", hub.name, hub.env_key)),
        }
    }
    for (name, outcome) in [("remote titles", &report.remote_titles), ("hub links", &report.hub_links)] {
        match outcome {
            PhaseOutcome::Skipped { reason } => skip(format!("{name}: {reason}")),
            PhaseOutcome::Errored { cause } => fail(format!("{name}: {cause}")),
            _ => {}
        }
    }

    let rows = vec![
        PhaseRow {
            phase: "local paths",
            status: status_cell(&report.local),
            detail: phase_detail(&report.local, report.missing_paths.len()),
        },
        PhaseRow {
            phase: "remote titles",
            status: status_cell(&report.remote_titles),
            detail: phase_detail(&report.remote_titles, report.missing_titles.len()),
        },
        PhaseRow {
            phase: "hub links",
            status: status_cell(&report.hub_links),
            detail: phase_detail(&report.hub_links, report.missing_hubs.len()),
        },
    ];
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize report JSON")?
    );
    Ok(())
}
