//! `driftwatch verify [--fix [--dry-run]] [--json]`

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use driftwatch_audit::{
    checklist::PointerStatus, verify, DataRoomOutcome, FixMode, VerifyReport, WriteResult,
};
use driftwatch_core::config::process_env;

use super::{
    fail, load_dotenv, load_manifest, now, ok, print_drift, print_json, warn, EXIT_AUDIT_FAILED,
};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Create missing alias documents and the README pointer (local files only).
    #[arg(long)]
    pub fix: bool,

    /// With --fix: report what would be written without writing.
    #[arg(long, requires = "fix")]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl VerifyArgs {
    pub fn run(self, repo: &Path) -> Result<ExitCode> {
        let manifest = load_manifest(repo)?;
        load_dotenv(repo)?;

        let mode = match (self.fix, self.dry_run) {
            (false, _) => FixMode::Off,
            (true, true) => FixMode::DryRun,
            (true, false) => FixMode::Apply,
        };
        let report = verify(repo, &manifest, process_env, mode, now())
            .with_context(|| format!("verify failed in '{}'", repo.display()))?;

        if self.json {
            print_json(&report)?;
        } else {
            print_human(&report);
        }

        Ok(if report.passed() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(EXIT_AUDIT_FAILED)
        })
    }
}

fn print_human(report: &VerifyReport) {
    print_data_room(&report.data_room);
    print_drift(&report.drift);

    if report.passed() {
        println!("{}", "ALL CHECKS PASSED".green().bold());
    } else {
        println!("{}", "CHECKS FAILED".red().bold());
    }
}

fn print_data_room(outcome: &DataRoomOutcome) {
    for fix in &outcome.fixes {
        match fix {
            WriteResult::Written { path, backup } => {
                if let Some(backup) = backup {
                    ok(format!("backup: {}", backup.display()));
                }
                ok(format!("wrote {}", path.display()));
            }
            WriteResult::WouldWrite { path } => ok(format!("[dry-run] would write {}", path.display())),
        }
    }

    if let Some(checklist) = &outcome.checklist {
        for path in &checklist.missing_required {
            fail(format!("missing required: {path}"));
        }
        if checklist.missing_required.is_empty() {
            ok("required files: all present");
        }
        for alias in &checklist.missing_aliases {
            warn(format!("alias missing: {} (run with --fix to create)", alias.file));
        }
        for reference in &checklist.missing_references {
            warn(format!("methodology README missing reference: {reference}"));
        }
        if checklist.passed() {
            ok("data room completeness: PASS");
        }
    }

    match outcome.pointer {
        Some(PointerStatus::Present) => ok("root README: Data Room pointer present"),
        Some(PointerStatus::Missing) => {
            warn("root README: Data Room pointer missing (run with --fix to add)")
        }
        Some(PointerStatus::NoReadme) => warn("README.md missing (repo root); skipping pointer check"),
        None => {}
    }
}
