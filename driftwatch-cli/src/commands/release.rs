//! `driftwatch release [PATH]` — release-notes format and ordering.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use driftwatch_audit::release_notes::{check_release_file, ReleaseCheck, DEFAULT_RELEASE_FILE};

use super::{fail, ok};

#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Release notes file, relative to the repository root.
    #[arg(default_value = DEFAULT_RELEASE_FILE)]
    pub path: PathBuf,
}

impl ReleaseArgs {
    pub fn run(self, repo: &Path) -> Result<ExitCode> {
        let path = repo.join(&self.path);
        let check = check_release_file(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;

        match check {
            ReleaseCheck::Passed(summary) => {
                ok(format!(
                    "{}: format + ordering checks passed ({} releases, latest {})",
                    self.path.display(),
                    summary.releases,
                    summary.latest,
                ));
                Ok(ExitCode::SUCCESS)
            }
            ReleaseCheck::Failed(violation) => {
                fail(format!("{} check failed: {violation}", self.path.display()));
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
