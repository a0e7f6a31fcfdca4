//! Drift reconciliation.
//!
//! Three independent phases feed one [`DriftReport`]:
//!
//! 1. **local**: every expected path exists under the repository root
//! 2. **remote titles**: every expected title matches a snippet of the crawl
//! 3. **hub links**: every expected hub is linked after the last marker
//!
//! Phases 2 and 3 share a single crawl. No phase short-circuits another;
//! a failure inside one phase only degrades that phase's outcome.

use std::collections::BTreeSet;
use std::path::Path;

use driftwatch_core::{
    Block, DriftReport, ExpectedMapping, MissingConfig, MissingHubLink, PageId, PhaseOutcome,
};
use driftwatch_text::{collect_link_targets, missing_labels, slice_from_last_marker, snippets};

use crate::client::BlockSource;
use crate::crawl::crawl;
use crate::error::AuditError;

/// Cause reported when the marker exists but nothing after it links anywhere.
pub const NO_LINKS_AFTER_MARKER: &str = "no links detected after marker";

/// Where and how far to crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlPlan {
    pub root: PageId,
    pub max_depth: usize,
    pub page_size: u32,
    pub marker: String,
}

/// A configured remote: the source to crawl plus the plan.
pub struct Remote<'a> {
    pub source: &'a dyn BlockSource,
    pub plan: CrawlPlan,
}

/// Runs the three phases against one repository and (optionally) one remote.
pub struct Reconciler<'a> {
    repo: &'a Path,
    remote: Result<Remote<'a>, MissingConfig>,
}

impl<'a> Reconciler<'a> {
    /// `remote` is `Err` when the credential or root id is not configured;
    /// both remote phases are then skipped.
    pub fn new(repo: &'a Path, remote: Result<Remote<'a>, MissingConfig>) -> Self {
        Reconciler { repo, remote }
    }

    pub fn reconcile(
        &self,
        local_paths: &[String],
        expected_titles: &[String],
        hubs: &Result<ExpectedMapping, MissingConfig>,
    ) -> DriftReport {
        let (local, missing_paths) = self.check_local(local_paths);

        let (remote_titles, missing_titles, hub_links, missing_hubs) = match &self.remote {
            Err(missing) => {
                tracing::warn!(%missing, "remote not configured; skipping remote phases");
                let skipped = PhaseOutcome::Skipped { reason: describe(missing.clone()) };
                (skipped.clone(), Vec::new(), skipped, Vec::new())
            }
            Ok(Remote { source, plan }) => {
                match crawl(*source, &plan.root, plan.max_depth, plan.page_size) {
                    Err(e) => {
                        tracing::warn!(error = %e, "crawl failed");
                        let errored = PhaseOutcome::Errored { cause: e.to_string() };
                        (errored.clone(), Vec::new(), errored, Vec::new())
                    }
                    Ok(blocks) => {
                        let (titles, missing_titles) = check_titles(&blocks, expected_titles);
                        let (hub_links, missing_hubs) = check_hubs(&blocks, &plan.marker, hubs);
                        (titles, missing_titles, hub_links, missing_hubs)
                    }
                }
            }
        };

        DriftReport {
            local,
            remote_titles,
            hub_links,
            missing_paths,
            missing_titles,
            missing_hubs,
        }
    }

    fn check_local(&self, local_paths: &[String]) -> (PhaseOutcome, Vec<String>) {
        let missing: Vec<String> = local_paths
            .iter()
            .filter(|p| !self.repo.join(p.as_str()).exists())
            .cloned()
            .collect();
        for path in &missing {
            tracing::warn!(path = %path, "missing local path");
        }
        tracing::info!(checked = local_paths.len(), missing = missing.len(), "local phase done");
        (verdict(missing.is_empty()), missing)
    }
}

/// Phase reasons and causes read the same as the [`AuditError`] they stand for.
fn describe(e: impl Into<AuditError>) -> String {
    e.into().to_string()
}

fn verdict(ok: bool) -> PhaseOutcome {
    if ok {
        PhaseOutcome::Passed
    } else {
        PhaseOutcome::Failed
    }
}

fn check_titles(blocks: &[Block], expected: &[String]) -> (PhaseOutcome, Vec<String>) {
    let found = snippets(blocks);
    let missing = missing_labels(expected, &found);
    for title in &missing {
        tracing::warn!(title = %title, "expected title not found under root");
    }
    tracing::info!(snippets = found.len(), missing = missing.len(), "remote title phase done");
    (verdict(missing.is_empty()), missing)
}

fn check_hubs(
    blocks: &[Block],
    marker: &str,
    hubs: &Result<ExpectedMapping, MissingConfig>,
) -> (PhaseOutcome, Vec<MissingHubLink>) {
    let hubs = match hubs {
        Err(missing) => {
            tracing::warn!(%missing, "hub mapping not configured; skipping hub phase");
            return (PhaseOutcome::Skipped { reason: describe(missing.clone()) }, Vec::new());
        }
        Ok(hubs) => hubs,
    };

    let active = match slice_from_last_marker(blocks, marker) {
        Ok(active) => active,
        Err(e) => {
            tracing::warn!(error = %e, "hub phase cannot run");
            return (PhaseOutcome::Errored { cause: describe(e) }, Vec::new());
        }
    };

    let linked: BTreeSet<PageId> = collect_link_targets(active);
    if linked.is_empty() {
        tracing::warn!(marker, "{}", NO_LINKS_AFTER_MARKER);
        return (PhaseOutcome::Errored { cause: NO_LINKS_AFTER_MARKER.to_string() }, Vec::new());
    }

    let missing: Vec<MissingHubLink> = hubs
        .iter()
        .filter(|hub| !hub.page_id.as_ref().is_some_and(|id| linked.contains(id)))
        .map(|hub| MissingHubLink {
            name: hub.name.clone(),
            env_key: hub.env_key.clone(),
            expected: hub.page_id.clone(),
        })
        .collect();
    for hub in &missing {
        match &hub.expected {
            Some(id) => tracing::warn!(hub = %hub.name, expected = %id, "hub link missing after marker"),
            None => tracing::warn!(hub = %hub.name, env = %hub.env_key, "hub id is not a valid page id"),
        }
    }
    tracing::info!(linked = linked.len(), missing = missing.len(), "hub link phase done");
    (verdict(missing.is_empty()), missing)
}
