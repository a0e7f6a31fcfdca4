//! # driftwatch-audit
//!
//! Remote crawling, drift reconciliation and the local repository checks
//! around it.
//!
//! - [`client`] — [`BlockSource`] seam and the blocking HTTP [`NotionClient`]
//! - [`crawl`] — depth-bounded BFS over the remote block tree
//! - [`reconcile`] — the three-phase [`Reconciler`]
//! - [`checklist`], [`writer`], [`diff`] — data room checks, fixes, previews
//! - [`release_notes`], [`workflow`] — standalone repository checks
//! - [`pipeline`] — entrypoints used by the CLI

pub mod checklist;
pub mod client;
pub mod crawl;
pub mod diff;
pub mod error;
pub mod pipeline;
pub mod reconcile;
pub mod release_notes;
pub mod workflow;
pub mod writer;

pub use client::{BlockSource, ChildrenPage, NotionClient};
pub use crawl::crawl;
pub use error::AuditError;
pub use pipeline::{
    data_room_at, preview_fixes, run_drift, run_drift_with, verify, DataRoomOutcome, FixMode,
    VerifyReport,
};
pub use reconcile::{CrawlPlan, Reconciler, Remote};
pub use writer::WriteResult;
