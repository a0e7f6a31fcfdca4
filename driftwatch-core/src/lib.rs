//! driftwatch core library — block data model, audit manifest, errors.
//!
//! Public API surface:
//! - [`types`] — remote block model, [`PageId`], expectations, [`DriftReport`]
//! - [`error`] — [`ManifestError`], [`BlockDecodeError`], [`MissingConfig`]
//! - [`manifest`] — load / save / init of `driftwatch.yaml`
//! - [`config`] — environment resolution of identifiers and credentials

pub mod config;
pub mod error;
pub mod manifest;
pub mod types;

pub use config::{resolve_hubs, resolve_remote, RemoteSettings};
pub use error::{BlockDecodeError, ManifestError, MissingConfig};
pub use manifest::AuditManifest;
pub use types::{
    Block, BlockId, BlockKind, DriftReport, ExpectedHub, ExpectedMapping, HubName, MissingHubLink, PageId,
    PhaseOutcome, RichText, TextStyle,
};
