//! Error types for driftwatch-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while rendering local documents.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template parse or render failure, including context building.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading override templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
