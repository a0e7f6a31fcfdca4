//! Error types for driftwatch-audit.

use std::path::PathBuf;

use thiserror::Error;

use driftwatch_core::MissingConfig;
use driftwatch_renderer::RenderError;
use driftwatch_text::MarkerNotFound;

/// All errors that can arise while auditing.
///
/// `Network`, `Auth`, `Http` and `Parse` are fatal to the crawl that hit
/// them; the reconciler turns them into an errored phase rather than
/// propagating.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Remote unreachable, connection reset, or request timed out.
    #[error("network error: {message}")]
    Network { message: String },

    /// Credential rejected by the remote API.
    #[error("authentication rejected (HTTP {status}); check the API key and that the page is shared with the integration")]
    Auth { status: u16 },

    /// Any other non-2xx response.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body was not the expected JSON shape.
    #[error("malformed API payload: {0}")]
    Parse(String),

    /// Hub phase cause when the navigation marker is absent.
    #[error(transparent)]
    MarkerNotFound(#[from] MarkerNotFound),

    /// Skip reason for phases whose environment keys are unset.
    #[error(transparent)]
    ConfigMissing(#[from] MissingConfig),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience constructor for [`AuditError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> AuditError {
    AuditError::Io {
        path: path.into(),
        source,
    }
}
