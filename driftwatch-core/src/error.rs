//! Error types for driftwatch-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from manifest operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Underlying I/O failure (permission denied, disk full, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on load, including file path and line context from serde_yaml.
    #[error("failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The manifest file did not exist at the expected path.
    #[error("manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },
}

/// A remote block record that does not match the shape its `type` promises.
#[derive(Debug, Error)]
#[error("malformed `{kind}` block {id}: {message}")]
pub struct BlockDecodeError {
    pub id: String,
    pub kind: String,
    pub message: String,
}

/// One or more required environment keys are unset or blank.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing configuration: {}", keys.join(", "))]
pub struct MissingConfig {
    pub keys: Vec<String>,
}
