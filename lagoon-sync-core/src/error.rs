//! Error types for lagoon-sync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or decoding sync configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with file path and line context from serde_yaml.
    #[error("failed to parse configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// YAML parse error for an in-memory document.
    #[error("failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document has no section for a syncer that was asked for.
    #[error("no `{plugin}` section in the lagoon-sync configuration")]
    MissingSection { plugin: String },

    /// A syncer section exists but does not match the syncer's configuration shape.
    #[error("invalid `{plugin}` configuration: {source}")]
    Malformed {
        plugin: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// The system clock could not be expressed as nanoseconds since the Unix epoch.
#[derive(Debug, Error)]
#[error("system clock is outside the range representable as epoch nanoseconds")]
pub struct TransferIdError;
