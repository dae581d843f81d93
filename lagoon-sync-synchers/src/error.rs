//! Error types for lagoon-sync-synchers.

use thiserror::Error;

use lagoon_sync_core::{ConfigError, TransferIdError};

/// All errors that can arise while resolving and preparing syncers.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The configuration names a resource type no plugin is registered for.
    #[error("unknown syncer type `{id}`")]
    UnknownSyncer { id: String },

    /// A second plugin tried to register an identifier already in use.
    #[error("a syncer is already registered for `{id}`")]
    DuplicatePlugin { id: String },

    /// Section missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No transfer identity could be issued.
    #[error("cannot prepare syncer: {0}")]
    Clock(#[from] TransferIdError),
}
