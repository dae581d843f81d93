//! lagoon-sync core library: domain types, configuration document, errors.
//!
//! Public API surface:
//! - [`types`]: environments, commands, transfer resources and identities
//! - [`error`]: [`ConfigError`], [`TransferIdError`]
//! - [`config`]: the `lagoon-sync` configuration document and section decoding
//! - [`overrides`]: local-override resolution for syncer configuration shapes
//! - [`transfer`]: transfer resource naming

// `syncer_config!` names this crate by path, including from inside it.
extern crate self as lagoon_sync_core;

pub mod config;
pub mod error;
pub mod overrides;
pub mod transfer;
pub mod types;

pub use config::{LocalSection, SyncerConfigRoot, SyncerSection};
pub use error::{ConfigError, TransferIdError};
pub use overrides::{LocalOverride, OverrideField};
pub use transfer::{TransferResourceNaming, DEFAULT_OUTPUT_DIRECTORY};
pub use types::{Environment, SyncCommand, SyncerTransferResource, TransferId};
