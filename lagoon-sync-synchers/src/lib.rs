//! # lagoon-sync-synchers
//!
//! Resource-type syncers and the registry that resolves them.
//!
//! Build a [`SyncerRegistry`] with [`SyncerRegistry::with_defaults`], then
//! [`resolve`](SyncerRegistry::resolve) a configured resource type into a
//! [`PreparedSyncer`] and ask it for its remote command, local command and
//! transfer resource.
//!
//! ```
//! use lagoon_sync_core::{Environment, SyncerConfigRoot};
//! use lagoon_sync_synchers::SyncerRegistry;
//!
//! let root = SyncerConfigRoot::from_lagoon_yml(
//!     "lagoon-sync:\n  drupalconfig:\n    config:\n      output-directory: /data/\n",
//! )
//! .unwrap();
//! let registry = SyncerRegistry::with_defaults().unwrap();
//! let syncer = registry.resolve(&root, "drupalconfig").unwrap();
//! let resource = syncer.transfer_resource(&Environment::remote());
//! assert!(resource.name.starts_with("/data/drupalconfig-sync-"));
//! assert!(resource.is_directory);
//! ```

pub mod drupalconfig;
pub mod error;
pub mod files;
pub mod mariadb;
pub mod pipeline;
pub mod postgres;
pub mod registry;
pub mod syncer;

pub use error::SyncError;
pub use registry::SyncerRegistry;
pub use syncer::{prepare, PreparedSyncer, SyncPlan, Syncer, SyncerPlugin};
