//! The syncer capability, its plugin factory, and the prepared handle.
//!
//! A [`Syncer`] knows how to render commands for one resource type but has
//! no transfer identity. [`prepare`] assigns one and returns a
//! [`PreparedSyncer`], the only type that exposes the three sync outputs.

use std::fmt;

use serde::Serialize;

use lagoon_sync_core::{
    Environment, SyncCommand, SyncerConfigRoot, SyncerTransferResource, TransferId,
    TransferResourceNaming,
};

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// One resource type's command rendering, decoded from configuration.
pub trait Syncer: fmt::Debug + Send + Sync {
    /// Identifier of the plugin that decoded this syncer.
    fn plugin_id(&self) -> &'static str;

    /// Naming scheme of this resource type's transfer artifact.
    fn naming(&self) -> TransferResourceNaming;

    /// Base output directory, or the default when unset.
    fn output_directory(&self) -> &str;

    /// Export command run in the remote environment, built from base configuration.
    fn remote_command(&self, environment: &Environment, resource: &SyncerTransferResource) -> SyncCommand;

    /// Import command run in the local environment, built from effective configuration.
    fn local_command(&self, environment: &Environment, resource: &SyncerTransferResource) -> SyncCommand;

    fn transfer_resource(&self, _environment: &Environment, transfer_id: &TransferId) -> SyncerTransferResource {
        self.naming().resource(self.output_directory(), transfer_id)
    }
}

/// Factory registered under a configuration key.
pub trait SyncerPlugin: Send + Sync {
    /// Stable lowercase identifier; matches the key under `lagoon-sync`.
    fn plugin_id(&self) -> &'static str;

    /// Decode this plugin's section of `root` into an unprepared syncer.
    fn unmarshall(&self, root: &SyncerConfigRoot) -> Result<Box<dyn Syncer>, SyncError>;
}

// ---------------------------------------------------------------------------
// Prepared syncer
// ---------------------------------------------------------------------------

/// A syncer bound to its transfer identity.
#[derive(Debug)]
pub struct PreparedSyncer {
    syncer: Box<dyn Syncer>,
    transfer_id: TransferId,
}

/// Assign a fresh transfer identity to `syncer`.
pub fn prepare(syncer: Box<dyn Syncer>) -> Result<PreparedSyncer, SyncError> {
    let transfer_id = TransferId::generate()?;
    tracing::info!(
        plugin = syncer.plugin_id(),
        transfer_id = %transfer_id,
        "prepared syncer"
    );
    Ok(PreparedSyncer {
        syncer,
        transfer_id,
    })
}

impl PreparedSyncer {
    pub fn plugin_id(&self) -> &'static str {
        self.syncer.plugin_id()
    }

    pub fn transfer_id(&self) -> &TransferId {
        &self.transfer_id
    }

    pub fn output_directory(&self) -> &str {
        self.syncer.output_directory()
    }

    pub fn transfer_resource(&self, environment: &Environment) -> SyncerTransferResource {
        self.syncer.transfer_resource(environment, &self.transfer_id)
    }

    pub fn remote_command(&self, environment: &Environment) -> SyncCommand {
        let resource = self.transfer_resource(environment);
        let command = self.syncer.remote_command(environment, &resource);
        tracing::debug!(plugin = self.plugin_id(), %environment, %command, "rendered remote command");
        command
    }

    pub fn local_command(&self, environment: &Environment) -> SyncCommand {
        let resource = self.transfer_resource(environment);
        let command = self.syncer.local_command(environment, &resource);
        tracing::debug!(plugin = self.plugin_id(), %environment, %command, "rendered local command");
        command
    }

    /// All three outputs at once, in the order a transfer uses them.
    pub fn plan(&self, remote: &Environment, local: &Environment) -> SyncPlan {
        SyncPlan {
            plugin: self.plugin_id().to_string(),
            transfer_id: self.transfer_id.to_string(),
            remote_command: self.remote_command(remote),
            local_command: self.local_command(local),
            transfer_resource: self.transfer_resource(remote),
        }
    }
}

/// Rendered outputs of one prepared syncer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub plugin: String,
    pub transfer_id: String,
    pub remote_command: SyncCommand,
    pub local_command: SyncCommand,
    pub transfer_resource: SyncerTransferResource,
}

/// `-Uvalue ` for a set value, nothing for an empty one. A short option
/// followed by a space would take the next argument as its value.
pub(crate) fn short_flag(flag: &str, value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{flag}{value} ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
