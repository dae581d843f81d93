//! Plugin registry: configuration key → syncer factory.
//!
//! A registry is an ordinary value. Build one at startup, register plugins
//! into it, then share it by reference. Tests build registries holding only
//! the plugins they exercise.

use std::collections::BTreeMap;
use std::fmt;

use lagoon_sync_core::SyncerConfigRoot;

use crate::drupalconfig::DrupalConfigSyncPlugin;
use crate::error::SyncError;
use crate::files::FilesSyncPlugin;
use crate::mariadb::MariaDbSyncPlugin;
use crate::postgres::PostgresSyncPlugin;
use crate::syncer::{prepare, PreparedSyncer, SyncerPlugin};

#[derive(Default)]
pub struct SyncerRegistry {
    plugins: BTreeMap<&'static str, Box<dyn SyncerPlugin>>,
}

impl fmt::Debug for SyncerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.plugins.keys()).finish()
    }
}

impl SyncerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every compiled-in resource type.
    pub fn with_defaults() -> Result<Self, SyncError> {
        let mut registry = Self::new();
        registry.register(PostgresSyncPlugin)?;
        registry.register(DrupalConfigSyncPlugin)?;
        registry.register(MariaDbSyncPlugin)?;
        registry.register(FilesSyncPlugin)?;
        Ok(registry)
    }

    /// Add `plugin` under its identifier.
    ///
    /// Fails with [`SyncError::DuplicatePlugin`] if the identifier is taken;
    /// the existing plugin stays registered.
    pub fn register<P: SyncerPlugin + 'static>(&mut self, plugin: P) -> Result<(), SyncError> {
        let id = plugin.plugin_id();
        if self.plugins.contains_key(id) {
            return Err(SyncError::DuplicatePlugin { id: id.to_owned() });
        }
        tracing::debug!(plugin = id, "registered syncer");
        self.plugins.insert(id, Box::new(plugin));
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<&dyn SyncerPlugin> {
        self.plugins.get(id).map(|plugin| plugin.as_ref())
    }

    /// Registered identifiers, sorted.
    pub fn plugin_ids(&self) -> Vec<&'static str> {
        self.plugins.keys().copied().collect()
    }

    /// Decode and prepare the syncer configured under `id`.
    pub fn resolve(&self, root: &SyncerConfigRoot, id: &str) -> Result<PreparedSyncer, SyncError> {
        let plugin = self
            .lookup(id)
            .ok_or_else(|| SyncError::UnknownSyncer { id: id.to_owned() })?;
        let syncer = plugin.unmarshall(root)?;
        prepare(syncer)
    }

    /// Resolve every section present in `root`, in key order.
    ///
    /// A failing section is reported in place and does not stop the rest.
    pub fn resolve_all(&self, root: &SyncerConfigRoot) -> Vec<(String, Result<PreparedSyncer, SyncError>)> {
        root.plugin_ids()
            .map(|id| {
                let result = self.resolve(root, id);
                if let Err(err) = &result {
                    tracing::warn!(plugin = id, error = %err, "skipping syncer section");
                }
                (id.to_owned(), result)
            })
            .collect()
    }
}
