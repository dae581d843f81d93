//! Drupal configuration syncer: `drush config-export` remotely, `config-import` locally.

use lagoon_sync_core::{
    config::unmarshal_section, syncer_config, transfer::output_directory_or_default, Environment,
    LocalOverride, SyncCommand, SyncerConfigRoot, SyncerSection, SyncerTransferResource,
    TransferResourceNaming,
};

use crate::error::SyncError;
use crate::syncer::{Syncer, SyncerPlugin};

pub const PLUGIN_ID: &str = "drupalconfig";

const NAMING: TransferResourceNaming = TransferResourceNaming::directory("drupalconfig-sync-");

syncer_config! {
    pub struct BaseDrupalconfigSync {
        /// Drupal root to run drush from; drush's own lookup applies when unset.
        #[serde(rename = "sync-path", alias = "syncpath", alias = "SyncPath")]
        pub sync_path: String,
        #[serde(rename = "output-directory", alias = "outputdirectory", alias = "OutputDirectory")]
        pub output_directory: String,
    }
}

/// Decoded `drupalconfig` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrupalconfigSyncRoot {
    pub config: BaseDrupalconfigSync,
    pub local_overrides: BaseDrupalconfigSync,
}

impl From<SyncerSection<BaseDrupalconfigSync>> for DrupalconfigSyncRoot {
    fn from(section: SyncerSection<BaseDrupalconfigSync>) -> Self {
        Self {
            config: section.config,
            local_overrides: section.local.config,
        }
    }
}

impl DrupalconfigSyncRoot {
    pub fn effective_local_config(&self) -> BaseDrupalconfigSync {
        self.config.with_local_overrides(&self.local_overrides)
    }
}

fn in_sync_path(sync_path: &str, command: String) -> SyncCommand {
    if sync_path.is_empty() {
        SyncCommand::new(command)
    } else {
        SyncCommand::new(format!("cd {sync_path} && {command}"))
    }
}

impl Syncer for DrupalconfigSyncRoot {
    fn plugin_id(&self) -> &'static str {
        PLUGIN_ID
    }

    fn naming(&self) -> TransferResourceNaming {
        NAMING
    }

    fn output_directory(&self) -> &str {
        output_directory_or_default(&self.config.output_directory)
    }

    fn remote_command(&self, _environment: &Environment, resource: &SyncerTransferResource) -> SyncCommand {
        in_sync_path(
            &self.config.sync_path,
            format!("drush config-export --destination={}", resource.name),
        )
    }

    fn local_command(&self, _environment: &Environment, resource: &SyncerTransferResource) -> SyncCommand {
        let l = self.effective_local_config();
        in_sync_path(
            &l.sync_path,
            format!("drush -y config-import --source={}", resource.name),
        )
    }
}

/// Registers the `drupalconfig` resource type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrupalConfigSyncPlugin;

impl SyncerPlugin for DrupalConfigSyncPlugin {
    fn plugin_id(&self) -> &'static str {
        PLUGIN_ID
    }

    fn unmarshall(&self, root: &SyncerConfigRoot) -> Result<Box<dyn Syncer>, SyncError> {
        let section = unmarshal_section::<BaseDrupalconfigSync>(root, PLUGIN_ID)?;
        Ok(Box::new(DrupalconfigSyncRoot::from(section)))
    }
}
