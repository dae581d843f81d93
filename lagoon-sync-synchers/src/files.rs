//! Files syncer: packs a directory into a tarball remotely and unpacks it locally.

use lagoon_sync_core::{
    config::unmarshal_section, syncer_config, transfer::output_directory_or_default, Environment,
    LocalOverride, SyncCommand, SyncerConfigRoot, SyncerSection, SyncerTransferResource,
    TransferResourceNaming,
};

use crate::error::SyncError;
use crate::syncer::{Syncer, SyncerPlugin};

pub const PLUGIN_ID: &str = "files";

const NAMING: TransferResourceNaming = TransferResourceNaming::file("lagoon_sync_files_", ".tar.gz");

syncer_config! {
    pub struct BaseFilesSync {
        /// Directory whose contents are synced; the working directory when unset.
        #[serde(rename = "sync-directory", alias = "syncdirectory", alias = "SyncDirectory")]
        pub sync_directory: String,
        /// `tar --exclude` patterns, relative to the sync directory.
        pub exclude: Vec<String>,
        #[serde(rename = "output-directory", alias = "outputdirectory", alias = "OutputDirectory")]
        pub output_directory: String,
    }
}

/// Decoded `files` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilesSyncRoot {
    pub config: BaseFilesSync,
    pub local_overrides: BaseFilesSync,
}

impl From<SyncerSection<BaseFilesSync>> for FilesSyncRoot {
    fn from(section: SyncerSection<BaseFilesSync>) -> Self {
        Self {
            config: section.config,
            local_overrides: section.local.config,
        }
    }
}

impl FilesSyncRoot {
    pub fn effective_local_config(&self) -> BaseFilesSync {
        self.config.with_local_overrides(&self.local_overrides)
    }
}

fn directory_or_cwd(directory: &str) -> &str {
    if directory.is_empty() {
        "."
    } else {
        directory
    }
}

impl Syncer for FilesSyncRoot {
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
        let m = &self.config;
        let excludes: String = m
            .exclude
            .iter()
            .map(|pattern| format!("--exclude={pattern} "))
            .collect();

        SyncCommand::new(format!(
            "tar -czf {} {excludes}-C {} .",
            resource.name,
            directory_or_cwd(&m.sync_directory),
        ))
    }

    fn local_command(&self, _environment: &Environment, resource: &SyncerTransferResource) -> SyncCommand {
        let l = self.effective_local_config();
        SyncCommand::new(format!(
            "tar -xzf {} -C {}",
            resource.name,
            directory_or_cwd(&l.sync_directory),
        ))
    }
}

/// Registers the `files` resource type.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilesSyncPlugin;

impl SyncerPlugin for FilesSyncPlugin {
    fn plugin_id(&self) -> &'static str {
        PLUGIN_ID
    }

    fn unmarshall(&self, root: &SyncerConfigRoot) -> Result<Box<dyn Syncer>, SyncError> {
        let section = unmarshal_section::<BaseFilesSync>(root, PLUGIN_ID)?;
        Ok(Box::new(FilesSyncRoot::from(section)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource() -> SyncerTransferResource {
        SyncerTransferResource {
            name: "/tmp/lagoon_sync_files_1.tar.gz".into(),
            is_directory: false,
        }
    }

    #[test]
    fn remote_command_packs_with_excludes() {
        let root = FilesSyncRoot {
            config: BaseFilesSync {
                sync_directory: "/app/web/sites/default/files".into(),
                exclude: vec!["css".into(), "js".into()],
                ..Default::default()
            },
            local_overrides: BaseFilesSync::default(),
        };
        assert_eq!(
            root.remote_command(&Environment::remote(), &resource()).as_str(),
            "tar -czf /tmp/lagoon_sync_files_1.tar.gz --exclude=css --exclude=js -C /app/web/sites/default/files ."
        );
    }

    #[test]
    fn unset_directories_fall_back_to_cwd() {
        let root = FilesSyncRoot::default();
        assert_eq!(
            root.remote_command(&Environment::remote(), &resource()).as_str(),
            "tar -czf /tmp/lagoon_sync_files_1.tar.gz -C . ."
        );
        assert_eq!(
            root.local_command(&Environment::local(), &resource()).as_str(),
            "tar -xzf /tmp/lagoon_sync_files_1.tar.gz -C ."
        );
    }

    #[test]
    fn local_command_unpacks_into_overridden_directory() {
        let root = FilesSyncRoot {
            config: BaseFilesSync {
                sync_directory: "/app/files".into(),
                ..Default::default()
            },
            local_overrides: BaseFilesSync {
                sync_directory: "web/files".into(),
                ..Default::default()
            },
        };
        assert_eq!(
            root.local_command(&Environment::local(), &resource()).as_str(),
            "tar -xzf /tmp/lagoon_sync_files_1.tar.gz -C web/files"
        );
    }
}
