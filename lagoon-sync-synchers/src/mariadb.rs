//! MariaDB/MySQL database syncer: `mysqldump` remotely, `mysql` locally.

use lagoon_sync_core::{
    config::unmarshal_section,
    syncer_config,
    transfer::output_directory_or_default,
    Environment, LocalOverride, SyncCommand, SyncerConfigRoot, SyncerSection,
    SyncerTransferResource, TransferResourceNaming,
};

use crate::error::SyncError;
use crate::syncer::{short_flag, Syncer, SyncerPlugin};

pub const PLUGIN_ID: &str = "mariadb";

const NAMING: TransferResourceNaming = TransferResourceNaming::file("lagoon_sync_mariadb_", ".sql");

syncer_config! {
    pub struct BaseMariaDbSync {
        #[serde(rename = "hostname")]
        pub db_hostname: String,
        #[serde(rename = "username")]
        pub db_username: String,
        #[serde(rename = "password")]
        pub db_password: String,
        #[serde(rename = "port")]
        pub db_port: String,
        #[serde(rename = "database")]
        pub db_database: String,
        #[serde(rename = "ignore-table")]
        pub ignore_table: Vec<String>,
        #[serde(rename = "output-directory", alias = "outputdirectory", alias = "OutputDirectory")]
        pub output_directory: String,
    }
}

/// Decoded `mariadb` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MariaDbSyncRoot {
    pub config: BaseMariaDbSync,
    pub local_overrides: BaseMariaDbSync,
}

impl From<SyncerSection<BaseMariaDbSync>> for MariaDbSyncRoot {
    fn from(section: SyncerSection<BaseMariaDbSync>) -> Self {
        Self {
            config: section.config,
            local_overrides: section.local.config,
        }
    }
}

impl MariaDbSyncRoot {
    pub fn effective_local_config(&self) -> BaseMariaDbSync {
        self.config.with_local_overrides(&self.local_overrides)
    }
}

impl Syncer for MariaDbSyncRoot {
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
        let tables_to_ignore: String = m
            .ignore_table
            .iter()
            .map(|table| format!("--ignore-table={}.{table} ", m.db_database))
            .collect();

        SyncCommand::new(format!(
            "mysqldump --max-allowed-packet=500M --quick --add-locks --no-autocommit --single-transaction {}{}{}{}{}{} > {}",
            short_flag("-h", &m.db_hostname),
            short_flag("-u", &m.db_username),
            short_flag("-p", &m.db_password),
            short_flag("-P", &m.db_port),
            tables_to_ignore,
            m.db_database,
            resource.name,
        ))
    }

    fn local_command(&self, _environment: &Environment, resource: &SyncerTransferResource) -> SyncCommand {
        let l = self.effective_local_config();
        SyncCommand::new(format!(
            "mysql {}{}{}{}{} < {}",
            short_flag("-h", &l.db_hostname),
            short_flag("-u", &l.db_username),
            short_flag("-p", &l.db_password),
            short_flag("-P", &l.db_port),
            l.db_database,
            resource.name,
        ))
    }
}

/// Registers the `mariadb` resource type.
#[derive(Debug, Clone, Copy, Default)]
pub struct MariaDbSyncPlugin;

impl SyncerPlugin for MariaDbSyncPlugin {
    fn plugin_id(&self) -> &'static str {
        PLUGIN_ID
    }

    fn unmarshall(&self, root: &SyncerConfigRoot) -> Result<Box<dyn Syncer>, SyncError> {
        let section = unmarshal_section::<BaseMariaDbSync>(root, PLUGIN_ID)?;
        Ok(Box::new(MariaDbSyncRoot::from(section)))
    }
}
