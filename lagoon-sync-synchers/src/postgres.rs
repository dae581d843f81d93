//! PostgreSQL database syncer: `pg_dump` remotely, `pg_restore` locally.

use lagoon_sync_core::{
    config::unmarshal_section,
    syncer_config,
    transfer::output_directory_or_default,
    Environment, LocalOverride, SyncCommand, SyncerConfigRoot, SyncerSection,
    SyncerTransferResource, TransferResourceNaming,
};

use crate::error::SyncError;
use crate::syncer::{short_flag, Syncer, SyncerPlugin};

pub const PLUGIN_ID: &str = "postgres";

const NAMING: TransferResourceNaming = TransferResourceNaming::file("lagoon_sync_postgres_", ".sql");

syncer_config! {
    /// Connection and dump settings for one PostgreSQL database.
    pub struct BasePostgresSync {
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
        /// Tables left out of the dump entirely.
        #[serde(rename = "exclude-table")]
        pub exclude_table: Vec<String>,
        /// Tables dumped as schema only.
        #[serde(rename = "exclude-table-data")]
        pub exclude_table_data: Vec<String>,
        #[serde(rename = "output-directory", alias = "outputdirectory", alias = "OutputDirectory")]
        pub output_directory: String,
    }
}

/// Decoded `postgres` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostgresSyncRoot {
    pub config: BasePostgresSync,
    pub local_overrides: BasePostgresSync,
}

impl From<SyncerSection<BasePostgresSync>> for PostgresSyncRoot {
    fn from(section: SyncerSection<BasePostgresSync>) -> Self {
        Self {
            config: section.config,
            local_overrides: section.local.config,
        }
    }
}

impl PostgresSyncRoot {
    pub fn effective_local_config(&self) -> BasePostgresSync {
        self.config.with_local_overrides(&self.local_overrides)
    }
}

impl Syncer for PostgresSyncRoot {
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
        let tables_to_exclude: String = m
            .exclude_table
            .iter()
            .map(|table| format!("--exclude-table={}.{table} ", m.db_database))
            .collect();
        let tables_whose_data_to_exclude: String = m
            .exclude_table_data
            .iter()
            .map(|table| format!("--exclude-table-data={}.{table} ", m.db_database))
            .collect();

        SyncCommand::new(format!(
            "PGPASSWORD=\"{}\" pg_dump --no-owner {}{}{}{} {} {} > {}",
            m.db_password,
            short_flag("-h", &m.db_hostname),
            short_flag("-U", &m.db_username),
            short_flag("-p", &m.db_port),
            tables_to_exclude,
            tables_whose_data_to_exclude,
            m.db_database,
            resource.name,
        ))
    }

    fn local_command(&self, _environment: &Environment, resource: &SyncerTransferResource) -> SyncCommand {
        let l = self.effective_local_config();
        // libpq reads connection details from the environment; unset ones keep its defaults.
        let connection: String = [
            ("PGPASSWORD", &l.db_password),
            ("PGHOST", &l.db_hostname),
            ("PGPORT", &l.db_port),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(var, value)| format!("{var}=\"{value}\" "))
        .collect();

        SyncCommand::new(format!(
            "{connection}pg_restore --no-privileges --no-owner {}{}--clean < {}",
            short_flag("-U", &l.db_username),
            short_flag("-d", &l.db_database),
            resource.name,
        ))
    }
}

/// Registers the `postgres` resource type.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresSyncPlugin;

impl SyncerPlugin for PostgresSyncPlugin {
    fn plugin_id(&self) -> &'static str {
        PLUGIN_ID
    }

    fn unmarshall(&self, root: &SyncerConfigRoot) -> Result<Box<dyn Syncer>, SyncError> {
        let section = unmarshal_section::<BasePostgresSync>(root, PLUGIN_ID)?;
        Ok(Box::new(PostgresSyncRoot::from(section)))
    }
}

#[cfg(test)]
mod tests {
    use lagoon_sync_core::TransferId;

    use super::*;

    fn root() -> PostgresSyncRoot {
        PostgresSyncRoot {
            config: BasePostgresSync {
                db_hostname: "db".into(),
                db_username: "u".into(),
                db_password: "p".into(),
                db_port: "5432".into(),
                db_database: "app".into(),
                ..Default::default()
            },
            local_overrides: BasePostgresSync::default(),
        }
    }

    fn resource() -> SyncerTransferResource {
        SyncerTransferResource {
            name: "/tmp/dump.sql".into(),
            is_directory: false,
        }
    }

    #[test]
    fn remote_command_without_exclusions() {
        let cmd = root().remote_command(&Environment::remote(), &resource());
        assert_eq!(
            cmd.as_str(),
            "PGPASSWORD=\"p\" pg_dump --no-owner -hdb -Uu -p5432   app > /tmp/dump.sql"
        );
    }

    #[test]
    fn exclusions_keep_input_order() {
        let mut r = root();
        r.config.exclude_table = vec!["b".into(), "a".into()];
        let cmd = r.remote_command(&Environment::remote(), &resource());
        assert!(cmd.as_str().contains("--exclude-table=app.b --exclude-table=app.a "));
    }

    #[test]
    fn local_command_omits_unset_connection_vars() {
        let mut r = root();
        r.config.db_password.clear();
        r.config.db_port.clear();
        let cmd = r.local_command(&Environment::local(), &resource());
        assert_eq!(
            cmd.as_str(),
            "PGHOST=\"db\" pg_restore --no-privileges --no-owner -Uu -dapp --clean < /tmp/dump.sql"
        );
    }

    #[test]
    fn empty_username_does_not_swallow_database_flag() {
        let mut r = root();
        r.config.db_username.clear();
        let local = r.local_command(&Environment::local(), &resource());
        assert!(
            local.as_str().contains("--no-owner -dapp --clean < /tmp/dump.sql"),
            "got: {local}"
        );
        let remote = r.remote_command(&Environment::remote(), &resource());
        assert!(remote.as_str().contains("--no-owner -hdb -p5432 "), "got: {remote}");
        assert!(!remote.as_str().contains("-U"));
    }

    #[test]
    fn transfer_resource_is_a_sql_file_in_tmp() {
        let id = TransferId::generate().expect("id");
        let resource = root().transfer_resource(&Environment::remote(), &id);
        assert_eq!(resource.name, format!("/tmp/lagoon_sync_postgres_{id}.sql"));
        assert!(!resource.is_directory);
    }

    #[test]
    fn local_output_directory_override_does_not_move_the_artifact() {
        let mut r = root();
        r.local_overrides.output_directory = "/elsewhere/".into();
        assert_eq!(r.output_directory(), "/tmp/");
    }
}
