//! `lagoon-sync list`: registered resource types.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use lagoon_sync_synchers::SyncerRegistry;

/// Arguments for `lagoon-sync list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled, Serialize)]
struct SyncerRow {
    #[tabled(rename = "type")]
    #[serde(rename = "type")]
    id: &'static str,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let registry = SyncerRegistry::with_defaults()?;
        let rows: Vec<SyncerRow> = registry
            .plugin_ids()
            .into_iter()
            .map(|id| SyncerRow { id })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
