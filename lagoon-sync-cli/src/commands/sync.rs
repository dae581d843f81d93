//! `lagoon-sync sync`: resolve resource types and print their sync plans.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use lagoon_sync_core::{config, Environment};
use lagoon_sync_synchers::{
    pipeline::{self, SyncOutcome, SyncScope},
    SyncPlan, SyncerRegistry,
};

/// Arguments for `lagoon-sync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Resource type to sync, e.g. `postgres` or `drupalconfig` (omit when using `--all`).
    #[arg(required_unless_present = "all")]
    pub syncer: Option<String>,

    /// Plan every resource type configured under `lagoon-sync`.
    #[arg(long, conflicts_with = "syncer")]
    pub all: bool,

    /// Configuration file holding the `lagoon-sync` sections.
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Name of the environment the export command runs in.
    #[arg(long, default_value = "remote")]
    pub remote_environment: String,

    /// Name of the environment the import command runs in.
    #[arg(long, default_value = "local")]
    pub local_environment: String,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct OutcomeJson<'a> {
    syncer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<&'a SyncPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let root = config::load_at(&self.config)
            .with_context(|| format!("could not load {}", self.config.display()))?;
        let registry = SyncerRegistry::with_defaults()?;
        let remote = Environment::from(self.remote_environment.as_str());
        let local = Environment::from(self.local_environment.as_str());

        let scope = if self.all {
            SyncScope::All
        } else {
            SyncScope::Syncer(
                self.syncer
                    .clone()
                    .context("provide a resource type or use --all")?,
            )
        };

        let outcomes = pipeline::run(&registry, &root, scope.clone(), &remote, &local)
            .with_context(|| match &scope {
                SyncScope::Syncer(id) => format!("sync failed for '{id}'"),
                SyncScope::All => "sync --all failed".to_string(),
            })?;

        if self.all && outcomes.is_empty() {
            println!(
                "No resource types configured under `lagoon-sync` in {}.",
                self.config.display()
            );
            return Ok(());
        }

        if self.json {
            print_json(&outcomes, self.all)?;
        } else {
            for outcome in &outcomes {
                print_outcome(outcome);
            }
        }

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            bail!("{failed} of {} resource types could not be planned", outcomes.len());
        }
        Ok(())
    }
}

fn print_outcome(outcome: &SyncOutcome) {
    match &outcome.result {
        Ok(plan) => {
            let kind = if plan.transfer_resource.is_directory {
                "directory"
            } else {
                "file"
            };
            println!(
                "{} '{}' (transfer {})",
                "✓".green(),
                outcome.syncer.bold(),
                plan.transfer_id
            );
            println!("  remote:   {}", plan.remote_command);
            println!("  local:    {}", plan.local_command);
            println!("  resource: {} ({kind})", plan.transfer_resource.name);
        }
        Err(err) => {
            eprintln!("{} '{}' — {err}", "✗".red(), outcome.syncer.bold());
        }
    }
}

fn print_json(outcomes: &[SyncOutcome], all: bool) -> Result<()> {
    let payload: Vec<OutcomeJson<'_>> = outcomes
        .iter()
        .map(|o| OutcomeJson {
            syncer: &o.syncer,
            plan: o.result.as_ref().ok(),
            error: o.result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();

    let json = match (all, payload.first()) {
        (false, Some(single)) => serde_json::to_string_pretty(single)?,
        _ => serde_json::to_string_pretty(&payload)?,
    };
    println!("{json}");
    Ok(())
}
