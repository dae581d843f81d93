//! Shared planning entrypoint used by the CLI.

use lagoon_sync_core::{Environment, SyncerConfigRoot};

use crate::{SyncError, SyncPlan, SyncerRegistry};

/// Scope for a planning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncScope {
    /// Every section present in the configuration.
    All,
    /// A single named resource type.
    Syncer(String),
}

/// Plan (or failure) for one configured resource type.
#[derive(Debug)]
pub struct SyncOutcome {
    pub syncer: String,
    pub result: Result<SyncPlan, SyncError>,
}

/// Resolve, prepare and render every syncer in `scope`.
///
/// A single-syncer scope fails as a whole; with [`SyncScope::All`] each
/// section's failure is kept in its own [`SyncOutcome`].
pub fn run(
    registry: &SyncerRegistry,
    root: &SyncerConfigRoot,
    scope: SyncScope,
    remote: &Environment,
    local: &Environment,
) -> Result<Vec<SyncOutcome>, SyncError> {
    match scope {
        SyncScope::All => Ok(registry
            .resolve_all(root)
            .into_iter()
            .map(|(syncer, prepared)| SyncOutcome {
                syncer,
                result: prepared.map(|p| p.plan(remote, local)),
            })
            .collect()),
        SyncScope::Syncer(id) => {
            let plan = registry.resolve(root, &id)?.plan(remote, local);
            Ok(vec![SyncOutcome {
                syncer: id,
                result: Ok(plan),
            }])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> SyncerConfigRoot {
        SyncerConfigRoot::from_lagoon_yml(
            "lagoon-sync:\n  postgres:\n    config:\n      database: app\n  drupalconfig: {}\n  bogus: {}\n",
        )
        .expect("parse")
    }

    #[test]
    fn run_all_keeps_per_section_results() {
        let registry = SyncerRegistry::with_defaults().expect("defaults");
        let outcomes = run(
            &registry,
            &root(),
            SyncScope::All,
            &Environment::remote(),
            &Environment::local(),
        )
        .expect("run");
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].syncer, "bogus");
        assert!(outcomes[0].result.is_err());
        assert!(outcomes[1].result.is_ok());
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn run_single_syncer_returns_single_plan() {
        let registry = SyncerRegistry::with_defaults().expect("defaults");
        let outcomes = run(
            &registry,
            &root(),
            SyncScope::Syncer("postgres".to_string()),
            &Environment::remote(),
            &Environment::local(),
        )
        .expect("run");
        assert_eq!(outcomes.len(), 1);
        let plan = outcomes[0].result.as_ref().expect("plan");
        assert_eq!(plan.plugin, "postgres");
    }

    #[test]
    fn run_single_unknown_syncer_fails() {
        let registry = SyncerRegistry::with_defaults().expect("defaults");
        let err = run(
            &registry,
            &root(),
            SyncScope::Syncer("bogus".to_string()),
            &Environment::remote(),
            &Environment::local(),
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::UnknownSyncer { .. }));
    }
}
