//! The `lagoon-sync` configuration document and per-syncer section decoding.
//!
//! # Document layout
//!
//! ```text
//! lagoon-sync:
//!   <plugin id>:
//!     config:         (base configuration)
//!       ...
//!     local:
//!       config:       (local overrides, same shape as base)
//!         ...
//! ```
//!
//! Any other top-level keys of a `.lagoon.yml` are ignored.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::Deserialize;
use serde_yaml::Value;

use crate::error::ConfigError;

/// Conventional configuration file name, relative to the project root.
pub const DEFAULT_CONFIG_FILE: &str = ".lagoon.yml";

// ---------------------------------------------------------------------------
// Root document
// ---------------------------------------------------------------------------

/// Untyped syncer sections keyed by plugin identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncerConfigRoot {
    sections: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct LagoonYml {
    #[serde(rename = "lagoon-sync", default)]
    lagoon_sync: Option<BTreeMap<String, Value>>,
}

impl SyncerConfigRoot {
    pub fn new(sections: BTreeMap<String, Value>) -> Self {
        Self { sections }
    }

    /// Parse a whole `.lagoon.yml` document and keep its `lagoon-sync` key.
    pub fn from_lagoon_yml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let doc: LagoonYml = serde_yaml::from_str(contents)?;
        Ok(Self::new(doc.lagoon_sync.unwrap_or_default()))
    }

    /// Builder-style insert, mostly for assembling documents in code.
    pub fn with_section(mut self, plugin_id: impl Into<String>, section: Value) -> Self {
        self.sections.insert(plugin_id.into(), section);
        self
    }

    pub fn section(&self, plugin_id: &str) -> Option<&Value> {
        self.sections.get(plugin_id)
    }

    /// Configured plugin identifiers, sorted.
    pub fn plugin_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Load `path` as a `.lagoon.yml` document.
///
/// Returns `ConfigError::Io` if unreadable, `ConfigError::Parse` (with path +
/// line context) if malformed YAML.
pub fn load_at(path: &Path) -> Result<SyncerConfigRoot, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    SyncerConfigRoot::from_lagoon_yml(&contents).map_err(|e| match e {
        ConfigError::Yaml(source) => ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

// ---------------------------------------------------------------------------
// Typed sections
// ---------------------------------------------------------------------------

/// One syncer's section: base configuration plus local overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, bound(deserialize = "C: Deserialize<'de> + Default"))]
pub struct SyncerSection<C> {
    pub config: C,
    pub local: LocalSection<C>,
}

/// The `local` block of a syncer section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, bound(deserialize = "C: Deserialize<'de> + Default"))]
pub struct LocalSection<C> {
    pub config: C,
}

/// Decode the section for `plugin_id` into its typed shape.
///
/// Unknown keys are ignored (and logged at debug level); missing keys take
/// their defaults. A key holding the wrong kind of value is an error.
pub fn unmarshal_section<C>(
    root: &SyncerConfigRoot,
    plugin_id: &str,
) -> Result<SyncerSection<C>, ConfigError>
where
    C: DeserializeOwned + Default,
{
    let value = root
        .section(plugin_id)
        .ok_or_else(|| ConfigError::MissingSection {
            plugin: plugin_id.to_owned(),
        })?;

    // `postgres:` with no body decodes like an empty mapping.
    let value = match value {
        Value::Null => Value::Mapping(Default::default()),
        other => other.clone(),
    };

    let mut ignored = Vec::new();
    let section = serde_ignored::deserialize(value, |path| ignored.push(path.to_string()))
        .map_err(|source| ConfigError::Malformed {
            plugin: plugin_id.to_owned(),
            source,
        })?;

    for key in ignored {
        tracing::debug!(plugin = plugin_id, key = %key, "ignoring unknown configuration key");
    }
    Ok(section)
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Deserialize a scalar field as text.
///
/// Strings pass through, numbers and booleans keep their YAML spelling
/// (`port: 5432` and `port: "5432"` both give `"5432"`) and a key with no
/// value gives the empty string. Mappings and sequences are rejected.
pub fn scalar_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct ScalarVisitor;

    impl Visitor<'_> for ScalarVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number or boolean")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(ScalarVisitor)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    crate::syncer_config! {
        struct Db {
            hostname: String,
            port: String,
            password: String,
            tables: Vec<String>,
        }
    }

    fn root(yaml: &str) -> SyncerConfigRoot {
        SyncerConfigRoot::from_lagoon_yml(yaml).expect("parse")
    }

    #[test]
    fn other_top_level_keys_are_ignored() {
        let root = root("docker-compose-yaml: docker-compose.yml\nlagoon-sync:\n  db: {}\n");
        assert_eq!(root.plugin_ids().collect::<Vec<_>>(), vec!["db"]);
    }

    #[test]
    fn empty_document_has_no_sections() {
        assert!(root("").is_empty());
        assert!(root("lagoon-sync:\n").is_empty());
    }

    #[test]
    fn decodes_base_and_local_config() {
        let root = root(
            "lagoon-sync:\n  db:\n    config:\n      hostname: db\n      port: 5432\n    local:\n      config:\n        hostname: localhost\n",
        );
        let section: SyncerSection<Db> = unmarshal_section(&root, "db").expect("decode");
        assert_eq!(section.config.hostname, "db");
        assert_eq!(section.config.port, "5432");
        assert_eq!(section.local.config.hostname, "localhost");
        assert!(section.local.config.port.is_empty());
    }

    #[test]
    fn key_without_value_decodes_as_empty() {
        let root = root("lagoon-sync:\n  db:\n    config:\n      hostname: db\n      password:\n");
        let section: SyncerSection<Db> = unmarshal_section(&root, "db").expect("decode");
        assert_eq!(section.config.hostname, "db");
        assert_eq!(section.config.password, "");
    }

    #[test]
    fn numeric_and_boolean_scalars_decode_as_text() {
        let root = root(
            "lagoon-sync:\n  db:\n    config:\n      password: 1234\n      hostname: 10.5\n      port: \"5432\"\n    local:\n      config:\n        password: true\n",
        );
        let section: SyncerSection<Db> = unmarshal_section(&root, "db").expect("decode");
        assert_eq!(section.config.password, "1234");
        assert_eq!(section.config.hostname, "10.5");
        assert_eq!(section.config.port, "5432");
        assert_eq!(section.local.config.password, "true");
    }

    #[test]
    fn mapping_where_text_expected_is_malformed() {
        let root = root("lagoon-sync:\n  db:\n    config:\n      password:\n        nested: 1\n");
        let err = unmarshal_section::<Db>(&root, "db").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }), "got: {err}");
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let root = root("lagoon-sync:\n  db:\n    config:\n      hostname: db\n      colour: blue\n    extra: 1\n");
        let section: SyncerSection<Db> = unmarshal_section(&root, "db").expect("decode");
        assert_eq!(section.config.hostname, "db");
    }

    #[test]
    fn null_section_decodes_to_defaults() {
        let root = root("lagoon-sync:\n  db:\n");
        let section: SyncerSection<Db> = unmarshal_section(&root, "db").expect("decode");
        assert_eq!(section, SyncerSection::default());
    }

    #[test]
    fn missing_section_is_reported() {
        let err = unmarshal_section::<Db>(&SyncerConfigRoot::default(), "db").unwrap_err();
        assert!(matches!(err, ConfigError::MissingSection { ref plugin } if plugin == "db"));
    }

    #[test]
    fn wrong_value_type_is_malformed() {
        let root = root("lagoon-sync:\n  db:\n    config:\n      tables: not-a-list\n");
        let err = unmarshal_section::<Db>(&root, "db").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }), "got: {err}");
        assert!(err.to_string().contains("`db`"));
    }
}
