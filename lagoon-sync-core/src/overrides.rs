//! Local-override resolution.
//!
//! A syncer's configuration shape is declared once with [`syncer_config!`],
//! which defines the struct and derives [`LocalOverride`] from the same field
//! list. Each field resolves independently: the local value wins when it is
//! set, otherwise the base value stands.
//!
//! ```
//! use lagoon_sync_core::{syncer_config, LocalOverride};
//!
//! syncer_config! {
//!     pub struct Example {
//!         pub hostname: String,
//!         pub tables: Vec<String>,
//!     }
//! }
//!
//! let base = Example { hostname: "db".into(), tables: vec!["cache".into()] };
//! let local = Example { hostname: "localhost".into(), tables: vec![] };
//! let effective = base.with_local_overrides(&local);
//! assert_eq!(effective.hostname, "localhost");
//! assert_eq!(effective.tables, vec!["cache".to_string()]);
//! ```

use serde::{Deserialize, Deserializer};

/// A configuration field type that knows when it holds no value.
pub trait OverrideField: Clone {
    /// `true` when this value should not replace a base value.
    fn is_unset(&self) -> bool;

    /// Decode a field value the way `.lagoon.yml` authors write it: a key
    /// with no value decodes as unset and scalars are kept as text.
    fn deserialize_field<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>;
}

impl OverrideField for String {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn deserialize_field<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::config::scalar_as_text(deserializer)
    }
}

impl<T: OverrideField> OverrideField for Vec<T> {
    fn is_unset(&self) -> bool {
        self.is_empty()
    }

    fn deserialize_field<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Option::<Vec<Field<T>>>::deserialize(deserializer)?;
        Ok(items.unwrap_or_default().into_iter().map(|f| f.0).collect())
    }
}

impl<T: OverrideField> OverrideField for Option<T> {
    fn is_unset(&self) -> bool {
        self.is_none()
    }

    fn deserialize_field<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Field<T>>::deserialize(deserializer)?.map(|f| f.0))
    }
}

/// Adapter so sequence items and optional values decode through
/// [`OverrideField::deserialize_field`].
struct Field<T>(T);

impl<'de, T: OverrideField> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize_field(deserializer).map(Field)
    }
}

/// Pick `local` when it is set, `base` otherwise.
pub fn resolve_field<T: OverrideField>(base: &T, local: &T) -> T {
    if local.is_unset() {
        base.clone()
    } else {
        local.clone()
    }
}

/// Merge of a base configuration with a local override of the same shape.
pub trait LocalOverride: Sized {
    /// Effective configuration: `self` with every set field of `local` substituted.
    fn with_local_overrides(&self, local: &Self) -> Self;
}

/// Declare a syncer configuration shape and derive its [`LocalOverride`].
///
/// Every field type must implement [`OverrideField`]. The struct derives
/// `Debug`, `Clone`, `Default`, `PartialEq`, `Eq` and `Deserialize`; missing
/// keys fall back to their defaults and present keys decode through
/// [`OverrideField::deserialize_field`]. Field attributes (`#[serde(rename)]`,
/// `alias`, doc comments) pass through unchanged, but a field cannot carry its
/// own `deserialize_with`.
#[macro_export]
macro_rules! syncer_config {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, ::serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                #[serde(deserialize_with = "::lagoon_sync_core::overrides::OverrideField::deserialize_field")]
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::overrides::LocalOverride for $name {
            fn with_local_overrides(&self, local: &Self) -> Self {
                Self {
                    $(
                        $field: $crate::overrides::resolve_field(&self.$field, &local.$field),
                    )*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::syncer_config! {
        struct Shape {
            name: String,
            port: Option<String>,
            tables: Vec<String>,
        }
    }

    #[test]
    fn empty_strings_and_sequences_are_unset() {
        assert!(String::new().is_unset());
        assert!(Vec::<String>::new().is_unset());
        assert!(None::<String>.is_unset());
        assert!(!"x".to_string().is_unset());
        assert!(!Some(String::new()).is_unset());
    }

    #[test]
    fn resolve_field_prefers_set_local_value() {
        assert_eq!(resolve_field(&"base".to_string(), &String::new()), "base");
        assert_eq!(resolve_field(&"base".to_string(), &"local".to_string()), "local");
    }

    #[test]
    fn macro_merges_every_declared_field() {
        let base = Shape {
            name: "db".into(),
            port: Some("5432".into()),
            tables: vec!["a".into()],
        };
        let local = Shape {
            name: String::new(),
            port: Some("6543".into()),
            tables: vec!["b".into(), "c".into()],
        };
        let merged = base.with_local_overrides(&local);
        assert_eq!(merged.name, "db");
        assert_eq!(merged.port.as_deref(), Some("6543"));
        assert_eq!(merged.tables, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn null_and_numeric_values_decode_as_fields() {
        let shape: Shape =
            serde_yaml::from_str("name: 2024\nport:\ntables: [cache, 7]\n").expect("decode");
        assert_eq!(shape.name, "2024");
        assert_eq!(shape.port, None);
        assert_eq!(shape.tables, vec!["cache".to_string(), "7".to_string()]);

        let shape: Shape = serde_yaml::from_str("name:\ntables:\n").expect("decode");
        assert_eq!(shape, Shape::default());
    }

    #[test]
    fn scalar_where_sequence_expected_is_rejected() {
        assert!(serde_yaml::from_str::<Shape>("tables: cache\n").is_err());
        assert!(serde_yaml::from_str::<Shape>("name: {nested: true}\n").is_err());
    }
}
