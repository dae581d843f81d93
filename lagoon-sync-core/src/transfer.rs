//! Transfer resource naming.
//!
//! A transfer resource path is `<output dir>/<infix><transfer id><suffix>`.
//! The infix, suffix and directory flag are fixed per resource type.

use crate::types::{SyncerTransferResource, TransferId};

/// Output directory used when a syncer configures none.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "/tmp/";

/// Naming scheme for one resource type's transfer artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferResourceNaming {
    pub infix: &'static str,
    pub suffix: &'static str,
    pub is_directory: bool,
}

impl TransferResourceNaming {
    /// A single-file artifact such as a database dump.
    pub const fn file(infix: &'static str, suffix: &'static str) -> Self {
        Self {
            infix,
            suffix,
            is_directory: false,
        }
    }

    /// A directory artifact such as a configuration export.
    pub const fn directory(infix: &'static str) -> Self {
        Self {
            infix,
            suffix: "",
            is_directory: true,
        }
    }

    /// Build the resource for `transfer_id` under `output_directory`.
    ///
    /// A missing trailing `/` on the directory is added.
    pub fn resource(&self, output_directory: &str, transfer_id: &TransferId) -> SyncerTransferResource {
        let separator = if output_directory.ends_with('/') { "" } else { "/" };
        SyncerTransferResource {
            name: format!(
                "{output_directory}{separator}{}{transfer_id}{}",
                self.infix, self.suffix
            ),
            is_directory: self.is_directory,
        }
    }
}

/// `configured` unless it is empty, in which case [`DEFAULT_OUTPUT_DIRECTORY`].
pub fn output_directory_or_default(configured: &str) -> &str {
    if configured.is_empty() {
        DEFAULT_OUTPUT_DIRECTORY
    } else {
        configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: TransferResourceNaming = TransferResourceNaming::file("dump_", ".sql");
    const EXPORT: TransferResourceNaming = TransferResourceNaming::directory("export-");

    #[test]
    fn file_resource_has_suffix() {
        let id = TransferId::generate().expect("id");
        let resource = DUMP.resource("/tmp/", &id);
        assert_eq!(resource.name, format!("/tmp/dump_{id}.sql"));
        assert!(!resource.is_directory);
    }

    #[test]
    fn directory_resource_has_no_suffix() {
        let id = TransferId::generate().expect("id");
        let resource = EXPORT.resource("/data/", &id);
        assert_eq!(resource.name, format!("/data/export-{id}"));
        assert!(resource.is_directory);
    }

    #[test]
    fn missing_trailing_slash_is_added() {
        let id = TransferId::generate().expect("id");
        assert_eq!(
            DUMP.resource("/var/backups", &id).name,
            format!("/var/backups/dump_{id}.sql")
        );
    }

    #[test]
    fn resource_is_pure() {
        let id = TransferId::generate().expect("id");
        assert_eq!(DUMP.resource("/tmp/", &id), DUMP.resource("/tmp/", &id));
    }

    #[test]
    fn empty_output_directory_defaults_to_tmp() {
        assert_eq!(output_directory_or_default(""), "/tmp/");
        assert_eq!(output_directory_or_default("/data/"), "/data/");
    }
}
