//! Domain types shared by every syncer.
//!
//! Everything here is plain data: commands are rendered strings that this
//! workspace never executes, and transfer resources only describe where an
//! exported artifact lives.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::TransferIdError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// An opaque environment identity (e.g. `remote` or `local`).
///
/// Carries no connection details; those belong to whatever runs the commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment(pub String);

impl Environment {
    pub fn remote() -> Self {
        Self::from("remote")
    }

    pub fn local() -> Self {
        Self::from("local")
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Environment {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A fully rendered shell command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncCommand {
    command: String,
}

impl SyncCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.command
    }
}

impl fmt::Display for SyncCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.command.fmt(f)
    }
}

/// Where an exported artifact lives on both sides of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncerTransferResource {
    /// Full path of the artifact.
    pub name: String,
    pub is_directory: bool,
}

// ---------------------------------------------------------------------------
// Transfer identity
// ---------------------------------------------------------------------------

/// Last nanosecond value handed out by [`TransferId::generate`].
static LAST_ISSUED: AtomicI64 = AtomicI64::new(i64::MIN);

/// Identity shared by the export and import artifact of one sync.
///
/// Only [`TransferId::generate`] creates values, so an identity is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TransferId(String);

impl TransferId {
    /// Issue a new identity from the current time in nanoseconds.
    ///
    /// Identities issued by one process are strictly increasing: when the
    /// clock has not advanced past the previous value (same tick, or another
    /// thread got there first) the previous value plus one is used instead.
    pub fn generate() -> Result<Self, TransferIdError> {
        let now = Utc::now().timestamp_nanos_opt().ok_or(TransferIdError)?;
        let previous = match LAST_ISSUED.fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last.saturating_add(1)))
        }) {
            Ok(last) | Err(last) => last,
        };
        let issued = now.max(previous.saturating_add(1));
        Ok(Self(issued.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
