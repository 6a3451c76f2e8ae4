//! SQLite storage for Bizzy's three collections.
//!
//! # Collections
//! - Notes: `notes`, `tags` and the `note_tags` link table.
//! - Inbox feed: `inbox_items`, ordered by its `seq` insertion counter.
//! - Knowledge hub: `knowledge_items`; only tasks carry a status.
//!
//! # Invariants
//! - Each collection is introduced by exactly one migration, and the applied
//!   version is tracked in `PRAGMA user_version`.
//! - A database written by a newer binary is refused, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_target};

pub type DbResult<T> = Result<T, DbError>;

/// Storage collection and the tables backing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Notes,
    Inbox,
    Knowledge,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Self::Notes, Self::Inbox, Self::Knowledge];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Inbox => "inbox",
            Self::Knowledge => "knowledge",
        }
    }

    pub fn tables(self) -> &'static [&'static str] {
        match self {
            Self::Notes => &["notes", "tags", "note_tags"],
            Self::Inbox => &["inbox_items"],
            Self::Knowledge => &["knowledge_items"],
        }
    }
}

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Migration script failed; the whole migration run was rolled back.
    Migration {
        version: u32,
        collection: Collection,
        source: rusqlite::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Migration {
                version,
                collection,
                source,
            } => write!(
                f,
                "migration {version} ({}) failed: {source}",
                collection.as_str()
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "bizzy database is at schema {db_version}, this build only knows up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
