//! Typed repositories for the core collections.
//!
//! # Responsibility
//! - Define append/list/delete contracts for notes, inbox items and
//!   knowledge items, independent of the storage backend.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Repositories only accept connections migrated to the latest version.
//! - Mutations on missing rows return `RepoError::NotFound`, not silence.
//! - Read paths reject malformed persisted rows instead of masking them.
//! - Multi-row writes run inside a savepoint, so they nest under an
//!   enclosing [`UnitOfWork`] and roll back as one piece.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::knowledge::KnowledgeValidationError;
use log::warn;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod inbox_repo;
pub mod knowledge_repo;
pub mod note_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all collections.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Validation(KnowledgeValidationError),
    NotFound(Uuid),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it via db::open_db"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::UninitializedConnection { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<KnowledgeValidationError> for RepoError {
    fn from(value: KnowledgeValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Groups writes across repositories into one atomic unit.
pub trait UnitOfWork {
    /// Runs `work`; any error rolls back every write made inside it.
    fn atomically<T, F>(&self, work: F) -> RepoResult<T>
    where
        F: FnOnce() -> RepoResult<T>;
}

/// Unit of work over the connection the repositories share.
pub struct SqliteUnitOfWork<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUnitOfWork<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn atomically<T, F>(&self, work: F) -> RepoResult<T>
    where
        F: FnOnce() -> RepoResult<T>,
    {
        with_savepoint(self.conn, "unit_of_work", work)
    }
}

fn with_savepoint<T>(
    conn: &Connection,
    name: &'static str,
    work: impl FnOnce() -> RepoResult<T>,
) -> RepoResult<T> {
    conn.execute_batch(&format!("SAVEPOINT {name};"))?;
    let outcome = work().and_then(|value| {
        conn.execute_batch(&format!("RELEASE {name};"))?;
        Ok(value)
    });
    if outcome.is_err() {
        if let Err(err) = conn.execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name};")) {
            warn!("event=savepoint_rollback module=repo status=error savepoint={name} error={err}");
        }
    }
    outcome
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn encode_string_list(values: &[String]) -> RepoResult<String> {
    serde_json::to_string(values)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode list: {err}")))
}

fn decode_string_list(raw: &str, column: &str) -> RepoResult<Vec<String>> {
    serde_json::from_str(raw)
        .map_err(|err| RepoError::InvalidData(format!("invalid json list in {column}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{
        decode_string_list, encode_string_list, ensure_connection_ready, RepoError,
        SqliteUnitOfWork, UnitOfWork,
    };
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    fn marker_count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM tags WHERE name LIKE 'marker%';", [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = ensure_connection_ready(&conn).unwrap_err();
        assert!(matches!(
            err,
            RepoError::UninitializedConnection {
                actual_version: 0,
                ..
            }
        ));
    }

    #[test]
    fn string_lists_survive_json_columns() {
        let values = vec!["task".to_string(), "extracted".to_string()];
        let raw = encode_string_list(&values).unwrap();
        assert_eq!(decode_string_list(&raw, "tags_json").unwrap(), values);
        assert!(matches!(
            decode_string_list("{", "tags_json"),
            Err(RepoError::InvalidData(_))
        ));
    }

    #[test]
    fn unit_of_work_commits_on_success() {
        let conn = open_db_in_memory().unwrap();
        let unit = SqliteUnitOfWork::try_new(&conn).unwrap();
        unit.atomically(|| {
            conn.execute("INSERT INTO tags (name) VALUES ('marker-a');", [])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(marker_count(&conn), 1);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn unit_of_work_rolls_back_nested_writes_on_error() {
        let conn = open_db_in_memory().unwrap();
        let unit = SqliteUnitOfWork::try_new(&conn).unwrap();
        let result: Result<(), RepoError> = unit.atomically(|| {
            conn.execute("INSERT INTO tags (name) VALUES ('marker-a');", [])?;
            unit.atomically(|| {
                conn.execute("INSERT INTO tags (name) VALUES ('marker-b');", [])?;
                Ok(())
            })?;
            Err(RepoError::InvalidData("late failure".to_string()))
        });
        assert!(matches!(result, Err(RepoError::InvalidData(_))));
        assert_eq!(marker_count(&conn), 0);
        assert!(conn.is_autocommit());
    }
}
