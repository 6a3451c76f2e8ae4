use bizzy_core::db::migrations::latest_version;
use bizzy_core::db::{open_db, open_db_in_memory, Collection, DbError};
use bizzy_core::{RepoError, SqliteNoteRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for collection in Collection::ALL {
        for table in collection.tables() {
            assert_table_exists(&conn, table);
        }
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bizzy.db");

    let first = open_db(&path).unwrap();
    assert_eq!(schema_version(&first), latest_version());
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    assert_table_exists(&second, "inbox_items");
}

#[test]
fn failing_migration_names_its_collection_and_keeps_the_old_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE knowledge_items (id INTEGER PRIMARY KEY);
         PRAGMA user_version = 2;",
    )
    .unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::Migration {
            version,
            collection,
            ..
        } => {
            assert_eq!(version, 3);
            assert_eq!(collection, Collection::Knowledge);
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 2);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repositories_reject_unmigrated_connections() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::UninitializedConnection { .. }));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
