//! Note/tag repository contract and SQLite implementation.
//!
//! # Invariants
//! - Lists are ordered by `updated_at DESC, uuid ASC`.
//! - `update_note_full` and `set_note_tags` replace the whole tag set in the
//!   same savepoint as the rest of the write.
//! - Tag names are normalized to lowercase before persistence.

use crate::model::note::{Note, NoteId};
use crate::repo::{ensure_connection_ready, parse_uuid, with_savepoint, RepoError, RepoResult};
use crate::search::matches_text;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;

const NOTES_LIMIT_MAX: u32 = 50;
const NOTE_SELECT_SQL: &str = "SELECT uuid, title, content, created_at, updated_at FROM notes";

/// List options for notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Case-insensitive substring over title, content and tags.
    pub text: Option<String>,
    /// Maximum rows to return, clamped to 50. `None` returns every note.
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for notes.
pub trait NoteRepository {
    /// Inserts a note together with its tags.
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces title, content and tags of an existing note atomically.
    fn update_note_full(
        &self,
        id: NoteId,
        title: &str,
        content: &str,
        tags: &[String],
        updated_at: i64,
    ) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    /// Replaces all tags of one note atomically.
    fn set_note_tags(&self, id: NoteId, tags: &[String]) -> RepoResult<()>;
    /// Hard-deletes a note and its tag links.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    /// Returns every known tag sorted by name.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        with_savepoint(self.conn, "note_create", || {
            self.conn.execute(
                "INSERT INTO notes (uuid, title, content, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    note.id.to_string(),
                    note.title.as_str(),
                    note.content.as_str(),
                    note.created_at,
                    note.updated_at,
                ],
            )?;
            write_tags(self.conn, &note.id.to_string(), &normalize_tags(&note.tags))?;
            Ok(note.id)
        })
    }

    fn update_note_full(
        &self,
        id: NoteId,
        title: &str,
        content: &str,
        tags: &[String],
        updated_at: i64,
    ) -> RepoResult<()> {
        let note_uuid = id.to_string();
        with_savepoint(self.conn, "note_update", || {
            let changed = self.conn.execute(
                "UPDATE notes
                 SET title = ?2, content = ?3, updated_at = ?4
                 WHERE uuid = ?1;",
                params![note_uuid.as_str(), title, content, updated_at],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            replace_tags(self.conn, &note_uuid, tags)
        })
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let limit = normalize_note_limit(query.limit);
        let text = query
            .text
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());

        let mut sql = format!("{NOTE_SELECT_SQL} ORDER BY updated_at DESC, uuid ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        if text.is_none() {
            sql.push_str(" LIMIT ? OFFSET ?");
            bind_values.push(Value::Integer(limit.map_or(-1, i64::from)));
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(self.conn, row)?);
        }

        let Some(text) = text else {
            return Ok(notes);
        };
        Ok(notes
            .into_iter()
            .filter(|note| matches_text(text, &note.title, &note.content, &note.tags))
            .skip(query.offset as usize)
            .take(limit.map_or(usize::MAX, |limit| limit as usize))
            .collect())
    }

    fn set_note_tags(&self, id: NoteId, tags: &[String]) -> RepoResult<()> {
        let note_uuid = id.to_string();
        with_savepoint(self.conn, "note_tags", || {
            let exists: i64 = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM notes WHERE uuid = ?1);",
                [note_uuid.as_str()],
                |row| row.get(0),
            )?;
            if exists != 1 {
                return Err(RepoError::NotFound(id));
            }
            replace_tags(self.conn, &note_uuid, tags)
        })
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM tags ORDER BY name COLLATE NOCASE ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get("name")?;
            tags.push(value.to_lowercase());
        }
        Ok(tags)
    }
}

/// Clamps an explicit page size; `None` and `Some(0)` mean "no limit".
pub fn normalize_note_limit(limit: Option<u32>) -> Option<u32> {
    match limit {
        Some(0) | None => None,
        Some(value) => Some(value.min(NOTES_LIMIT_MAX)),
    }
}

/// Trims, lowercases, drops blanks and deduplicates tag values.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn replace_tags(conn: &Connection, note_uuid: &str, tags: &[String]) -> RepoResult<()> {
    conn.execute("DELETE FROM note_tags WHERE note_uuid = ?1;", [note_uuid])?;
    write_tags(conn, note_uuid, &normalize_tags(tags))
}

fn write_tags(conn: &Connection, note_uuid: &str, tags: &[String]) -> RepoResult<()> {
    for tag in tags {
        conn.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [tag.as_str()],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO note_tags (note_uuid, tag_id)
             SELECT ?1, id FROM tags WHERE name = ?2 COLLATE NOCASE;",
            params![note_uuid, tag.as_str()],
        )?;
    }
    Ok(())
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "notes.uuid")?;
    Ok(Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        tags: load_tags_for_note(conn, &uuid_text)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn load_tags_for_note(conn: &Connection, note_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM note_tags nt
         INNER JOIN tags t ON t.id = nt.tag_id
         WHERE nt.note_uuid = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([note_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        tags.push(value.to_lowercase());
    }
    Ok(tags)
}
