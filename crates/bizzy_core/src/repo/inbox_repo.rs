//! Inbox feed repository.
//!
//! # Invariants
//! - Append-only apart from explicit deletes; items are never rewritten.
//! - Listing is newest-first by insertion order (`seq DESC`).

use crate::model::inbox::{InboxItem, InboxItemId, InboxItemKind};
use crate::repo::{
    decode_string_list, encode_string_list, ensure_connection_ready, parse_uuid, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const INBOX_SELECT_SQL: &str = "SELECT
    uuid,
    kind,
    title,
    content,
    full_content,
    tags_json,
    actions_json,
    created_at
FROM inbox_items";

/// List options for the inbox feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboxListQuery {
    /// `None` lists every kind.
    pub kind: Option<InboxItemKind>,
}

pub trait InboxRepository {
    fn append_item(&self, item: &InboxItem) -> RepoResult<InboxItemId>;
    fn get_item(&self, id: InboxItemId) -> RepoResult<Option<InboxItem>>;
    fn list_items(&self, query: &InboxListQuery) -> RepoResult<Vec<InboxItem>>;
    fn delete_item(&self, id: InboxItemId) -> RepoResult<()>;
}

/// SQLite-backed inbox repository.
pub struct SqliteInboxRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteInboxRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl InboxRepository for SqliteInboxRepository<'_> {
    fn append_item(&self, item: &InboxItem) -> RepoResult<InboxItemId> {
        self.conn.execute(
            "INSERT INTO inbox_items (
                uuid,
                kind,
                title,
                content,
                full_content,
                tags_json,
                actions_json,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                item.id.to_string(),
                item.kind.as_str(),
                item.title.as_str(),
                item.content.as_str(),
                item.full_content.as_deref(),
                encode_string_list(&item.tags)?,
                encode_string_list(&item.suggested_actions)?,
                item.created_at,
            ],
        )?;
        Ok(item.id)
    }

    fn get_item(&self, id: InboxItemId) -> RepoResult<Option<InboxItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{INBOX_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_inbox_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_items(&self, query: &InboxListQuery) -> RepoResult<Vec<InboxItem>> {
        let mut sql = format!("{INBOX_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = query.kind {
            sql.push_str(" AND kind = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }

        sql.push_str(" ORDER BY seq DESC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_inbox_row(row)?);
        }
        Ok(items)
    }

    fn delete_item(&self, id: InboxItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM inbox_items WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_inbox_row(row: &Row<'_>) -> RepoResult<InboxItem> {
    let uuid_text: String = row.get("uuid")?;
    let kind_text: String = row.get("kind")?;
    let kind = InboxItemKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid inbox kind `{kind_text}` in inbox_items.kind"))
    })?;
    let tags_json: String = row.get("tags_json")?;
    let actions_json: String = row.get("actions_json")?;

    Ok(InboxItem {
        id: parse_uuid(&uuid_text, "inbox_items.uuid")?,
        kind,
        title: row.get("title")?,
        content: row.get("content")?,
        full_content: row.get("full_content")?,
        tags: decode_string_list(&tags_json, "inbox_items.tags_json")?,
        suggested_actions: decode_string_list(&actions_json, "inbox_items.actions_json")?,
        created_at: row.get("created_at")?,
    })
}
