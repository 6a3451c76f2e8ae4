//! Knowledge hub repository.
//!
//! # Invariants
//! - `append_items` validates every item first, then writes the batch in one
//!   savepoint; a single invalid item or failed insert leaves storage
//!   untouched.
//! - Listing follows insertion order (`seq ASC`).

use crate::model::knowledge::{KnowledgeItem, KnowledgeItemId, KnowledgeKind, TaskStatus};
use crate::repo::{
    decode_string_list, encode_string_list, ensure_connection_ready, parse_uuid, with_savepoint,
    RepoError, RepoResult,
};
use rusqlite::{params, Connection, Row};

const KNOWLEDGE_SELECT_SQL: &str = "SELECT
    uuid,
    kind,
    title,
    content,
    tags_json,
    module,
    source,
    task_seq,
    status,
    created_at
FROM knowledge_items";

pub trait KnowledgeRepository {
    /// Appends a batch atomically and returns the ids in input order.
    fn append_items(&self, items: &[KnowledgeItem]) -> RepoResult<Vec<KnowledgeItemId>>;
    fn get_item(&self, id: KnowledgeItemId) -> RepoResult<Option<KnowledgeItem>>;
    fn list_items(&self) -> RepoResult<Vec<KnowledgeItem>>;
    /// Updates the status of a task item.
    fn set_task_status(&self, id: KnowledgeItemId, status: TaskStatus) -> RepoResult<()>;
    fn delete_item(&self, id: KnowledgeItemId) -> RepoResult<()>;
}

/// SQLite-backed knowledge repository.
pub struct SqliteKnowledgeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKnowledgeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl KnowledgeRepository for SqliteKnowledgeRepository<'_> {
    fn append_items(&self, items: &[KnowledgeItem]) -> RepoResult<Vec<KnowledgeItemId>> {
        for item in items {
            item.validate()?;
        }

        with_savepoint(self.conn, "knowledge_append", || {
            for item in items {
                self.conn.execute(
                    "INSERT INTO knowledge_items (
                        uuid,
                        kind,
                        title,
                        content,
                        tags_json,
                        module,
                        source,
                        task_seq,
                        status,
                        created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
                    params![
                        item.id.to_string(),
                        item.kind.as_str(),
                        item.title.as_str(),
                        item.content.as_str(),
                        encode_string_list(&item.tags)?,
                        item.module.as_str(),
                        item.source.as_deref(),
                        item.task_seq,
                        item.status.map(TaskStatus::as_str),
                        item.created_at,
                    ],
                )?;
            }
            Ok(items.iter().map(|item| item.id).collect())
        })
    }

    fn get_item(&self, id: KnowledgeItemId) -> RepoResult<Option<KnowledgeItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{KNOWLEDGE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_knowledge_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_items(&self) -> RepoResult<Vec<KnowledgeItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{KNOWLEDGE_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_knowledge_row(row)?);
        }
        Ok(items)
    }

    fn set_task_status(&self, id: KnowledgeItemId, status: TaskStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE knowledge_items SET status = ?2 WHERE uuid = ?1 AND kind = 'task';",
            params![id.to_string(), status.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_item(&self, id: KnowledgeItemId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM knowledge_items WHERE uuid = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_knowledge_row(row: &Row<'_>) -> RepoResult<KnowledgeItem> {
    let uuid_text: String = row.get("uuid")?;
    let kind_text: String = row.get("kind")?;
    let kind = KnowledgeKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid knowledge kind `{kind_text}` in knowledge_items.kind"
        ))
    })?;
    let status = match row.get::<_, Option<String>>("status")? {
        Some(value) => Some(TaskStatus::parse(&value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid task status `{value}` in knowledge_items.status"
            ))
        })?),
        None => None,
    };
    let tags_json: String = row.get("tags_json")?;

    let item = KnowledgeItem {
        id: parse_uuid(&uuid_text, "knowledge_items.uuid")?,
        kind,
        title: row.get("title")?,
        content: row.get("content")?,
        tags: decode_string_list(&tags_json, "knowledge_items.tags_json")?,
        module: row.get("module")?,
        source: row.get("source")?,
        task_seq: row.get("task_seq")?,
        status,
        created_at: row.get("created_at")?,
    };
    item.validate()?;
    Ok(item)
}
