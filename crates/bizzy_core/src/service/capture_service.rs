//! Capture flows feeding the inbox and the knowledge hub.
//!
//! # Responsibility
//! - Run the annotator on a note and persist its outputs: one inbox item
//!   plus any extracted tasks.
//! - Record Ask Bizzy exchanges and published Forge outputs.
//! - Serve filtered inbox and knowledge hub listings.
//!
//! # Invariants
//! - Processing a note appends exactly one inbox item.
//! - The inbox item and the extracted task batch commit in one unit of work;
//!   a failure in either leaves both collections untouched.

use crate::annotate::{annotate_note_at, NoteAnnotation};
use crate::model::inbox::{AnnotatedNote, InboxItem, InboxItemId, InboxItemKind};
use crate::model::knowledge::{KnowledgeItem, KnowledgeItemId, TaskStatus};
use crate::repo::inbox_repo::{InboxListQuery, InboxRepository};
use crate::repo::knowledge_repo::KnowledgeRepository;
use crate::repo::{RepoError, UnitOfWork};
use crate::search::{InboxWindow, KnowledgeFilter};
use crate::time::now_epoch_ms;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CaptureServiceError {
    /// Publishing requires a non-blank title.
    BlankTitle,
    ItemNotFound(uuid::Uuid),
    Repo(RepoError),
}

impl Display for CaptureServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title cannot be blank"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CaptureServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CaptureServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ItemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Everything produced by processing one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedNote {
    pub annotation: NoteAnnotation,
    pub note: AnnotatedNote,
    pub inbox_item_id: InboxItemId,
    /// Hub ids of the extracted tasks, in extraction order.
    pub task_item_ids: Vec<KnowledgeItemId>,
}

pub struct CaptureService<I: InboxRepository, K: KnowledgeRepository, U: UnitOfWork> {
    inbox: I,
    knowledge: K,
    unit: U,
}

impl<I: InboxRepository, K: KnowledgeRepository, U: UnitOfWork> CaptureService<I, K, U> {
    /// `unit` must cover the storage both repositories write to.
    pub fn new(inbox: I, knowledge: K, unit: U) -> Self {
        Self {
            inbox,
            knowledge,
            unit,
        }
    }

    /// Annotates a note and files the results.
    pub fn process_note(
        &self,
        content: &str,
        title: &str,
    ) -> Result<ProcessedNote, CaptureServiceError> {
        self.process_note_at(content, title, now_epoch_ms())
    }

    /// Same as [`CaptureService::process_note`] at a fixed time.
    pub fn process_note_at(
        &self,
        content: &str,
        title: &str,
        now_ms: i64,
    ) -> Result<ProcessedNote, CaptureServiceError> {
        let annotation = annotate_note_at(content, title, now_ms);
        let note = AnnotatedNote::from_annotation(&annotation);
        let inbox_item = InboxItem::from_annotated_note(&note);
        let task_items: Vec<KnowledgeItem> = annotation
            .extracted_tasks
            .iter()
            .map(|task| KnowledgeItem::from_extracted_task(task, now_ms))
            .collect();

        let (inbox_item_id, task_item_ids) = self.unit.atomically(|| {
            let inbox_item_id = self.inbox.append_item(&inbox_item)?;
            let task_item_ids = if task_items.is_empty() {
                Vec::new()
            } else {
                self.knowledge.append_items(&task_items)?
            };
            Ok((inbox_item_id, task_item_ids))
        })?;

        info!(
            "event=note_process module=service status=ok tags={} actions={} tasks={}",
            annotation.tags.len(),
            annotation.suggested_actions.len(),
            task_item_ids.len()
        );

        Ok(ProcessedNote {
            annotation,
            note,
            inbox_item_id,
            task_item_ids,
        })
    }

    /// Files an Ask Bizzy answer in the inbox.
    pub fn capture_answer(
        &self,
        query: &str,
        answer: &str,
    ) -> Result<InboxItem, CaptureServiceError> {
        let item = InboxItem::ai_answer(query, answer, now_epoch_ms());
        self.inbox.append_item(&item)?;
        info!(
            "event=answer_capture module=service status=ok answer_chars={}",
            item.content.chars().count()
        );
        Ok(item)
    }

    /// Publishes a Forge output to the knowledge hub.
    pub fn publish_to_hub(
        &self,
        title: &str,
        content: &str,
        tags: Vec<String>,
    ) -> Result<KnowledgeItem, CaptureServiceError> {
        if title.trim().is_empty() {
            return Err(CaptureServiceError::BlankTitle);
        }
        let item = KnowledgeItem::forge_output(title.trim(), content, tags, now_epoch_ms());
        self.knowledge.append_items(std::slice::from_ref(&item))?;
        info!(
            "event=hub_publish module=service status=ok item_id={}",
            item.id
        );
        Ok(item)
    }

    /// Lists the inbox newest-first, narrowed by kind and time window.
    pub fn list_inbox(
        &self,
        kind: Option<InboxItemKind>,
        window: InboxWindow,
        today: NaiveDate,
    ) -> Result<Vec<InboxItem>, CaptureServiceError> {
        let items = self.inbox.list_items(&InboxListQuery { kind })?;
        Ok(items
            .into_iter()
            .filter(|item| {
                item.date()
                    .map_or(window == InboxWindow::All, |date| window.contains(date, today))
            })
            .collect())
    }

    /// Lists hub items in insertion order that pass `filter`.
    pub fn list_knowledge(
        &self,
        filter: &KnowledgeFilter,
    ) -> Result<Vec<KnowledgeItem>, CaptureServiceError> {
        let items = self.knowledge.list_items()?;
        Ok(items.into_iter().filter(|item| filter.matches(item)).collect())
    }

    /// Marks a hub task as completed and returns the updated item.
    pub fn complete_task(
        &self,
        id: KnowledgeItemId,
    ) -> Result<KnowledgeItem, CaptureServiceError> {
        self.knowledge.set_task_status(id, TaskStatus::Completed)?;
        let item = self
            .knowledge
            .get_item(id)?
            .ok_or(CaptureServiceError::ItemNotFound(id))?;
        info!("event=task_complete module=service status=ok item_id={id}");
        Ok(item)
    }

    /// Removes one item from the knowledge hub.
    pub fn delete_knowledge_item(&self, id: KnowledgeItemId) -> Result<(), CaptureServiceError> {
        self.knowledge.delete_item(id)?;
        info!("event=hub_delete module=service status=ok item_id={id}");
        Ok(())
    }

    /// Removes one item from the inbox feed.
    pub fn delete_inbox_item(&self, id: InboxItemId) -> Result<(), CaptureServiceError> {
        self.inbox.delete_item(id)?;
        info!("event=inbox_delete module=service status=ok item_id={id}");
        Ok(())
    }
}
