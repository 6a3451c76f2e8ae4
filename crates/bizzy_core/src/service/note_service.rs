//! Note use-case service.
//!
//! # Invariants
//! - Saves use full content replacement semantics.
//! - Note tags always mirror the hashtags of the saved content; content and
//!   tags are written together or not at all.

use crate::annotate::tags::hashtags;
use crate::model::note::{effective_title, Note, NoteId};
use crate::repo::note_repo::{normalize_note_limit, NoteListQuery, NoteRepository};
use crate::repo::RepoError;
use crate::time::now_epoch_ms;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum NoteServiceError {
    NoteNotFound(NoteId),
    Repo(RepoError),
    /// Write succeeded but read-back did not find the row.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// List result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResult {
    /// Sorted by `updated_at DESC, uuid ASC`.
    pub items: Vec<Note>,
    /// `None` when every matching note was returned.
    pub applied_limit: Option<u32>,
}

pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an empty "New Note".
    pub fn create_note(&self) -> Result<Note, NoteServiceError> {
        let note = Note::new();
        let id = self.repo.create_note(&note)?;
        info!("event=note_create module=service status=ok note_id={id}");
        self.read_back(id, "created note not found in read-back")
    }

    /// Replaces title and content, then re-derives hashtag tags.
    pub fn save_note(
        &self,
        id: NoteId,
        title: &str,
        content: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let content = content.into();
        let title = effective_title(title);
        self.repo
            .update_note_full(id, &title, &content, &hashtags(&content), now_epoch_ms())?;
        info!(
            "event=note_save module=service status=ok note_id={id} content_chars={}",
            content.chars().count()
        );
        self.read_back(id, "saved note not found in read-back")
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>, NoteServiceError> {
        Ok(self.repo.get_note(id)?)
    }

    /// Lists notes, optionally narrowed by a search text.
    pub fn list_notes(
        &self,
        search: Option<String>,
        limit: Option<u32>,
        offset: u32,
    ) -> Result<NotesListResult, NoteServiceError> {
        let applied_limit = normalize_note_limit(limit);
        let query = NoteListQuery {
            text: search,
            limit: applied_limit,
            offset,
        };
        let items = self.repo.list_notes(&query)?;
        Ok(NotesListResult {
            items,
            applied_limit,
        })
    }

    pub fn delete_note(&self, id: NoteId) -> Result<(), NoteServiceError> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    pub fn list_tags(&self) -> Result<Vec<String>, NoteServiceError> {
        Ok(self.repo.list_tags()?)
    }

    fn read_back(&self, id: NoteId, details: &'static str) -> Result<Note, NoteServiceError> {
        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(details))
    }
}
