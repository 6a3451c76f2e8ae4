//! Core logic for the Bizzy farm assistant.
//!
//! Query routing, note annotation, and typed storage for notes, the inbox
//! feed and the knowledge hub.

pub mod annotate;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod router;
pub mod search;
pub mod service;
pub mod time;

pub use annotate::{annotate_note, annotate_note_at, ExtractedTask, NoteAnnotation, TaskPattern};
pub use config::{ConfigError, CoreConfig, StorageTarget};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::inbox::{AnnotatedNote, InboxItem, InboxItemId, InboxItemKind};
pub use model::knowledge::{
    KnowledgeItem, KnowledgeItemId, KnowledgeKind, KnowledgeValidationError, TaskStatus,
};
pub use model::note::{Note, NoteId};
pub use repo::inbox_repo::{InboxListQuery, InboxRepository, SqliteInboxRepository};
pub use repo::knowledge_repo::{KnowledgeRepository, SqliteKnowledgeRepository};
pub use repo::note_repo::{NoteListQuery, NoteRepository, SqliteNoteRepository};
pub use repo::{RepoError, RepoResult, SqliteUnitOfWork, UnitOfWork};
pub use router::{classify_query, RouteDecision};
pub use search::{InboxWindow, KnowledgeFilter};
pub use service::capture_service::{CaptureService, CaptureServiceError, ProcessedNote};
pub use service::note_service::{NoteService, NoteServiceError, NotesListResult};
pub use service::query_service::{route, QueryServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
