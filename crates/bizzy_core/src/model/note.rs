//! User-authored note record.
//!
//! # Invariants
//! - `id` is generated at creation and never reused.
//! - Saves replace `content` wholesale; `tags` are re-derived from hashtags.

use crate::time::now_epoch_ms;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for notes.
pub type NoteId = Uuid;

/// Title given to freshly created notes.
pub const NEW_NOTE_TITLE: &str = "New Note";
/// Title stored when a save supplies a blank one.
pub const UNTITLED_NOTE_TITLE: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    /// Free text; may embed hashtags and checklist lines.
    pub content: String,
    /// Lowercased hashtags found in `content`.
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    /// Creates an empty note titled [`NEW_NOTE_TITLE`].
    pub fn new() -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            title: NEW_NOTE_TITLE.to_string(),
            content: String::new(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the title to persist for a save request.
pub fn effective_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_NOTE_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{effective_title, Note, NEW_NOTE_TITLE};

    #[test]
    fn new_note_is_empty_and_titled() {
        let note = Note::new();
        assert_eq!(note.title, NEW_NOTE_TITLE);
        assert!(note.content.is_empty());
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn blank_title_becomes_untitled() {
        assert_eq!(effective_title("  "), "Untitled");
        assert_eq!(effective_title(" Seed order "), "Seed order");
    }
}
