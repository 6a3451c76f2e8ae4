//! Inbox feed envelope and the annotated-note projection that feeds it.
//!
//! # Invariants
//! - The inbox is append-only; listing is newest-first by insertion.
//! - `content` is a display preview; `full_content` keeps the whole text
//!   when the preview was cut.

use crate::annotate::NoteAnnotation;
use crate::time::utc_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for inbox items.
pub type InboxItemId = Uuid;

const NOTE_PREVIEW_CHARS: usize = 200;
const QUERY_TITLE_CHARS: usize = 50;
const ASK_TITLE_PREFIX: &str = "Ask Bizzy: ";
const EMPTY_ANSWER: &str = "No response received";
const ELLIPSIS: &str = "...";

/// Kind of captured artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InboxItemKind {
    /// Annotated note.
    Note,
    /// Ask Bizzy question and answer.
    AiQuery,
    Voice,
    Photo,
    Email,
    #[serde(rename = "webclip")]
    WebClip,
}

impl InboxItemKind {
    /// Stable storage/CLI label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::AiQuery => "ai-query",
            Self::Voice => "voice",
            Self::Photo => "photo",
            Self::Email => "email",
            Self::WebClip => "webclip",
        }
    }

    /// Parses a label produced by [`InboxItemKind::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "note" => Some(Self::Note),
            "ai-query" => Some(Self::AiQuery),
            "voice" => Some(Self::Voice),
            "photo" => Some(Self::Photo),
            "email" => Some(Self::Email),
            "webclip" => Some(Self::WebClip),
            _ => None,
        }
    }
}

/// Note after annotation, as handed to the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedNote {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub timestamp: i64,
}

impl AnnotatedNote {
    /// Builds the projection from an annotation run with a fresh id.
    pub fn from_annotation(annotation: &NoteAnnotation) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: annotation.cleaned_title.clone(),
            content: annotation.cleaned_content.clone(),
            tags: annotation.tags.clone(),
            suggested_actions: annotation.suggested_actions.clone(),
            timestamp: annotation.annotated_at,
        }
    }
}

/// Generic feed envelope for any captured artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboxItem {
    pub id: InboxItemId,
    pub kind: InboxItemKind,
    pub title: String,
    pub content: String,
    pub full_content: Option<String>,
    pub tags: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub created_at: i64,
}

impl InboxItem {
    /// Wraps an annotated note with a 200-character content preview.
    pub fn from_annotated_note(note: &AnnotatedNote) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: InboxItemKind::Note,
            title: note.title.clone(),
            content: truncate_with_ellipsis(&note.content, NOTE_PREVIEW_CHARS),
            full_content: Some(note.content.clone()),
            tags: note.tags.clone(),
            suggested_actions: note.suggested_actions.clone(),
            created_at: note.timestamp,
        }
    }

    /// Records an Ask Bizzy exchange.
    ///
    /// The query is kept verbatim in the title; only an empty answer falls
    /// back to the placeholder.
    pub fn ai_answer(query: &str, answer: &str, created_at: i64) -> Self {
        let content = if answer.is_empty() {
            EMPTY_ANSWER.to_string()
        } else {
            answer.to_string()
        };
        Self {
            id: Uuid::new_v4(),
            kind: InboxItemKind::AiQuery,
            title: format!(
                "{ASK_TITLE_PREFIX}{}",
                truncate_with_ellipsis(query, QUERY_TITLE_CHARS)
            ),
            content,
            full_content: None,
            tags: vec!["ai-assistant".to_string(), "query".to_string()],
            suggested_actions: Vec::new(),
            created_at,
        }
    }

    /// UTC calendar date of `created_at`.
    pub fn date(&self) -> Option<NaiveDate> {
        utc_date(self.created_at)
    }
}

fn truncate_with_ellipsis(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
