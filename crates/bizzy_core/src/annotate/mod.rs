//! Note annotation pipeline.
//!
//! # Responsibility
//! - Turn raw note text into a cleaned form plus derived metadata.
//! - Mine actionable line items out of the same text.
//!
//! # Invariants
//! - Every sub-operation reads the same raw input snapshot; cleanup output
//!   is never fed into tag, action or task inference.
//! - Output caps truncate, never fail: 5 tags, 4 actions, 3 topical task tags.
//! - The pipeline is total: empty input yields empty tags and tasks, the two
//!   default actions and the fallback title.

pub mod actions;
pub mod cleanup;
pub mod rules;
pub mod tags;
pub mod tasks;

use crate::time::now_epoch_ms;
use serde::{Deserialize, Serialize};

pub use actions::suggest_actions;
pub use cleanup::{cleanup_content, cleanup_title};
pub use tags::{extract_tags, extract_task_tags};
pub use tasks::{extract_tasks, ExtractedTask, TaskPattern};

/// Full result of annotating one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteAnnotation {
    pub cleaned_title: String,
    pub cleaned_content: String,
    pub tags: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub extracted_tasks: Vec<ExtractedTask>,
    /// Epoch milliseconds; also the seed of extracted task ids.
    pub annotated_at: i64,
}

/// Annotates a note using the current time.
pub fn annotate_note(content: &str, title: &str) -> NoteAnnotation {
    annotate_note_at(content, title, now_epoch_ms())
}

/// Annotates a note at a fixed point in time.
pub fn annotate_note_at(content: &str, title: &str, now_ms: i64) -> NoteAnnotation {
    let cleaned_title = cleanup_title(title);
    let cleaned_content = cleanup_content(content);
    let tags = extract_tags(content);
    let suggested_actions = suggest_actions(content, &tags);
    let extracted_tasks = extract_tasks(content, &cleaned_title, now_ms);

    NoteAnnotation {
        cleaned_title,
        cleaned_content,
        tags,
        suggested_actions,
        extracted_tasks,
        annotated_at: now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::annotate_note_at;

    #[test]
    fn empty_note_degrades_to_defaults() {
        let annotation = annotate_note_at("", "", 1);
        assert!(annotation.tags.is_empty());
        assert!(annotation.extracted_tasks.is_empty());
        assert_eq!(annotation.cleaned_title, "Processed Note");
        assert_eq!(annotation.cleaned_content, "");
        assert_eq!(
            annotation.suggested_actions,
            vec!["Add to Journal".to_string(), "Archive".to_string()]
        );
    }

    #[test]
    fn mower_note_is_fully_annotated() {
        let annotation = annotate_note_at(
            "Need to fix the mower before rain. #maintenance",
            "Mower",
            1_700_000_000_000,
        );
        for expected in ["maintenance", "equipment", "action-item"] {
            assert!(
                annotation.tags.iter().any(|tag| tag == expected),
                "missing tag {expected}: {:?}",
                annotation.tags
            );
        }
        assert!(annotation
            .suggested_actions
            .contains(&"Create Task".to_string()));
        assert!(annotation
            .extracted_tasks
            .iter()
            .any(|task| task.title_snippet.contains("fix the mower")));
        assert_eq!(annotation.extracted_tasks[0].id, 1_700_000_000_000);
        assert_eq!(annotation.extracted_tasks[0].source_note_title, "Mower");
    }

    #[test]
    fn tasks_use_the_cleaned_title() {
        let annotation = annotate_note_at("TODO: order fuel", "  ## Fuel!! ", 1);
        assert_eq!(annotation.cleaned_title, "Fuel");
        assert_eq!(annotation.extracted_tasks[0].source_note_title, "Fuel");
    }
}
