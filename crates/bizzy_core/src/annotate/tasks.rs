//! Task extraction from checklist, prefixed and natural-language lines.
//!
//! # Invariants
//! - Patterns are evaluated in a fixed order; matches within one pattern
//!   are emitted in text order.
//! - A line matching several patterns yields several tasks (no dedupe).
//! - Task ids increase by one per emitted task, starting at the seed.

use crate::annotate::tags::extract_task_tags;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum characters of matched text kept in `title_snippet`.
pub const MAX_SNIPPET_CHARS: usize = 60;
/// Captured text must be longer than this many characters.
const MIN_TASK_CHARS: usize = 3;
const SNIPPET_ELLIPSIS: &str = "...";

/// One way a line can encode an actionable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPattern {
    /// `- [ ] text` or `* [ ] text`.
    OpenChecklist,
    /// `- [x] text`; the task starts completed.
    CheckedChecklist,
    /// `TODO:`, `TASK:`, `Action:`, `Fix:` or `Repair:` prefix.
    Prefixed,
    /// "need to", "should", "must", "have to" or "remember to".
    NaturalLanguage,
}

static TASK_PATTERNS: Lazy<Vec<(TaskPattern, Regex)>> = Lazy::new(|| {
    vec![
        (
            TaskPattern::OpenChecklist,
            Regex::new(r"(?im)^\s*[-*]\s*\[\s*\]\s*(.+)$").expect("valid open checklist regex"),
        ),
        (
            TaskPattern::CheckedChecklist,
            Regex::new(r"(?im)^\s*[-*]\s*\[x\]\s*(.+)$").expect("valid checked checklist regex"),
        ),
        (
            TaskPattern::Prefixed,
            Regex::new(r"(?im)^\s*(?:TODO|TASK|Action|Fix|Repair):\s*(.+)$")
                .expect("valid prefixed task regex"),
        ),
        (
            TaskPattern::NaturalLanguage,
            Regex::new(r"(?im)(?:need to|should|must|have to|remember to)\s+(.+?)(?:\.|$)")
                .expect("valid natural task regex"),
        ),
    ]
});

/// Actionable item mined out of note text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedTask {
    /// Seeded from the extraction time, unique within one extraction run.
    pub id: i64,
    pub title_snippet: String,
    pub full_context: String,
    /// `task`, `extracted`, then up to three topical tags.
    pub tags: Vec<String>,
    pub source_note_title: String,
    pub completed: bool,
    pub pattern: TaskPattern,
}

/// Extracts tasks from raw note content.
///
/// `seed` is the first task id; each emitted task increments it.
pub fn extract_tasks(content: &str, note_title: &str, seed: i64) -> Vec<ExtractedTask> {
    let mut next_id = seed;
    let mut tasks = Vec::new();

    for (pattern, regex) in TASK_PATTERNS.iter() {
        for caps in regex.captures_iter(content) {
            let Some(text) = caps.get(1).map(|m| m.as_str().trim()) else {
                continue;
            };
            if text.chars().count() <= MIN_TASK_CHARS {
                continue;
            }

            tasks.push(build_task(next_id, *pattern, text, note_title));
            next_id += 1;
        }
    }

    tasks
}

fn build_task(id: i64, pattern: TaskPattern, text: &str, note_title: &str) -> ExtractedTask {
    let mut tags = vec!["task".to_string(), "extracted".to_string()];
    tags.extend(extract_task_tags(text));

    ExtractedTask {
        id,
        title_snippet: snippet(text),
        full_context: format!("Task extracted from note: \"{note_title}\"\n\n{text}"),
        tags,
        source_note_title: note_title.to_string(),
        completed: pattern == TaskPattern::CheckedChecklist,
        pattern,
    }
}

fn snippet(text: &str) -> String {
    if text.chars().count() <= MAX_SNIPPET_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(MAX_SNIPPET_CHARS).collect();
    truncated.push_str(SNIPPET_ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::{extract_tasks, TaskPattern, MAX_SNIPPET_CHARS};

    #[test]
    fn checked_item_yields_one_completed_task() {
        let tasks = extract_tasks("- [x] Replace combine belt", "Shop", 100);
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert!(task.completed);
        assert_eq!(task.title_snippet, "Replace combine belt");
        assert_eq!(task.pattern, TaskPattern::CheckedChecklist);
        assert!(task.tags.contains(&"equipment".to_string()));
    }

    #[test]
    fn open_items_and_prefixes_are_pending() {
        let content = "- [ ] Grease the baler\n* [ ] Order twine\nTODO: call the vet";
        let tasks = extract_tasks(content, "Chores", 1);
        let snippets: Vec<_> = tasks.iter().map(|task| task.title_snippet.as_str()).collect();
        assert_eq!(
            snippets,
            vec!["Grease the baler", "Order twine", "call the vet"]
        );
        assert!(tasks.iter().all(|task| !task.completed));
    }

    #[test]
    fn natural_language_stops_at_period_or_line_end() {
        let content = "We need to fix the mower before rain. Then relax.\nRemember to lock the shed";
        let tasks = extract_tasks(content, "Mower", 1);
        let snippets: Vec<_> = tasks.iter().map(|task| task.title_snippet.as_str()).collect();
        assert_eq!(snippets, vec!["fix the mower before rain", "lock the shed"]);
    }

    #[test]
    fn short_captures_are_ignored() {
        assert!(extract_tasks("- [ ] ab\nTODO: x", "Short", 1).is_empty());
    }

    #[test]
    fn overlapping_patterns_emit_duplicates() {
        let tasks = extract_tasks("- [ ] must check tire pressure", "Trucks", 1);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].pattern, TaskPattern::OpenChecklist);
        assert_eq!(tasks[1].pattern, TaskPattern::NaturalLanguage);
    }

    #[test]
    fn ids_increase_from_seed() {
        let tasks = extract_tasks("TODO: first thing\nTODO: second thing", "Ids", 500);
        let ids: Vec<_> = tasks.iter().map(|task| task.id).collect();
        assert_eq!(ids, vec![500, 501]);
    }

    #[test]
    fn long_text_is_snipped_with_ellipsis() {
        let long = "x".repeat(90);
        let tasks = extract_tasks(&format!("TODO: {long}"), "Long", 1);
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].title_snippet.ends_with("..."));
        assert_eq!(tasks[0].title_snippet.chars().count(), MAX_SNIPPET_CHARS + 3);
        assert!(tasks[0].full_context.contains(&long));
        assert!(tasks[0].full_context.starts_with("Task extracted from note: \"Long\""));
    }
}
