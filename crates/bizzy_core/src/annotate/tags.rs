//! Tag inference from hashtags and keyword tables.

use crate::annotate::rules::{KeywordRule, CONTEXT_TAG_RULES, TASK_TAG_RULES};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum tags attached to an annotated note.
pub const MAX_NOTE_TAGS: usize = 5;
/// Maximum topical tags attached to one extracted task.
pub const MAX_TASK_TOPIC_TAGS: usize = 3;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("valid hashtag regex"));

/// Returns hashtag tokens in order of appearance, lowercased, without `#`.
///
/// Duplicates are kept; callers dedupe.
pub fn hashtags(content: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_lowercase()))
        .collect()
}

/// Infers note tags: hashtags first, then contextual keyword tags.
///
/// Result is deduplicated (first occurrence wins) and capped at
/// [`MAX_NOTE_TAGS`].
pub fn extract_tags(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    let mut tags = Vec::new();
    for tag in hashtags(content) {
        push_unique(&mut tags, tag);
    }
    for tag in matching_tags(CONTEXT_TAG_RULES, &lowered) {
        push_unique(&mut tags, tag.to_string());
    }
    tags.truncate(MAX_NOTE_TAGS);
    tags
}

/// Infers topical tags for a single task text, capped at
/// [`MAX_TASK_TOPIC_TAGS`].
pub fn extract_task_tags(task_text: &str) -> Vec<String> {
    let lowered = task_text.to_lowercase();
    matching_tags(TASK_TAG_RULES, &lowered)
        .take(MAX_TASK_TOPIC_TAGS)
        .map(str::to_string)
        .collect()
}

fn matching_tags<'a>(
    rules: &'a [KeywordRule],
    lowered: &'a str,
) -> impl Iterator<Item = &'static str> + 'a {
    rules
        .iter()
        .filter(move |rule| rule.matches(lowered))
        .map(|rule| rule.tag)
}

pub(crate) fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
