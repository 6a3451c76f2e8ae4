//! Content and title normalization.
//!
//! # Invariants
//! - Content rewrites run in a fixed order; later whitespace collapsing
//!   relies on the structural spacing inserted by earlier steps.
//! - `cleanup_content` is a fixed point: a second pass changes nothing.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Substituted when title cleanup leaves nothing.
pub const FALLBACK_TITLE: &str = "Processed Note";
/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 60;

static EXCESS_NEWLINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));
static DASH_BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*-\s*").expect("valid dash bullet regex"));
static STAR_BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*\*\s*").expect("valid star bullet regex"));
static NUMBERED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(\d+)\.\s*").expect("valid numbered item regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#{1,6}\s*").expect("valid heading regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid bold regex"));
static SENTENCE_GAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])\s*([a-z])").expect("valid sentence regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static TITLE_EDGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^a-zA-Z0-9]*|[^a-zA-Z0-9]*$").expect("valid title edge regex")
});

/// Normalizes raw note content.
///
/// Steps, in order:
/// 1. 3+ newlines collapse to 2.
/// 2. Dash, star and numbered list markers get exactly one trailing space.
/// 3. Heading hashes get exactly one trailing space.
/// 4. Bold spans are rewritten to canonical `**x**`.
/// 5. Sentence punctuation before a lowercase letter gets one space.
/// 6. Whitespace runs collapse to one space, then the result is trimmed.
pub fn cleanup_content(content: &str) -> String {
    let text = EXCESS_NEWLINES_RE.replace_all(content, "\n\n");
    let text = DASH_BULLET_RE.replace_all(&text, "- ");
    let text = STAR_BULLET_RE.replace_all(&text, "* ");
    let text = NUMBERED_ITEM_RE.replace_all(&text, "$1. ");
    let text = HEADING_RE.replace_all(&text, |caps: &Captures<'_>| {
        format!("{} ", caps[0].trim())
    });
    let text = BOLD_RE.replace_all(&text, "**$1**");
    let text = SENTENCE_GAP_RE.replace_all(&text, "$1 $2");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Normalizes a note title.
///
/// Non-alphanumeric edges are stripped, whitespace collapsed, and the result
/// is capped at [`MAX_TITLE_CHARS`]. Empty results become [`FALLBACK_TITLE`].
pub fn cleanup_title(title: &str) -> String {
    let stripped = TITLE_EDGE_RE.replace_all(title, "");
    let collapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    let capped: String = collapsed.trim().chars().take(MAX_TITLE_CHARS).collect();
    if capped.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        capped
    }
}

#[cfg(test)]
mod tests {
    use super::{cleanup_content, cleanup_title, FALLBACK_TITLE, MAX_TITLE_CHARS};
    use proptest::prelude::*;

    #[test]
    fn content_collapses_whitespace_and_trims() {
        assert_eq!(cleanup_content("  hello \n\n\n\n world  "), "hello world");
    }

    #[test]
    fn content_normalizes_list_markers() {
        assert_eq!(cleanup_content("-one"), "- one");
        assert_eq!(cleanup_content("*   two"), "* two");
        assert_eq!(cleanup_content("3.three"), "3. three");
    }

    #[test]
    fn content_spaces_headings_and_sentences() {
        assert_eq!(cleanup_content("##Plan"), "## Plan");
        assert_eq!(cleanup_content("Done.next step"), "Done. next step");
    }

    #[test]
    fn content_of_blank_input_is_empty() {
        assert_eq!(cleanup_content(""), "");
        assert_eq!(cleanup_content(" \n\t "), "");
    }

    #[test]
    fn title_strips_edges_and_falls_back() {
        assert_eq!(cleanup_title("  ** Mower   repair!! "), "Mower repair");
        assert_eq!(cleanup_title(""), FALLBACK_TITLE);
        assert_eq!(cleanup_title("---"), FALLBACK_TITLE);
    }

    #[test]
    fn title_is_capped() {
        let long = "a".repeat(200);
        assert_eq!(cleanup_title(&long).chars().count(), MAX_TITLE_CHARS);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn content_cleanup_is_a_fixed_point(input in "[-*#.!? \n\ta-zA-Z0-9\\[\\]]{0,64}") {
            let once = cleanup_content(&input);
            let twice = cleanup_content(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
