//! Query routing between quick answers and the generation workspace.
//!
//! # Responsibility
//! - Decide whether a free-text query asks for an authored artifact
//!   (report, table, plan, calculation) or a short direct answer.
//!
//! # Invariants
//! - Classification is a pure substring test over the lowercased query.
//! - Matching is not token-boundary aware: `creates` matches `create`.
//! - Empty input never classifies as `Generate`.

use serde::{Deserialize, Serialize};

/// Keywords that mark a query as asking for a generated artifact.
///
/// Order carries no precedence; any single hit is enough.
pub const CREATION_KEYWORDS: &[&str] = &[
    "create",
    "build",
    "generate",
    "make",
    "design",
    "plan",
    "report",
    "table",
    "chart",
    "analysis",
    "recommendation",
    "forecast",
    "calculate",
    "compare",
    "budget",
    "schedule",
    "optimize",
    "project",
    "app",
    "tool",
];

/// Outcome of [`classify_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Short factual answer shown inline.
    QuickAnswer,
    /// Multi-part artifact produced in the generation workspace.
    Generate,
}

impl RouteDecision {
    /// Stable label used by logs and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QuickAnswer => "quick_answer",
            Self::Generate => "generate",
        }
    }
}

/// Classifies one query.
///
/// Whitespace-only queries fall through to `QuickAnswer`; callers that need
/// to reject blank input do so before routing.
pub fn classify_query(query: &str) -> RouteDecision {
    let normalized = query.to_lowercase();
    if CREATION_KEYWORDS
        .iter()
        .any(|keyword| normalized.contains(keyword))
    {
        RouteDecision::Generate
    } else {
        RouteDecision::QuickAnswer
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_query, RouteDecision};

    #[test]
    fn creation_keyword_routes_to_generate() {
        assert_eq!(
            classify_query("Create a budget for October"),
            RouteDecision::Generate
        );
        assert_eq!(
            classify_query("What's the FORECAST for canola?"),
            RouteDecision::Generate
        );
    }

    #[test]
    fn plain_question_routes_to_quick_answer() {
        assert_eq!(
            classify_query("Did it rain yesterday?"),
            RouteDecision::QuickAnswer
        );
    }

    #[test]
    fn empty_and_blank_queries_are_quick_answers() {
        assert_eq!(classify_query(""), RouteDecision::QuickAnswer);
        assert_eq!(classify_query("   \n"), RouteDecision::QuickAnswer);
    }

    #[test]
    fn substring_match_ignores_word_boundaries() {
        assert_eq!(
            classify_query("who creates the rotation"),
            RouteDecision::Generate
        );
        // "happy" contains "app".
        assert_eq!(classify_query("is the cow happy"), RouteDecision::Generate);
    }
}
