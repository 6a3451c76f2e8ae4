//! Keyword rule tables used by tag, action and task-tag inference.
//!
//! Tables are plain data so they can be reviewed and extended without
//! touching control flow. Table order is output order.

/// One substring rule: any keyword hit contributes `tag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub tag: &'static str,
}

impl KeywordRule {
    /// Returns whether `lowercased` contains any keyword of this rule.
    ///
    /// Callers pass already-lowercased text.
    pub fn matches(&self, lowercased: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowercased.contains(keyword))
    }
}

/// Contextual note tags.
pub const CONTEXT_TAG_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &[
            "equipment",
            "tractor",
            "plow",
            "harvester",
            "machinery",
            "mower",
            "combine",
        ],
        tag: "equipment",
    },
    KeywordRule {
        keywords: &["field", "crop", "plant", "harvest", "soil"],
        tag: "farming",
    },
    KeywordRule {
        keywords: &["weather", "rain", "temperature", "forecast"],
        tag: "weather",
    },
    KeywordRule {
        keywords: &["task", "todo", "need", "fix", "repair"],
        tag: "action-item",
    },
    KeywordRule {
        keywords: &["meeting", "call", "appointment", "schedule"],
        tag: "calendar",
    },
    KeywordRule {
        keywords: &["expense", "cost", "price", "budget", "money"],
        tag: "financial",
    },
    KeywordRule {
        keywords: &["note", "reminder", "important", "remember"],
        tag: "reminder",
    },
    KeywordRule {
        keywords: &["research", "study", "learn", "information"],
        tag: "knowledge",
    },
];

/// Topical tags attached to extracted tasks.
pub const TASK_TAG_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["fix", "repair", "broken", "maintenance"],
        tag: "maintenance",
    },
    KeywordRule {
        keywords: &["buy", "purchase", "order", "get"],
        tag: "procurement",
    },
    KeywordRule {
        keywords: &["call", "contact", "phone", "email"],
        tag: "communication",
    },
    KeywordRule {
        keywords: &["plant", "seed", "harvest", "crop"],
        tag: "farming",
    },
    KeywordRule {
        keywords: &["equipment", "tractor", "combine", "machinery"],
        tag: "equipment",
    },
    KeywordRule {
        keywords: &["urgent", "asap", "important", "critical"],
        tag: "priority",
    },
    KeywordRule {
        keywords: &["meeting", "schedule", "appointment"],
        tag: "calendar",
    },
];

/// Source a suggested-action rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTrigger {
    /// Any keyword appears in the lowercased content.
    ContentKeywords(&'static [&'static str]),
    /// Any of these tags was inferred for the note.
    AnyTag(&'static [&'static str]),
}

/// One content/tag to action rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRule {
    pub trigger: ActionTrigger,
    pub action: &'static str,
}

/// Content-derived action rules, evaluated in order.
pub const ACTION_RULES: &[ActionRule] = &[
    ActionRule {
        trigger: ActionTrigger::ContentKeywords(&["fix", "repair", "broken"]),
        action: "Create Task",
    },
    ActionRule {
        trigger: ActionTrigger::ContentKeywords(&["meeting", "appointment", "schedule"]),
        action: "Add to Calendar",
    },
    ActionRule {
        trigger: ActionTrigger::ContentKeywords(&["expense", "cost", "price"]),
        action: "Add to Budget",
    },
    ActionRule {
        trigger: ActionTrigger::AnyTag(&["farming", "equipment"]),
        action: "Add to Forge",
    },
    ActionRule {
        trigger: ActionTrigger::AnyTag(&["knowledge", "research"]),
        action: "Add to Library",
    },
];

/// Actions offered for every note, after content-derived ones.
pub const DEFAULT_ACTIONS: &[&str] = &["Add to Journal", "Archive"];

#[cfg(test)]
mod tests {
    use super::{CONTEXT_TAG_RULES, TASK_TAG_RULES};
    use std::collections::HashSet;

    #[test]
    fn rule_tables_have_unique_tags() {
        for table in [CONTEXT_TAG_RULES, TASK_TAG_RULES] {
            let tags: HashSet<_> = table.iter().map(|rule| rule.tag).collect();
            assert_eq!(tags.len(), table.len());
        }
    }

    #[test]
    fn keywords_are_lowercase() {
        for rule in CONTEXT_TAG_RULES.iter().chain(TASK_TAG_RULES) {
            for keyword in rule.keywords {
                assert_eq!(*keyword, keyword.to_lowercase());
            }
        }
    }
}
