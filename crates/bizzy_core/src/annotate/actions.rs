//! Suggested follow-up actions for an annotated note.

use crate::annotate::rules::{ActionTrigger, ACTION_RULES, DEFAULT_ACTIONS};
use crate::annotate::tags::push_unique;

/// Maximum suggested actions per note.
pub const MAX_ACTIONS: usize = 4;

/// Infers suggested actions from content and already-inferred tags.
///
/// Content-derived actions come first in rule order; the defaults are
/// appended afterwards, so they only survive the cap when room remains.
pub fn suggest_actions(content: &str, tags: &[String]) -> Vec<String> {
    let lowered = content.to_lowercase();
    let mut actions = Vec::new();

    for rule in ACTION_RULES {
        let fired = match rule.trigger {
            ActionTrigger::ContentKeywords(keywords) => {
                keywords.iter().any(|keyword| lowered.contains(keyword))
            }
            ActionTrigger::AnyTag(wanted) => tags.iter().any(|tag| wanted.contains(&tag.as_str())),
        };
        if fired {
            push_unique(&mut actions, rule.action.to_string());
        }
    }

    for action in DEFAULT_ACTIONS {
        push_unique(&mut actions, (*action).to_string());
    }

    actions.truncate(MAX_ACTIONS);
    actions
}
