//! In-memory filters applied after storage reads.

use crate::model::knowledge::KnowledgeItem;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Module value meaning "no module restriction".
pub const ALL_MODULES: &str = "All";
const WEEK_SPAN_DAYS: i64 = 6;

/// Returns whether `query` appears in the title, content or any tag.
///
/// Comparison is case-insensitive; blank queries match everything.
pub fn matches_text(query: &str, title: &str, content: &str, tags: &[String]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    title.to_lowercase().contains(&needle)
        || content.to_lowercase().contains(&needle)
        || tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
}

/// Knowledge hub filter: text, module and any-of tag selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeFilter {
    pub text: Option<String>,
    /// Exact module name; `None` or `"All"` disables the check.
    pub module: Option<String>,
    /// Item must carry at least one of these when non-empty.
    pub tags: Vec<String>,
}

impl KnowledgeFilter {
    pub fn matches(&self, item: &KnowledgeItem) -> bool {
        let text_ok = self
            .text
            .as_deref()
            .map_or(true, |text| matches_text(text, &item.title, &item.content, &item.tags));
        let module_ok = match self.module.as_deref() {
            None | Some(ALL_MODULES) => true,
            Some(module) => item.module == module,
        };
        let tags_ok = self.tags.is_empty() || self.tags.iter().any(|tag| item.tags.contains(tag));

        text_ok && module_ok && tags_ok
    }
}

/// Relative time window for the inbox feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxWindow {
    Today,
    /// Today and the six days before it.
    ThisWeek,
    /// Same calendar month and year as today.
    ThisMonth,
    #[default]
    All,
}

impl InboxWindow {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "today" => Some(Self::Today),
            "this_week" | "week" => Some(Self::ThisWeek),
            "this_month" | "month" => Some(Self::ThisMonth),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Returns whether an item dated `date` falls inside the window.
    ///
    /// Items dated after `today` only match `All`.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Today => date == today,
            Self::ThisWeek => {
                let age = (today - date).num_days();
                (0..=WEEK_SPAN_DAYS).contains(&age)
            }
            Self::ThisMonth => {
                date <= today && date.year() == today.year() && date.month() == today.month()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{matches_text, InboxWindow, KnowledgeFilter};
    use crate::model::knowledge::KnowledgeItem;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn text_match_checks_title_content_and_tags() {
        let tags = vec!["Maintenance".to_string()];
        assert!(matches_text("MOWER", "Mower blades", "", &[]));
        assert!(matches_text("belt", "", "replace the belt", &[]));
        assert!(matches_text("maint", "", "", &tags));
        assert!(!matches_text("seed", "Mower", "blade", &tags));
        assert!(matches_text("  ", "", "", &[]));
    }

    #[test]
    fn knowledge_filter_combines_all_criteria() {
        let item = KnowledgeItem::forge_output(
            "Soil plan",
            "north field sampling",
            vec!["soil".to_string(), "plan".to_string()],
            0,
        );

        assert!(KnowledgeFilter::default().matches(&item));
        let filter = KnowledgeFilter {
            text: Some("north".to_string()),
            module: Some("All".to_string()),
            tags: vec!["soil".to_string(), "market".to_string()],
        };
        assert!(filter.matches(&item));

        let wrong_module = KnowledgeFilter {
            module: Some("Trader".to_string()),
            ..KnowledgeFilter::default()
        };
        assert!(!wrong_module.matches(&item));

        let wrong_tag = KnowledgeFilter {
            tags: vec!["market".to_string()],
            ..KnowledgeFilter::default()
        };
        assert!(!wrong_tag.matches(&item));
    }

    #[test]
    fn inbox_windows_are_relative_to_today() {
        let today = day(2024, 10, 16);
        assert!(InboxWindow::Today.contains(today, today));
        assert!(!InboxWindow::Today.contains(day(2024, 10, 15), today));
        assert!(InboxWindow::ThisWeek.contains(day(2024, 10, 10), today));
        assert!(!InboxWindow::ThisWeek.contains(day(2024, 10, 9), today));
        assert!(InboxWindow::ThisMonth.contains(day(2024, 10, 1), today));
        assert!(!InboxWindow::ThisMonth.contains(day(2023, 10, 1), today));
        assert!(InboxWindow::All.contains(day(1999, 1, 1), today));
    }

    #[test]
    fn window_labels_parse() {
        assert_eq!(InboxWindow::parse("This Week"), Some(InboxWindow::ThisWeek));
        assert_eq!(InboxWindow::parse("today"), Some(InboxWindow::Today));
        assert_eq!(InboxWindow::parse("this-month"), Some(InboxWindow::ThisMonth));
        assert_eq!(InboxWindow::parse("yesterday"), None);
    }
}
