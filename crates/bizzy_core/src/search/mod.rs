//! Search and filtering over notes, knowledge items and the inbox feed.
//!
//! # Responsibility
//! - Case-insensitive substring search shared by list views.
//! - Structured filters for the knowledge hub and inbox time windows.
//!
//! # Invariants
//! - A blank search text matches every item.

pub mod filter;

pub use filter::{matches_text, InboxWindow, KnowledgeFilter};
