//! Domain records persisted by the core.
//!
//! # Responsibility
//! - Define the typed collections that replace ad hoc key-value storage:
//!   notes, the inbox feed and the knowledge hub.
//!
//! # Invariants
//! - Every persisted record is identified by a stable UUID.
//! - Timestamps are Unix epoch milliseconds.

pub mod inbox;
pub mod knowledge;
pub mod note;
