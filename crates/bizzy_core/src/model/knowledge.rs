//! Knowledge hub record: extracted tasks, Forge outputs, reports, references.
//!
//! # Invariants
//! - `status` is set iff `kind == KnowledgeKind::Task`.
//! - `title` is never blank.
//! - `task_seq` carries the extraction-run id for tasks mined from notes.

use crate::annotate::ExtractedTask;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for knowledge items.
pub type KnowledgeItemId = Uuid;

/// Module extracted tasks are filed under.
pub const HUB_MODULE: &str = "Hub";
/// Source recorded for published Forge outputs.
pub const FORGE_SOURCE: &str = "Bizzy Forge";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KnowledgeKind {
    Task,
    ForgeOutput,
    Report,
    Reference,
}

impl KnowledgeKind {
    /// Stable storage/CLI label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::ForgeOutput => "forge-output",
            Self::Report => "report",
            Self::Reference => "reference",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "task" => Some(Self::Task),
            "forge-output" => Some(Self::ForgeOutput),
            "report" => Some(Self::Report),
            "reference" => Some(Self::Reference),
            _ => None,
        }
    }
}

/// Completion state for task items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: KnowledgeItemId,
    pub kind: KnowledgeKind,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Owning app module, e.g. `Hub`, `Farmer`, `Library`.
    pub module: String,
    pub source: Option<String>,
    pub task_seq: Option<i64>,
    pub status: Option<TaskStatus>,
    pub created_at: i64,
}

/// Validation errors for knowledge item invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeValidationError {
    BlankTitle,
    TaskWithoutStatus,
    StatusOnNonTask(KnowledgeKind),
}

impl Display for KnowledgeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "knowledge item title cannot be blank"),
            Self::TaskWithoutStatus => write!(f, "task items require a status"),
            Self::StatusOnNonTask(kind) => {
                write!(f, "status is only valid for tasks, got `{}`", kind.as_str())
            }
        }
    }
}

impl Error for KnowledgeValidationError {}

impl KnowledgeItem {
    /// Files an extracted task under the hub module.
    pub fn from_extracted_task(task: &ExtractedTask, created_at: i64) -> Self {
        let status = if task.completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        };
        Self {
            id: Uuid::new_v4(),
            kind: KnowledgeKind::Task,
            title: task.title_snippet.clone(),
            content: task.full_context.clone(),
            tags: task.tags.clone(),
            module: HUB_MODULE.to_string(),
            source: Some(task.source_note_title.clone()),
            task_seq: Some(task.id),
            status: Some(status),
            created_at,
        }
    }

    /// Builds a published Forge output.
    pub fn forge_output(
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: KnowledgeKind::ForgeOutput,
            title: title.into(),
            content: content.into(),
            tags,
            module: HUB_MODULE.to_string(),
            source: Some(FORGE_SOURCE.to_string()),
            task_seq: None,
            status: None,
            created_at,
        }
    }

    /// Checks record invariants before persistence.
    pub fn validate(&self) -> Result<(), KnowledgeValidationError> {
        if self.title.trim().is_empty() {
            return Err(KnowledgeValidationError::BlankTitle);
        }
        match (self.kind, self.status) {
            (KnowledgeKind::Task, None) => Err(KnowledgeValidationError::TaskWithoutStatus),
            (KnowledgeKind::Task, Some(_)) => Ok(()),
            (kind, Some(_)) => Err(KnowledgeValidationError::StatusOnNonTask(kind)),
            (_, None) => Ok(()),
        }
    }
}
