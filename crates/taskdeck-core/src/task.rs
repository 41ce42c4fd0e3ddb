//! Task entity and its mutation payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
pub type TaskId = i64;

/// Lifecycle status of a task.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not done yet.
    #[default]
    Pending,
    /// Done.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl TaskStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Status a completion toggle moves to.
    ///
    /// `Pending` becomes `Completed`; everything else goes back to
    /// `Pending`. A toggle never produces `Cancelled`.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed | Self::Cancelled => Self::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// A task as returned by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id, assigned by the server.
    pub id: TaskId,
    /// Short title, never empty.
    pub title: String,
    /// Free-form description; empty when absent.
    #[serde(default)]
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// Creation time, immutable.
    pub created_at: DateTime<Utc>,
    /// Owning user id.
    pub user: i64,
}

impl Task {
    /// Copy of this task with a different status.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// Payload for creating a task. The server fills in id, timestamp and owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task title. Callers reject empty titles before submitting.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Initial status.
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Draft with the given title, empty description and `pending` status.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: TaskStatus::Pending,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the initial status.
    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update. Only fields that are `Some` are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Patch that changes only the status.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Patch that changes only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Whether the patch carries no changes.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": 5,
            "title": "Write report",
            "description": "quarterly",
            "status": "pending",
            "created_at": "2024-01-01T10:00:00Z",
            "user": 1
        })
    }

    #[test]
    fn toggle_flips_pending_and_completed() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn toggle_never_yields_cancelled() {
        assert_eq!(TaskStatus::Cancelled.toggled(), TaskStatus::Pending);
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!("completed".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn task_deserializes_from_server_shape() {
        let task: Task = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(task.id, 5);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at.to_rfc3339(), "2024-01-01T10:00:00+00:00");
    }

    #[test]
    fn task_without_description_defaults_to_empty() {
        let mut json = sample_json();
        let _ = json.as_object_mut().unwrap().remove("description");
        let task: Task = serde_json::from_value(json).unwrap();
        assert!(task.description.is_empty());
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut json = sample_json();
        json["status"] = serde_json::json!("archived");
        assert!(serde_json::from_value::<Task>(json).is_err());
    }

    #[test]
    fn with_status_keeps_other_fields() {
        let task: Task = serde_json::from_value(sample_json()).unwrap();
        let done = task.with_status(TaskStatus::Completed);
        assert_eq!(done.status, TaskStatus::Completed);
        assert_eq!(done.title, task.title);
        assert_eq!(done.created_at, task.created_at);
    }

    #[test]
    fn patch_serializes_only_changed_fields() {
        let json = serde_json::to_value(TaskPatch::status(TaskStatus::Completed)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "completed"}));
    }

    #[test]
    fn empty_patch_detection() {
        assert!(TaskPatch::default().is_empty());
        assert!(!TaskPatch::title("x").is_empty());
    }

    #[test]
    fn draft_builder_defaults_to_pending() {
        let draft = TaskDraft::new("Buy milk").description("2 liters");
        assert_eq!(draft.status, TaskStatus::Pending);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["description"], "2 liters");
        assert_eq!(json["status"], "pending");
    }
}
