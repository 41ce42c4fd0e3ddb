//! Optimistic status toggle.
//!
//! A toggle is applied locally before the server confirms it. The pending
//! change is held as an [`OptimisticToggle`]; once the server answers it is
//! resolved into a [`Reconciliation`] that either installs the server's
//! version of the task or puts the prior status back.

use taskdeck_core::{ApiError, Task, TaskId, TaskPatch, TaskStatus};

/// A status change applied locally ahead of server confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptimisticToggle {
    /// Task being toggled.
    pub task_id: TaskId,
    /// Status before the toggle, restored on failure.
    pub prior: TaskStatus,
    /// Status requested from the server.
    pub target: TaskStatus,
}

impl OptimisticToggle {
    /// Toggle for `task`: pending becomes completed, anything else pending.
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_id: task.id,
            prior: task.status,
            target: task.status.toggled(),
        }
    }

    /// Apply the target status to the local copy. Returns whether a local
    /// entry was found.
    pub fn apply(&self, tasks: &mut [Task]) -> bool {
        match tasks.iter_mut().find(|t| t.id == self.task_id) {
            Some(task) => {
                task.status = self.target;
                true
            }
            None => false,
        }
    }

    /// Payload sent to the server: the status only.
    pub fn patch(&self) -> TaskPatch {
        TaskPatch::status(self.target)
    }

    /// Decide how to settle the local copy given the server's answer.
    pub fn resolve(&self, outcome: &Result<Task, ApiError>) -> Reconciliation {
        match outcome {
            Ok(task) => Reconciliation::Confirmed(task.clone()),
            Err(_) => Reconciliation::Reverted {
                task_id: self.task_id,
                prior: self.prior,
            },
        }
    }
}

/// How a settled toggle changes the local task list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// Server accepted; its representation replaces the local entry.
    Confirmed(Task),
    /// Server refused; the local entry goes back to its prior status.
    Reverted {
        /// Task that was toggled.
        task_id: TaskId,
        /// Status to restore.
        prior: TaskStatus,
    },
}

impl Reconciliation {
    /// Settle the local task list.
    pub fn apply(&self, tasks: &mut [Task]) {
        match self {
            Self::Confirmed(server) => {
                if let Some(local) = tasks.iter_mut().find(|t| t.id == server.id) {
                    *local = server.clone();
                }
            }
            Self::Reverted { task_id, prior } => {
                if let Some(local) = tasks.iter_mut().find(|t| t.id == *task_id) {
                    local.status = *prior;
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn task(id: TaskId, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: String::new(),
            status,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            user: 1,
        }
    }

    #[test]
    fn toggle_targets() {
        assert_eq!(
            OptimisticToggle::for_task(&task(1, TaskStatus::Pending)).target,
            TaskStatus::Completed
        );
        assert_eq!(
            OptimisticToggle::for_task(&task(1, TaskStatus::Completed)).target,
            TaskStatus::Pending
        );
        assert_eq!(
            OptimisticToggle::for_task(&task(1, TaskStatus::Cancelled)).target,
            TaskStatus::Pending
        );
    }

    #[test]
    fn patch_carries_status_only() {
        let toggle = OptimisticToggle::for_task(&task(1, TaskStatus::Pending));
        let patch = toggle.patch();
        assert_eq!(patch.status, Some(TaskStatus::Completed));
        assert!(patch.title.is_none());
        assert!(patch.description.is_none());
    }

    #[test]
    fn apply_touches_only_matching_task() {
        let mut tasks = vec![task(1, TaskStatus::Pending), task(2, TaskStatus::Pending)];
        let toggle = OptimisticToggle::for_task(&tasks[1].clone());
        assert!(toggle.apply(&mut tasks));
        assert_eq!(tasks[0].status, TaskStatus::Pending);
        assert_eq!(tasks[1].status, TaskStatus::Completed);

        let missing = OptimisticToggle::for_task(&task(9, TaskStatus::Pending));
        assert!(!missing.apply(&mut tasks));
    }

    #[test]
    fn failure_reverts_to_prior() {
        let original = task(1, TaskStatus::Completed);
        let mut tasks = vec![original.clone()];
        let toggle = OptimisticToggle::for_task(&original);
        let _ = toggle.apply(&mut tasks);
        assert_eq!(tasks[0].status, TaskStatus::Pending);

        let outcome = Err(ApiError::network("request timed out"));
        let rec = toggle.resolve(&outcome);
        assert_matches!(rec, Reconciliation::Reverted { task_id: 1, prior: TaskStatus::Completed });
        rec.apply(&mut tasks);
        assert_eq!(tasks, vec![original]);
    }

    #[test]
    fn success_installs_server_version() {
        let mut tasks = vec![task(1, TaskStatus::Pending)];
        let toggle = OptimisticToggle::for_task(&tasks[0].clone());
        let _ = toggle.apply(&mut tasks);

        let server = Task {
            title: "renamed on server".to_string(),
            ..task(1, TaskStatus::Completed)
        };
        let rec = toggle.resolve(&Ok(server.clone()));
        rec.apply(&mut tasks);
        assert_eq!(tasks[0], server);
    }
}
