//! Aggregate counts computed by the remote service.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Dashboard statistics snapshot. Replaced wholesale, never edited locally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// All tasks owned by the user.
    pub total_tasks: u64,
    /// Tasks with status `completed`.
    pub completed_tasks: u64,
    /// Tasks with status `pending`.
    pub pending_tasks: u64,
    /// Completed share as a percentage, rounded to one decimal.
    pub completion_rate: f64,
    /// Created today.
    pub tasks_today: u64,
    /// Created in the last seven days.
    pub tasks_this_week: u64,
    /// Created in the last thirty days.
    pub tasks_this_month: u64,
    /// Created today and already completed.
    pub completed_today: u64,
    /// Most recent tasks, newest first (at most five).
    pub recent_tasks: Vec<Task>,
}
