//! Task state snapshot.

use taskdeck_core::{
    ApiError, FilterOptions, MotivationalQuote, SearchResults, Statistics, Task, TaskId,
};

/// Per-operation loading indicators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LoadingFlags {
    /// Listing or searching tasks.
    pub tasks: bool,
    /// Fetching statistics.
    pub statistics: bool,
    /// Fetching the quote.
    pub quote: bool,
    /// Creating a task.
    pub creating: bool,
    /// Updating or toggling a task.
    pub updating: bool,
    /// Deleting a task.
    pub deleting: bool,
}

impl LoadingFlags {
    /// Whether anything is loading.
    pub fn any(&self) -> bool {
        self.tasks || self.statistics || self.quote || self.creating || self.updating || self.deleting
    }
}

/// Everything the task views render from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskState {
    /// Current task list, in display order.
    pub tasks: Vec<Task>,
    /// Last statistics snapshot.
    pub statistics: Option<Statistics>,
    /// Last quote, or the offline fallback.
    pub quote: Option<MotivationalQuote>,
    /// Active filters.
    pub filters: FilterOptions,
    /// Result of the last search, cleared by a plain listing.
    pub search_results: Option<SearchResults>,
    /// Loading indicators.
    pub loading: LoadingFlags,
    /// Last failure from a user-visible action.
    pub error: Option<ApiError>,
}

impl TaskState {
    /// Task with the given id, if loaded.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}
