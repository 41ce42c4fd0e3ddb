//! The task store.
//!
//! [`TaskStore`] is cheap to clone; clones share the same state. Each action
//! follows the same shape: flip a loading flag, call the remote API, then
//! apply the outcome in one synchronous update. Overlapping calls are not
//! cancelled, so whichever finishes last wins.

use std::sync::Arc;

use bytes::Bytes;
use taskdeck_api::TaskApi;
use taskdeck_core::{
    ApiError, FilterOptions, FilterPatch, MotivationalQuote, Task, TaskDraft, TaskId, TaskPatch,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::optimistic::OptimisticToggle;
use crate::state::TaskState;

/// How a mutation refreshes statistics after it succeeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatsRefresh {
    /// Spawn the refresh and return immediately.
    Detached,
    /// Finish the refresh before the action returns.
    Awaited,
}

/// Owner of [`TaskState`].
#[derive(Clone)]
pub struct TaskStore {
    api: Arc<dyn TaskApi>,
    state: Arc<watch::Sender<TaskState>>,
}

impl TaskStore {
    /// Empty store backed by `api`.
    pub fn new(api: Arc<dyn TaskApi>) -> Self {
        let (state, _) = watch::channel(TaskState::default());
        Self {
            api,
            state: Arc::new(state),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> TaskState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TaskState> {
        self.state.subscribe()
    }

    /// Active filters.
    pub fn filters(&self) -> FilterOptions {
        self.state.borrow().filters.clone()
    }

    // ── Listing ────────────────────────────────────────────────────

    /// Load every task, replacing the list and dropping any search results.
    #[tracing::instrument(skip_all)]
    pub async fn fetch_tasks(&self) {
        self.state.send_modify(|s| {
            s.loading.tasks = true;
            s.error = None;
        });

        let result = self.api.get_all().await;
        if let Err(err) = &result {
            warn!(kind = %err.kind(), error = %err, "failed to load tasks");
        }

        self.state.send_modify(|s| {
            s.loading.tasks = false;
            match result {
                Ok(tasks) => {
                    debug!(count = tasks.len(), "tasks loaded");
                    s.tasks = tasks;
                    s.search_results = None;
                }
                Err(err) => s.error = Some(err),
            }
        });
    }

    /// Search with the current filters, optionally updated by `patch` first.
    ///
    /// The merged filters are kept even when the search fails.
    #[tracing::instrument(skip_all)]
    pub async fn search_tasks(&self, patch: Option<&FilterPatch>) {
        let mut filters = FilterOptions::default();
        self.state.send_modify(|s| {
            if let Some(patch) = patch {
                s.filters.merge(patch);
            }
            filters.clone_from(&s.filters);
            s.loading.tasks = true;
            s.error = None;
        });

        let result = self.api.search(&filters).await;
        if let Err(err) = &result {
            warn!(kind = %err.kind(), error = %err, "search failed");
        }

        self.state.send_modify(|s| {
            s.loading.tasks = false;
            match result {
                Ok(results) => {
                    debug!(count = results.count, "search finished");
                    s.tasks.clone_from(&results.results);
                    s.search_results = Some(results);
                }
                Err(err) => s.error = Some(err),
            }
        });
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Create a task and put it at the front of the list.
    ///
    /// Statistics are refreshed in the background; a failed refresh does not
    /// affect the create.
    #[tracing::instrument(skip_all)]
    pub async fn create_task(&self, draft: &TaskDraft) -> Option<Task> {
        self.state.send_modify(|s| {
            s.loading.creating = true;
            s.error = None;
        });

        let result = self.api.create(draft).await;
        match result {
            Ok(task) => {
                self.state.send_modify(|s| {
                    s.tasks.insert(0, task.clone());
                    s.loading.creating = false;
                });
                debug!(task_id = task.id, "task created");
                self.refresh_statistics(StatsRefresh::Detached).await;
                Some(task)
            }
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "failed to create task");
                self.fail(err, |s| s.loading.creating = false);
                None
            }
        }
    }

    /// Apply `patch` to a task and replace the local copy with the server's.
    #[tracing::instrument(skip_all, fields(task_id = id))]
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Option<Task> {
        self.state.send_modify(|s| {
            s.loading.updating = true;
            s.error = None;
        });

        match self.api.update(id, patch).await {
            Ok(task) => {
                let mut found = false;
                self.state.send_modify(|s| {
                    if let Some(local) = s.task_mut(id) {
                        *local = task.clone();
                        found = true;
                    }
                    s.loading.updating = false;
                });
                if !found {
                    warn!(task_id = id, "updated task not present locally");
                }
                self.refresh_statistics(StatsRefresh::Awaited).await;
                Some(task)
            }
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "failed to update task");
                self.fail(err, |s| s.loading.updating = false);
                None
            }
        }
    }

    /// Delete a task. Returns whether the server accepted.
    #[tracing::instrument(skip_all, fields(task_id = id))]
    pub async fn delete_task(&self, id: TaskId) -> bool {
        self.state.send_modify(|s| {
            s.loading.deleting = true;
            s.error = None;
        });

        match self.api.delete(id).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.tasks.retain(|t| t.id != id);
                    s.loading.deleting = false;
                });
                self.refresh_statistics(StatsRefresh::Detached).await;
                true
            }
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "failed to delete task");
                self.fail(err, |s| s.loading.deleting = false);
                false
            }
        }
    }

    /// Flip a task between pending and completed.
    ///
    /// The local copy changes before the server is asked. On failure the
    /// prior status is restored and the error is returned to the caller as
    /// well as recorded in the state.
    #[tracing::instrument(skip_all, fields(task_id = task.id))]
    pub async fn toggle_task_status(&self, task: &Task) -> Result<Task, ApiError> {
        let toggle = OptimisticToggle::for_task(task);
        let mut applied = false;
        self.state.send_modify(|s| {
            applied = toggle.apply(&mut s.tasks);
            s.loading.updating = true;
            s.error = None;
        });
        if !applied {
            debug!("toggled task not loaded locally");
        }

        let outcome = self.api.update(toggle.task_id, &toggle.patch()).await;
        let reconciliation = toggle.resolve(&outcome);
        self.state.send_modify(|s| {
            reconciliation.apply(&mut s.tasks);
            s.loading.updating = false;
            if let Err(err) = &outcome {
                s.error = Some(err.clone());
            }
        });

        match outcome {
            Ok(confirmed) => {
                self.refresh_statistics(StatsRefresh::Awaited).await;
                Ok(confirmed)
            }
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, prior = %toggle.prior, "status change reverted");
                Err(err)
            }
        }
    }

    // ── Dashboard ──────────────────────────────────────────────────

    /// Refresh statistics. A failure keeps the previous snapshot and is not
    /// reported through the shared error.
    pub async fn fetch_statistics(&self) {
        self.state.send_modify(|s| s.loading.statistics = true);

        let result = self.api.get_statistics().await;
        self.state.send_modify(|s| {
            s.loading.statistics = false;
            match result {
                Ok(stats) => s.statistics = Some(stats),
                Err(err) => debug!(error = %err, "statistics refresh failed"),
            }
        });
    }

    /// Fetch a quote, falling back to the offline quote on failure.
    pub async fn fetch_quote(&self) {
        self.state.send_modify(|s| s.loading.quote = true);

        let quote = match self.api.get_motivational_quote().await {
            Ok(quote) => quote,
            Err(err) => {
                debug!(error = %err, "quote unavailable, using offline quote");
                MotivationalQuote::offline_fallback()
            }
        };
        self.state.send_modify(|s| {
            s.loading.quote = false;
            s.quote = Some(quote);
        });
    }

    // ── Filters ────────────────────────────────────────────────────

    /// Merge `patch` into the active filters without searching.
    pub fn set_filters(&self, patch: &FilterPatch) {
        let _ = self.state.send_if_modified(|s| {
            let merged = s.filters.merged(patch);
            if merged == s.filters {
                return false;
            }
            s.filters = merged;
            true
        });
    }

    /// Reset filters and search results, then reload the full list.
    pub async fn clear_filters(&self) {
        self.state.send_modify(|s| {
            s.filters = FilterOptions::default();
            s.search_results = None;
        });
        self.fetch_tasks().await;
    }

    // ── Misc ───────────────────────────────────────────────────────

    /// Clear the shared error.
    pub fn clear_error(&self) {
        let _ = self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Download the CSV export.
    pub async fn export_csv(&self) -> Option<Bytes> {
        self.state.send_modify(|s| s.error = None);
        match self.api.export_csv().await {
            Ok(bytes) => {
                debug!(len = bytes.len(), "export downloaded");
                Some(bytes)
            }
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "export failed");
                self.state.send_modify(|s| s.error = Some(err));
                None
            }
        }
    }

    /// Drop everything and return to the initial state.
    pub fn reset(&self) {
        let _ = self.state.send_replace(TaskState::default());
    }

    async fn refresh_statistics(&self, policy: StatsRefresh) {
        match policy {
            StatsRefresh::Detached => {
                let store = self.clone();
                drop(tokio::spawn(async move { store.fetch_statistics().await }));
            }
            StatsRefresh::Awaited => self.fetch_statistics().await,
        }
    }

    fn fail(&self, err: ApiError, finish: impl FnOnce(&mut TaskState)) {
        self.state.send_modify(|s| {
            finish(s);
            s.error = Some(err);
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
