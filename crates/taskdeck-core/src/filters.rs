//! Search/filter state and the result snapshot it produces.
//!
//! [`FilterOptions`] is the full filter state held by the store. A
//! [`FilterPatch`] describes a partial change: every field is either left
//! alone (`None`) or replaced. Optional fields use a nested `Option` so a
//! patch can also unset them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskStatus};

/// Date format used on the wire for `date_from`/`date_to`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sort order understood by the remote service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskOrdering {
    /// Newest first.
    #[default]
    #[serde(rename = "-created_at")]
    CreatedDesc,
    /// Oldest first.
    #[serde(rename = "created_at")]
    CreatedAsc,
    /// Title A→Z.
    #[serde(rename = "title")]
    TitleAsc,
    /// Title Z→A.
    #[serde(rename = "-title")]
    TitleDesc,
    /// Grouped by status.
    #[serde(rename = "status")]
    Status,
}

impl TaskOrdering {
    /// Query-string value.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::CreatedDesc => "-created_at",
            Self::CreatedAsc => "created_at",
            Self::TitleAsc => "title",
            Self::TitleDesc => "-title",
            Self::Status => "status",
        }
    }
}

/// Current filter state. Empty search and `None` fields mean "unset".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Free-text search over title and description.
    pub search: String,
    /// Restrict to one status.
    pub status: Option<TaskStatus>,
    /// Created on or after this date.
    pub date_from: Option<NaiveDate>,
    /// Created on or before this date.
    pub date_to: Option<NaiveDate>,
    /// Sort order.
    pub ordering: TaskOrdering,
}

impl FilterOptions {
    /// Apply a patch in place. Fields the patch leaves `None` keep their value.
    pub fn merge(&mut self, patch: &FilterPatch) {
        if let Some(search) = &patch.search {
            self.search.clone_from(search);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(date_from) = patch.date_from {
            self.date_from = date_from;
        }
        if let Some(date_to) = patch.date_to {
            self.date_to = date_to;
        }
        if let Some(ordering) = patch.ordering {
            self.ordering = ordering;
        }
    }

    /// Copy of these filters with a patch applied.
    #[must_use]
    pub fn merged(&self, patch: &FilterPatch) -> Self {
        let mut next = self.clone();
        next.merge(patch);
        next
    }

    /// Whether these are the default filters.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Query parameters for the search endpoint. Unset fields are omitted.
    ///
    /// Free text goes out as `q`, dates as `YYYY-MM-DD`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("q", search.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(date) = self.date_from {
            pairs.push(("date_from", date.format(DATE_FORMAT).to_string()));
        }
        if let Some(date) = self.date_to {
            pairs.push(("date_to", date.format(DATE_FORMAT).to_string()));
        }
        pairs.push(("ordering", self.ordering.as_query().to_string()));
        pairs
    }
}

/// Partial filter update.
///
/// Built with the setter methods:
///
/// ```ignore
/// let patch = FilterPatch::default().status(TaskStatus::Completed).search("milk");
/// ```
#[allow(clippy::option_option)]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterPatch {
    /// Replacement search text (empty string clears it).
    pub search: Option<String>,
    /// Replacement status filter; `Some(None)` clears it.
    pub status: Option<Option<TaskStatus>>,
    /// Replacement lower date bound; `Some(None)` clears it.
    pub date_from: Option<Option<NaiveDate>>,
    /// Replacement upper date bound; `Some(None)` clears it.
    pub date_to: Option<Option<NaiveDate>>,
    /// Replacement ordering.
    pub ordering: Option<TaskOrdering>,
}

impl FilterPatch {
    /// Set the search text.
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Filter by status.
    #[must_use]
    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = Some(Some(status));
        self
    }

    /// Drop the status filter.
    #[must_use]
    pub fn any_status(mut self) -> Self {
        self.status = Some(None);
        self
    }

    /// Set the lower date bound.
    #[must_use]
    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(Some(date));
        self
    }

    /// Drop the lower date bound.
    #[must_use]
    pub fn clear_date_from(mut self) -> Self {
        self.date_from = Some(None);
        self
    }

    /// Set the upper date bound.
    #[must_use]
    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(Some(date));
        self
    }

    /// Drop the upper date bound.
    #[must_use]
    pub fn clear_date_to(mut self) -> Self {
        self.date_to = Some(None);
        self
    }

    /// Set the ordering.
    #[must_use]
    pub fn ordering(mut self, ordering: TaskOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }
}

/// Result of the last executed search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching tasks in server order.
    pub results: Vec<Task>,
    /// Number of matches.
    pub count: usize,
    /// Filters that produced this result.
    pub filters_applied: FilterOptions,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
