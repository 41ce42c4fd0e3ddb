//! # taskdeck-core
//!
//! Domain types shared by every Taskdeck crate.
//!
//! - [`task`]: [`Task`], [`TaskStatus`], create/update payloads
//! - [`filters`]: [`FilterOptions`], [`FilterPatch`], [`SearchResults`]
//! - [`statistics`]: server-derived [`Statistics`] snapshot
//! - [`quote`]: [`MotivationalQuote`] with its offline fallback
//! - [`user`]: authenticated [`User`] identity
//! - [`errors`]: [`ApiError`], the normalized remote failure type
//!
//! Wire names follow the remote REST service (`snake_case` fields,
//! lowercase status values).

#![deny(unsafe_code)]

pub mod errors;
pub mod filters;
pub mod quote;
pub mod statistics;
pub mod task;
pub mod user;

pub use errors::{ApiError, ErrorKind};
pub use filters::{FilterOptions, FilterPatch, SearchResults, TaskOrdering};
pub use quote::MotivationalQuote;
pub use statistics::Statistics;
pub use task::{Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
pub use user::User;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _filters = FilterOptions::default();
        let _patch = FilterPatch::default();
        let _quote = MotivationalQuote::offline_fallback();
        let _draft = TaskDraft::new("x");
        assert_eq!(ErrorKind::Network.to_string(), "network");
    }
}
