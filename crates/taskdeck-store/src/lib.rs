//! # taskdeck-store
//!
//! Client-side task state and the actions that change it.
//!
//! - [`state`]: the [`TaskState`] snapshot and its [`LoadingFlags`]
//! - [`store`]: [`TaskStore`], the single writer of that state
//! - [`optimistic`]: the optimistic status toggle and its reconciliation
//!
//! Consumers read snapshots with [`TaskStore::state`] or watch for changes
//! with [`TaskStore::subscribe`]. Every action updates the state in short
//! synchronous sections; nothing is held across a remote call.

#![deny(unsafe_code)]

pub mod optimistic;
pub mod state;
pub mod store;

pub use optimistic::{OptimisticToggle, Reconciliation};
pub use state::{LoadingFlags, TaskState};
pub use store::{StatsRefresh, TaskStore};
