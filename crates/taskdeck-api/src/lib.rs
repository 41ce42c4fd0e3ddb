//! # taskdeck-api
//!
//! reqwest clients for the Taskdeck REST service.
//!
//! - [`tasks`]: the [`TaskApi`] contract and its HTTP implementation
//! - [`auth`]: [`HttpAuthApi`], the HTTP side of [`taskdeck_auth::AuthApi`]
//! - [`events`]: [`SessionEvent`] broadcast when the server revokes a session
//! - [`transport`]: shared client construction and response classification
//!
//! Every failure leaves this crate as a [`taskdeck_core::ApiError`].

#![deny(unsafe_code)]

pub mod auth;
pub mod events;
pub mod tasks;
pub mod transport;

pub use auth::HttpAuthApi;
pub use events::SessionEvent;
pub use tasks::{HttpTaskApi, TaskApi};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
