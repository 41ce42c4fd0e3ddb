//! # taskdeck-auth
//!
//! Authentication session lifecycle for the Taskdeck client.
//!
//! - [`storage`]: durable credential storage ([`TokenStore`]), file-backed at
//!   `<dataDir>/auth.json` with secure permissions, or in memory
//! - [`api`]: the remote auth contract ([`AuthApi`]) consumed by the manager
//! - [`session`]: [`AuthSessionManager`], owner of the [`AuthSession`] state
//!
//! The authenticated flag is never persisted. On startup a stored token must
//! be re-validated with [`AuthSessionManager::check_auth_status`]; anything
//! short of a confirmed token leaves the session unauthenticated.

#![deny(unsafe_code)]

pub mod api;
pub mod errors;
pub mod session;
pub mod storage;

pub use api::{AuthApi, LoginResponse, RefreshResponse};
pub use errors::AuthError;
pub use session::{AuthSession, AuthSessionManager, SessionPhase};
pub use storage::{FileTokenStore, MemoryTokenStore, StoredCredentials, TokenStore, auth_file_path};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
