//! Remote authentication contract.
//!
//! The session manager only needs three calls from the service: exchange
//! credentials for tokens, probe whether a token is still valid, and trade
//! a refresh token for a new access token. The reqwest implementation lives
//! in `taskdeck-api`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskdeck_core::{ApiError, User};

/// Successful login payload (`POST /token/`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
    /// User identity, when the server includes it.
    #[serde(default)]
    pub user: Option<User>,
}

/// Successful refresh payload (`POST /token/refresh/`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// New access token.
    pub access: String,
    /// Rotated refresh token, when the server rotates them.
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Authentication endpoints consumed by [`crate::AuthSessionManager`].
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange username and password for tokens.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// Check that an access token is still accepted.
    async fn verify_token(&self, token: &str) -> Result<(), ApiError>;

    /// Obtain a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError>;
}
