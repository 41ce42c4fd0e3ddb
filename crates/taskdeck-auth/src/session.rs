//! Authentication session state machine.
//!
//! ```text
//!   Unauthenticated ──login──▶ Authenticating ──ok──▶ Authenticated
//!          ▲                         │                     │
//!          └─────────failure─────────┘                     │
//!          └──── logout / invalid token / failed refresh ──┘
//! ```
//!
//! Every failure path lands in `Unauthenticated`; nothing is retried
//! automatically. Only explicit login failures surface an error message;
//! background checks fail silently.

use std::sync::Arc;

use taskdeck_core::{ApiError, User};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::AuthApi;
use crate::storage::{StoredCredentials, TokenStore};

/// Shown when login fails without a usable server explanation.
pub const LOGIN_FALLBACK_MESSAGE: &str = "Unable to sign in";

/// Shown when login is attempted with a blank username or password.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password are required";

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// No valid session.
    #[default]
    Unauthenticated,
    /// Login request in flight.
    Authenticating,
    /// Token issued or confirmed by the server.
    Authenticated,
}

/// Snapshot of the authentication session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthSession {
    /// Signed-in user, when known.
    pub user: Option<User>,
    /// Current bearer token.
    pub token: Option<String>,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Last login error, for display on the login form.
    pub error: Option<String>,
}

impl AuthSession {
    /// Whether the session is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    /// Whether a login is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == SessionPhase::Authenticating
    }
}

/// Owner of the [`AuthSession`]. The only writer of session state.
pub struct AuthSessionManager {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<AuthSession>,
}

impl AuthSessionManager {
    /// Manager starting in the unauthenticated state.
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(AuthSession::default());
        Self { api, tokens, state }
    }

    /// Current session snapshot.
    pub fn session(&self) -> AuthSession {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<AuthSession> {
        self.state.subscribe()
    }

    /// Whether the session is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Sign in with username and password.
    ///
    /// On success the tokens are persisted and the session becomes
    /// authenticated. On any failure the session is reset with an error
    /// message and `false` is returned.
    #[tracing::instrument(skip_all, fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> bool {
        if username.trim().is_empty() || password.is_empty() {
            self.fail_login(MISSING_CREDENTIALS_MESSAGE.to_string());
            return false;
        }

        self.state.send_modify(|s| {
            s.phase = SessionPhase::Authenticating;
            s.error = None;
        });

        let response = match self.api.login(username, password).await {
            Ok(response) => response,
            Err(err) => {
                warn!(kind = %err.kind(), error = %err, "login rejected");
                self.fail_login(login_failure_message(&err));
                return false;
            }
        };

        let credentials =
            StoredCredentials::new(&response.access, &response.refresh, response.user.clone());
        if let Err(err) = self.tokens.save(&credentials) {
            warn!(error = %err, "failed to persist credentials");
            self.fail_login(LOGIN_FALLBACK_MESSAGE.to_string());
            return false;
        }

        let _ = self.state.send_replace(AuthSession {
            user: response.user,
            token: Some(response.access),
            phase: SessionPhase::Authenticated,
            error: None,
        });
        info!("signed in");
        true
    }

    /// Sign out. Clears stored credentials and resets the session.
    ///
    /// Never touches the network and is safe to call repeatedly.
    pub fn logout(&self) {
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "failed to clear stored credentials");
        }
        let _ = self.state.send_if_modified(|s| {
            let reset = AuthSession::default();
            if *s == reset {
                return false;
            }
            *s = reset;
            true
        });
        debug!("signed out");
    }

    /// Validate the stored token with the server.
    ///
    /// Without a stored token no request is made. A stored token is kept only
    /// if the server confirms it; any failure, including a network error,
    /// clears it. Returns whether the session is authenticated afterwards.
    #[tracing::instrument(skip_all)]
    pub async fn check_auth_status(&self) -> bool {
        let Some(stored) = self.tokens.load() else {
            debug!("no stored token");
            self.logout();
            return false;
        };

        match self.api.verify_token(&stored.access_token).await {
            Ok(()) => {
                self.state.send_modify(|s| {
                    s.token = Some(stored.access_token);
                    if s.user.is_none() {
                        s.user = stored.user;
                    }
                    s.phase = SessionPhase::Authenticated;
                    s.error = None;
                });
                debug!("stored token confirmed");
                true
            }
            Err(err) => {
                info!(kind = %err.kind(), error = %err, "stored token rejected, clearing session");
                self.logout();
                false
            }
        }
    }

    /// Trade the stored refresh token for a new access token.
    ///
    /// Fails closed: without a refresh token, or when the server refuses, the
    /// session is logged out. Returns whether the session survived.
    #[tracing::instrument(skip_all)]
    pub async fn refresh_session(&self) -> bool {
        let Some(stored) = self.tokens.load().filter(|c| !c.refresh_token.is_empty()) else {
            debug!("no refresh token stored");
            self.logout();
            return false;
        };

        let response = match self.api.refresh(&stored.refresh_token).await {
            Ok(response) => response,
            Err(err) => {
                info!(kind = %err.kind(), error = %err, "token refresh refused, clearing session");
                self.logout();
                return false;
            }
        };

        let credentials = StoredCredentials {
            access_token: response.access,
            refresh_token: response.refresh.unwrap_or(stored.refresh_token),
            ..stored
        };
        if let Err(err) = self.tokens.save(&credentials) {
            warn!(error = %err, "failed to persist refreshed credentials");
            self.logout();
            return false;
        }

        self.state.send_modify(|s| {
            s.token = Some(credentials.access_token.clone());
            if s.user.is_none() {
                s.user.clone_from(&credentials.user);
            }
            s.phase = SessionPhase::Authenticated;
        });
        info!("access token refreshed");
        true
    }

    /// Replace the session's user identity.
    ///
    /// Also updates the stored record so a later session check restores it.
    pub fn set_user(&self, user: User) {
        if let Some(mut stored) = self.tokens.load() {
            stored.user = Some(user.clone());
            if let Err(err) = self.tokens.save(&stored) {
                warn!(error = %err, "failed to persist user identity");
            }
        }
        self.state.send_modify(|s| s.user = Some(user));
    }

    /// Clear the last login error.
    pub fn clear_error(&self) {
        let _ = self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn fail_login(&self, message: String) {
        let _ = self.state.send_replace(AuthSession {
            error: Some(message),
            ..AuthSession::default()
        });
    }
}

/// Message shown for a failed login: whatever explanation the server gave,
/// or a generic one when it gave none.
fn login_failure_message(err: &ApiError) -> String {
    err.server_message()
        .unwrap_or(LOGIN_FALLBACK_MESSAGE)
        .to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
