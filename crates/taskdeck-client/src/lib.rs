//! # taskdeck-client
//!
//! Application context for the Taskdeck client.
//!
//! [`Taskdeck`] builds the token store, HTTP clients, session manager and
//! task store from [`TaskdeckSettings`] and ties their lifecycles together:
//! the task store is only populated once the session is confirmed, and a
//! session revoked by the server signs the user out everywhere.

#![deny(unsafe_code)]

use std::sync::Arc;

use anyhow::Context;
use taskdeck_api::{HttpAuthApi, HttpTaskApi, SessionEvent};
use taskdeck_auth::{AuthSessionManager, FileTokenStore, TokenStore};
use taskdeck_settings::{LogFormat, LoggingSettings, TaskdeckSettings};
use taskdeck_store::TaskStore;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Everything a Taskdeck front end needs, wired together.
pub struct Taskdeck {
    settings: TaskdeckSettings,
    tokens: Arc<dyn TokenStore>,
    auth: Arc<AuthSessionManager>,
    store: TaskStore,
    listener: JoinHandle<()>,
}

impl Taskdeck {
    /// Build the context from explicit settings.
    ///
    /// Must be called inside a Tokio runtime; the session listener is
    /// spawned immediately.
    pub fn from_settings(settings: TaskdeckSettings) -> Self {
        let tokens: Arc<dyn TokenStore> =
            Arc::new(FileTokenStore::in_dir(&settings.storage.data_dir));
        let task_api = Arc::new(HttpTaskApi::new(&settings.api, tokens.clone()));
        let auth_api = Arc::new(HttpAuthApi::new(&settings.api));

        let auth = Arc::new(AuthSessionManager::new(auth_api, tokens.clone()));
        let events = task_api.subscribe();
        let store = TaskStore::new(task_api);
        let listener = tokio::spawn(watch_session(events, auth.clone(), store.clone()));

        debug!(base_url = %settings.api.base_url, "context ready");
        Self {
            settings,
            tokens,
            auth,
            store,
            listener,
        }
    }

    /// Load settings from disk and the environment, install the log
    /// subscriber, and build the context.
    pub fn load() -> anyhow::Result<Self> {
        let settings = taskdeck_settings::load_settings().context("failed to load settings")?;
        init_logging(&settings.logging);
        Ok(Self::from_settings(settings))
    }

    /// Effective settings.
    pub fn settings(&self) -> &TaskdeckSettings {
        &self.settings
    }

    /// Session manager.
    pub fn auth(&self) -> &AuthSessionManager {
        &self.auth
    }

    /// Task store.
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Durable credential storage.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Restore the previous session, loading the dashboard if it is still
    /// valid. Returns whether the user is signed in.
    pub async fn start(&self) -> bool {
        if !self.auth.check_auth_status().await {
            info!("no valid session, sign-in required");
            return false;
        }
        self.load_dashboard().await;
        true
    }

    /// Sign in and load the dashboard.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        if !self.auth.login(username, password).await {
            return false;
        }
        self.load_dashboard().await;
        true
    }

    /// Sign out and drop all task state.
    pub fn sign_out(&self) {
        self.auth.logout();
        self.store.reset();
        info!("signed out");
    }

    async fn load_dashboard(&self) {
        tokio::join!(
            self.store.fetch_tasks(),
            self.store.fetch_statistics(),
            self.store.fetch_quote(),
        );
    }
}

impl Drop for Taskdeck {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

fn init_logging(logging: &LoggingSettings) {
    match logging.format {
        LogFormat::Compact => taskdeck_logging::init_subscriber(&logging.level),
        LogFormat::Json => taskdeck_logging::init_json_subscriber(&logging.level),
    }
}

/// Sign out whenever the server revokes the session.
#[tracing::instrument(skip_all, name = "session_listener")]
async fn watch_session(
    mut events: broadcast::Receiver<SessionEvent>,
    auth: Arc<AuthSessionManager>,
    store: TaskStore,
) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Unauthorized) => {
                warn!("session revoked by server, signing out");
                auth.logout();
                store.reset();
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(lagged = n, "session listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("session event channel closed");
                break;
            }
        }
    }
}
