//! Durable credential storage.
//!
//! The access and refresh tokens (plus the user identity returned at login)
//! survive restarts in `<dataDir>/auth.json`, written with 0o600
//! permissions. The authenticated flag is deliberately not stored.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use taskdeck_core::User;

use crate::errors::AuthError;

/// Default auth file name.
const AUTH_FILE_NAME: &str = "auth.json";

/// Current on-disk format version.
const STORAGE_VERSION: u32 = 1;

/// Get the auth file path under the given data directory.
pub fn auth_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(AUTH_FILE_NAME)
}

/// Persisted credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    /// Format version, currently 1.
    pub version: u32,
    /// Bearer token sent with every request.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// Identity returned at login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// RFC 3339 time of the last write.
    #[serde(default)]
    pub last_updated: String,
}

impl StoredCredentials {
    /// New credentials record.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        user: Option<User>,
    ) -> Self {
        Self {
            version: STORAGE_VERSION,
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            user,
            last_updated: String::new(),
        }
    }
}

/// Durable client-side storage for credentials.
pub trait TokenStore: Send + Sync {
    /// Stored credentials, or `None` when absent or unreadable.
    fn load(&self) -> Option<StoredCredentials>;

    /// Persist credentials, replacing any previous record.
    fn save(&self, credentials: &StoredCredentials) -> Result<(), AuthError>;

    /// Remove stored credentials. Succeeds when nothing is stored.
    fn clear(&self) -> Result<(), AuthError>;

    /// Current access token, if any.
    fn access_token(&self) -> Option<String> {
        self.load().map(|c| c.access_token)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File-backed store
// ─────────────────────────────────────────────────────────────────────────────

/// Load credentials from file.
///
/// Returns `None` if the file doesn't exist or is invalid.
pub fn load_credentials(path: &Path) -> Option<StoredCredentials> {
    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("failed to read auth file: {e}");
            return None;
        }
    };

    match serde_json::from_str::<StoredCredentials>(&data) {
        Ok(creds) if creds.version == STORAGE_VERSION => Some(creds),
        Ok(creds) => {
            tracing::warn!("unsupported auth storage version: {}", creds.version);
            None
        }
        Err(e) => {
            tracing::warn!("failed to parse auth file: {e}");
            None
        }
    }
}

/// Save credentials to file.
///
/// Creates parent directories if needed. Sets file permissions to 0o600.
pub fn save_credentials(path: &Path, credentials: &StoredCredentials) -> Result<(), AuthError> {
    let mut record = credentials.clone();
    record.version = STORAGE_VERSION;
    record.last_updated = chrono::Utc::now().to_rfc3339();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(path, &json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        let _ = std::fs::set_permissions(path, perms);
    }

    Ok(())
}

/// Delete the auth file.
pub fn clear_credentials(path: &Path) -> Result<(), AuthError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AuthError::Io(e)),
    }
}

/// [`TokenStore`] backed by a JSON file.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store at an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/auth.json`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(auth_file_path(data_dir))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<StoredCredentials> {
        load_credentials(&self.path)
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), AuthError> {
        save_credentials(&self.path, credentials)
    }

    fn clear(&self) -> Result<(), AuthError> {
        clear_credentials(&self.path)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// [`TokenStore`] that keeps credentials in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<StoredCredentials>>,
}

impl MemoryTokenStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with credentials.
    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<StoredCredentials> {
        self.slot.lock().clone()
    }

    fn save(&self, credentials: &StoredCredentials) -> Result<(), AuthError> {
        *self.slot.lock() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.slot.lock() = None;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
