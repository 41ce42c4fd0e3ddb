//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TaskdeckSettings::default()`]
//! 2. If `~/.taskdeck/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::TaskdeckSettings;

/// Overrides the API base URL.
pub const ENV_API_URL: &str = "TASKDECK_API_URL";
/// Overrides the request timeout (milliseconds, 100..=600000).
pub const ENV_TIMEOUT_MS: &str = "TASKDECK_TIMEOUT_MS";
/// Overrides the credentials directory.
pub const ENV_DATA_DIR: &str = "TASKDECK_DATA_DIR";
/// Overrides the default log level.
pub const ENV_LOG_LEVEL: &str = "TASKDECK_LOG_LEVEL";

pub(crate) fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Resolve the path to the settings file (`~/.taskdeck/settings.json`).
pub fn settings_path() -> PathBuf {
    home_dir().join(".taskdeck").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TaskdeckSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<TaskdeckSettings> {
    let mut settings = load_file_layer(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

fn load_file_layer(path: &Path) -> Result<TaskdeckSettings> {
    let defaults = serde_json::to_value(TaskdeckSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TASKDECK_*` environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning (the file/default value stays).
pub fn apply_env_overrides(settings: &mut TaskdeckSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides from an arbitrary variable source.
pub(crate) fn apply_overrides(
    settings: &mut TaskdeckSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let read_string = |name: &str| lookup(name).filter(|v| !v.is_empty());

    if let Some(v) = read_string(ENV_API_URL) {
        settings.api.base_url = v;
    }
    if let Some(v) = read_string(ENV_TIMEOUT_MS) {
        match parse_u64_range(&v, 100, 600_000) {
            Some(ms) => settings.api.timeout_ms = ms,
            None => tracing::warn!(key = ENV_TIMEOUT_MS, value = %v, "invalid u64 env var, ignoring"),
        }
    }
    if let Some(v) = read_string(ENV_DATA_DIR) {
        settings.storage.data_dir = PathBuf::from(v);
    }
    if let Some(v) = read_string(ENV_LOG_LEVEL) {
        settings.logging.level = v;
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
