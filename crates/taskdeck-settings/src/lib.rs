//! # taskdeck-settings
//!
//! Configuration for the Taskdeck client, loaded from three layers (in
//! priority order):
//! 1. **Compiled defaults**: [`TaskdeckSettings::default()`]
//! 2. **User file**: `~/.taskdeck/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TASKDECK_*` overrides (highest priority)
//!
//! There is no global instance: the loaded value is handed to whoever
//! builds the client.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path,
};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = TaskdeckSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = TaskdeckSettings::default();
        assert_eq!(settings.api.base_url, "http://localhost:8000/api");
        assert_eq!(settings.api.timeout_ms, 10_000);
        assert!(settings.api.user_agent.starts_with("taskdeck/"));
        assert_eq!(settings.logging.level, "warn");
        assert!(settings.storage.data_dir.ends_with(".taskdeck"));
    }
}
