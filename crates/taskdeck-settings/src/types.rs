//! Settings type definitions.
//!
//! All types use camelCase JSON keys and `#[serde(default)]`, so a partial
//! settings file only needs the keys it changes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings type.
///
/// ```json
/// {
///   "api": { "baseUrl": "https://tasks.example.com/api", "timeoutMs": 5000 },
///   "logging": { "level": "debug", "format": "json" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskdeckSettings {
    /// Remote service connection.
    pub api: ApiSettings,
    /// Durable client storage.
    pub storage: StorageSettings,
    /// Log output.
    pub logging: LoggingSettings,
}

/// Remote REST service connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// Base URL including the `/api` prefix, without trailing slash.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            timeout_ms: 10_000,
            user_agent: concat!("taskdeck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiSettings {
    /// Join a path onto the base URL.
    ///
    /// `path` must start with `/`. A trailing slash on the base is ignored.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Where credentials are persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// Directory holding `auth.json`.
    pub data_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: crate::loader::home_dir().join(".taskdeck"),
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive when `RUST_LOG` is not set.
    pub level: String,
    /// Output format of the stderr subscriber.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line events.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let api = ApiSettings {
            base_url: "http://host/api/".to_string(),
            ..ApiSettings::default()
        };
        assert_eq!(api.url("/tasks/"), "http://host/api/tasks/");
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(TaskdeckSettings::default()).unwrap();
        assert!(json["api"]["baseUrl"].is_string());
        assert!(json["api"]["timeoutMs"].is_number());
        assert!(json["storage"]["dataDir"].is_string());
    }

    #[test]
    fn log_format_defaults_to_compact() {
        let settings: TaskdeckSettings =
            serde_json::from_str(r#"{"logging": {"level": "info"}}"#).unwrap();
        assert_eq!(settings.logging.format, LogFormat::Compact);

        let settings: TaskdeckSettings =
            serde_json::from_str(r#"{"logging": {"format": "json"}}"#).unwrap();
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.level, "warn");
    }
}
