use std::path::Path;
use std::time::Duration;

use phpv_core::FilterBucket;
use phpv_http::DEFAULT_API_BASE;
use phpv_platform::{AppPaths, AppPathsError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Paths(#[from] AppPathsError),
    #[error("Failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_success_hold")]
    pub job_success_hold_secs: u64,

    #[serde(default = "default_failure_hold")]
    pub job_failure_hold_secs: u64,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Also refresh the installed list when an install job fails.
    #[serde(default)]
    pub refresh_on_job_failure: bool,

    #[serde(default)]
    pub default_filter: FilterBucket,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_success_hold() -> u64 {
    3
}

fn default_failure_hold() -> u64 {
    6
}

fn default_http_timeout() -> u64 {
    10
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            poll_interval_ms: default_poll_interval(),
            job_success_hold_secs: default_success_hold(),
            job_failure_hold_secs: default_failure_hold(),
            http_timeout_secs: default_http_timeout(),
            refresh_on_job_failure: false,
            default_filter: FilterBucket::All,
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl AppSettings {
    /// Loads the settings file from the platform config directory, falling
    /// back to defaults when it is missing or unreadable.
    #[must_use]
    pub fn load() -> Self {
        let Ok(paths) = AppPaths::new() else {
            return Self::default();
        };
        Self::load_from(&paths.settings_file())
    }

    #[must_use]
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|error| {
                log::warn!("Ignoring corrupt settings file {}: {error}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// # Errors
    /// Returns an error if the config directory cannot be determined or the
    /// file cannot be written.
    pub fn save(&self) -> Result<(), SettingsError> {
        let paths = AppPaths::new()?;
        paths.ensure_dirs()?;
        self.save_to(&paths.settings_file())
    }

    /// # Errors
    /// Returns an error if the file or its parent directory cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    #[must_use]
    pub fn success_hold(&self) -> Duration {
        Duration::from_secs(self.job_success_hold_secs)
    }

    #[must_use]
    pub fn failure_hold(&self) -> Duration {
        Duration::from_secs(self.job_failure_hold_secs)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::{AppSettings, FilterBucket};

    #[test]
    fn defaults_match_backend_timing() {
        let settings = AppSettings::default();

        assert_eq!(settings.api_base_url, "http://127.0.0.1:8085/api");
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
        assert_eq!(settings.success_hold(), Duration::from_secs(3));
        assert_eq!(settings.failure_hold(), Duration::from_secs(6));
        assert_eq!(settings.http_timeout(), Duration::from_secs(10));
        assert!(!settings.refresh_on_job_failure);
        assert_eq!(settings.default_filter, FilterBucket::All);
        assert_eq!(settings.max_log_size_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn partial_json_fills_missing_fields_with_defaults() {
        let settings: AppSettings = serde_json::from_value(json!({
            "poll_interval_ms": 250,
            "default_filter": "recommended"
        }))
        .expect("partial settings should deserialize");

        assert_eq!(settings.poll_interval(), Duration::from_millis(250));
        assert_eq!(settings.default_filter, FilterBucket::Recommended);
        assert_eq!(settings.job_failure_hold_secs, 6);
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let settings = AppSettings {
            poll_interval_ms: 0,
            ..AppSettings::default()
        };

        assert_eq!(settings.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let path = temp_dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            refresh_on_job_failure: true,
            debug_logging: true,
            ..AppSettings::default()
        };

        settings.save_to(&path).expect("settings should be saved");

        assert_eq!(AppSettings::load_from(&path), settings);
    }

    #[test]
    fn corrupt_or_missing_file_falls_back_to_defaults() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let missing = temp_dir.path().join("missing.json");
        let corrupt = temp_dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "{not json").expect("corrupt file should be written");

        assert_eq!(AppSettings::load_from(&missing), AppSettings::default());
        assert_eq!(AppSettings::load_from(&corrupt), AppSettings::default());
    }
}
