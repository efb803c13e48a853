// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Motivate image pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Top-level Motivate configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MotivateConfig {
    /// Process-level settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Image backend endpoint and credentials.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Shared SQLite store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Offline image cache policy.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Category preference persistence.
    #[serde(default)]
    pub preferences: PreferencesConfig,

    /// Background surface refresh policy.
    #[serde(default)]
    pub timeline: TimelineConfig,
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Image backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the backend project, e.g. `https://xyz.supabase.co`.
    /// Empty means "not configured"; remote commands refuse to run.
    #[serde(default)]
    pub url: String,

    /// Public anonymous API key. `None` requires the `MOTIVATE_BACKEND_ANON_KEY`
    /// environment variable. Redacted in `Debug` and never serialized back out.
    #[serde(default, skip_serializing)]
    pub anon_key: Option<SecretString>,

    /// Name of the public storage bucket holding the images.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Timeout applied to every single backend request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: None,
            bucket: default_bucket(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bucket() -> String {
    "motivational-images".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

/// Shared SQLite store configuration.
///
/// The interactive app and the background surface host open the same file.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the shared SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// How long a connection waits on another process's lock before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("motivate").join("motivate.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("motivate.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

/// Offline image cache policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of cached images; the least recently stored are evicted.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Images larger than this are never cached.
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            max_entry_bytes: default_max_entry_bytes(),
        }
    }
}

fn default_cache_capacity() -> usize {
    24
}

fn default_max_entry_bytes() -> usize {
    10 * 1024 * 1024
}

/// Category preference persistence.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesConfig {
    /// Quiet window after the last toggle before the selection is written.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

/// Background surface refresh policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineConfig {
    /// Delay between a timeline entry and the next refresh.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Upper bound on one acquire-then-fallback sequence inside the host budget.
    #[serde(default = "default_acquisition_budget_secs")]
    pub acquisition_budget_secs: u64,

    /// How often `widget` checks the shared store for a selection saved by
    /// another process.
    #[serde(default = "default_reload_poll_ms")]
    pub reload_poll_ms: u64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            acquisition_budget_secs: default_acquisition_budget_secs(),
            reload_poll_ms: default_reload_poll_ms(),
        }
    }
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_reload_poll_ms() -> u64 {
    1_000
}

fn default_acquisition_budget_secs() -> u64 {
    25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = MotivateConfig::default();
        assert_eq!(config.backend.bucket, "motivational-images");
        assert_eq!(config.preferences.debounce_ms, 500);
        assert_eq!(config.timeline.refresh_interval_secs, 60);
        assert_eq!(config.cache.capacity, 24);
        assert!(config.backend.url.is_empty());
        assert!(config.backend.anon_key.is_none());
        assert!(config.storage.database_path.ends_with("motivate.db"));
    }

    #[test]
    fn partial_sections_fill_in_defaults() {
        let toml_str = r#"
[backend]
url = "https://example.supabase.co"

[timeline]
refresh_interval_secs = 300
"#;
        let config: MotivateConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.url, "https://example.supabase.co");
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert_eq!(config.timeline.refresh_interval_secs, 300);
        assert_eq!(config.timeline.acquisition_budget_secs, 25);
        assert_eq!(config.timeline.reload_poll_ms, 1_000);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let toml_str = r#"
[cache]
capacty = 3
"#;
        assert!(toml::from_str::<MotivateConfig>(toml_str).is_err());
    }
}
