// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a parseable backend URL, non-empty paths, and sane timing windows.

use crate::diagnostic::ConfigError;
use crate::model::MotivateConfig;

/// Longest accepted debounce window; anything above loses user toggles on quit.
const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MotivateConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    // An empty URL means "not configured" and is allowed until a remote call is made.
    let url = config.backend.url.trim();
    if !url.is_empty() {
        match url::Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => {}
            Ok(parsed) => fail(format!(
                "backend.url `{url}` must be an http(s) URL with a host, got scheme `{}`",
                parsed.scheme()
            )),
            Err(e) => fail(format!("backend.url `{url}` is not a valid URL: {e}")),
        }
    }

    if config.backend.bucket.trim().is_empty() {
        fail("backend.bucket must not be empty".to_string());
    }

    if config.backend.request_timeout_secs == 0 {
        fail("backend.request_timeout_secs must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.cache.capacity == 0 {
        fail("cache.capacity must be at least 1".to_string());
    }

    if config.cache.max_entry_bytes == 0 {
        fail("cache.max_entry_bytes must be at least 1".to_string());
    }

    if config.preferences.debounce_ms > MAX_DEBOUNCE_MS {
        fail(format!(
            "preferences.debounce_ms must be at most {MAX_DEBOUNCE_MS}, got {}",
            config.preferences.debounce_ms
        ));
    }

    if config.timeline.refresh_interval_secs == 0 {
        fail("timeline.refresh_interval_secs must be at least 1".to_string());
    }

    if config.timeline.acquisition_budget_secs == 0 {
        fail("timeline.acquisition_budget_secs must be at least 1".to_string());
    }

    if config.timeline.reload_poll_ms == 0 {
        fail("timeline.reload_poll_ms must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&MotivateConfig::default()).is_ok());
    }

    #[test]
    fn malformed_backend_url_fails_validation() {
        let mut config = MotivateConfig::default();
        config.backend.url = "not a url".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "backend.url"));
    }

    #[test]
    fn non_http_backend_url_fails_validation() {
        let mut config = MotivateConfig::default();
        config.backend.url = "ftp://files.example.com".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "http(s)"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = MotivateConfig::default();
        config.cache.capacity = 0;
        config.storage.database_path = " ".to_string();
        config.timeline.refresh_interval_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn oversized_debounce_window_fails_validation() {
        let mut config = MotivateConfig::default();
        config.preferences.debounce_ms = 60_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "debounce_ms"));
    }

    #[test]
    fn zero_reload_poll_fails_validation() {
        let mut config = MotivateConfig::default();
        config.timeline.reload_poll_ms = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "reload_poll_ms"));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = MotivateConfig::default();
        config.backend.url = "https://project.supabase.co".to_string();
        config.backend.anon_key = Some(SecretString::from("anon".to_string()));
        config.storage.database_path = "/tmp/motivate-test.db".to_string();
        config.preferences.debounce_ms = 0;
        assert!(validate_config(&config).is_ok());
    }
}
