// SPDX-FileCopyrightText: 2026 Motivate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./motivate.toml` > `~/.config/motivate/motivate.toml` >
//! `/etc/motivate/motivate.toml` with environment variable overrides via `MOTIVATE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MotivateConfig;

/// System-wide config file location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/motivate/motivate.toml";

/// Local (working directory) config file name.
pub const LOCAL_CONFIG_FILE: &str = "motivate.toml";

/// Path of the per-user config file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("motivate").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/motivate/motivate.toml` (system-wide)
/// 3. `~/.config/motivate/motivate.toml` (user XDG config)
/// 4. `./motivate.toml` (local directory)
/// 5. `MOTIVATE_*` environment variables
pub fn load_config() -> Result<MotivateConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<MotivateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MotivateConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MotivateConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MotivateConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MotivateConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `MOTIVATE_BACKEND_ANON_KEY` must map to `backend.anon_key`,
/// not `backend.anon.key`.
fn env_provider() -> Env {
    Env::prefixed("MOTIVATE_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("app_", "app.", 1)
            .replacen("backend_", "backend.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("cache_", "cache.", 1)
            .replacen("preferences_", "preferences.", 1)
            .replacen("timeline_", "timeline.", 1);
        mapped.into()
    })
}
