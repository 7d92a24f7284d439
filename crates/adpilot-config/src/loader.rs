// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./adpilot.toml` > `~/.config/adpilot/adpilot.toml` > `/etc/adpilot/adpilot.toml`
//! with environment variable overrides via `ADPILOT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AdpilotConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/adpilot/adpilot.toml` (system-wide)
/// 3. `~/.config/adpilot/adpilot.toml` (user XDG config)
/// 4. `./adpilot.toml` (local directory)
/// 5. `ADPILOT_*` environment variables
pub fn load_config() -> Result<AdpilotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdpilotConfig::default()))
        .merge(Toml::file("/etc/adpilot/adpilot.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("adpilot/adpilot.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("adpilot.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used by tests and by callers that already hold the config text.
pub fn load_config_from_str(toml_content: &str) -> Result<AdpilotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdpilotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AdpilotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AdpilotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. `ADPILOT_GOOGLEADS_DEVELOPER_TOKEN` must
/// map to `googleads.developer_token`, not `googleads.developer.token`.
fn env_provider() -> Env {
    Env::prefixed("ADPILOT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ADPILOT_ENGINE_CONFIDENCE_THRESHOLD -> "engine_confidence_threshold"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("engine_", "engine.", 1)
            .replacen("googleads_", "googleads.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
