// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Adpilot change engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Adpilot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AdpilotConfig {
    /// Change engine behavior settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Google Ads API connection settings.
    #[serde(default)]
    pub googleads: GoogleAdsConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Change engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Minimum confidence (percent) a recommendation needs to auto-apply.
    /// Changes below this are rejected before any platform call.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: u8,

    /// When true, reverting a change also issues a compensating mutation
    /// restoring the recorded previous value. When false, revert only marks
    /// the ledger row.
    #[serde(default = "default_revert_compensates")]
    pub revert_compensates: bool,

    /// Default number of ledger rows returned by history listings.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            revert_compensates: default_revert_compensates(),
            history_limit: default_history_limit(),
            log_level: default_log_level(),
        }
    }
}

fn default_confidence_threshold() -> u8 {
    100
}

fn default_revert_compensates() -> bool {
    false
}

fn default_history_limit() -> u32 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Google Ads API connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleAdsConfig {
    /// Base URL of the Ads API gateway.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OAuth client id. `None` disables the connect flow.
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret. Prefer supplying this via the
    /// `ADPILOT_GOOGLEADS_CLIENT_SECRET` environment variable.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Redirect URI registered with the OAuth client.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// OAuth scope requested during authorization.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// Google Ads developer token. Required for Ads API calls.
    #[serde(default)]
    pub developer_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleAdsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: None,
            client_secret: None,
            redirect_uri: default_redirect_uri(),
            scope: default_scope(),
            developer_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://ads-gateway.adpilot.app/v1".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:8085/oauth/callback".to_string()
}

fn default_scope() -> String {
    "https://www.googleapis.com/auth/adwords".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("adpilot").join("adpilot.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("adpilot.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
