// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Ads gateway adapter for the Adpilot change engine.
//!
//! This crate implements [`AdsGateway`](adpilot_core::traits::AdsGateway) over
//! HTTP: OAuth code exchange, accessible-account listing, and campaign
//! mutations. [`authorize_url`] builds the browser URL that starts the
//! OAuth flow.

pub mod auth;
pub mod client;
pub mod wire;

pub use auth::{authorize_url, AuthorizeUrl};
pub use client::GoogleAdsClient;

use adpilot_core::AdpilotError;

/// Unwraps an optional config value, naming the missing key in the error.
pub(crate) fn require_config(value: &Option<String>, key: &str) -> Result<String, AdpilotError> {
    if let Some(v) = value
        && !v.is_empty()
    {
        return Ok(v.clone());
    }

    Err(AdpilotError::NotConfigured(format!(
        "{key} is not set. Add it to adpilot.toml or the matching ADPILOT_* environment variable."
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_config_returns_the_value_when_set() {
        let value = require_config(&Some("tok-123".into()), "googleads.developer_token");
        assert_eq!(value.unwrap(), "tok-123");
    }

    #[test]
    fn require_config_rejects_none() {
        let err = require_config(&None, "googleads.client_id").unwrap_err();
        assert!(matches!(err, AdpilotError::NotConfigured(_)));
        assert!(err.to_string().contains("googleads.client_id"));
    }

    #[test]
    fn require_config_rejects_empty_strings() {
        let err = require_config(&Some(String::new()), "googleads.client_secret").unwrap_err();
        assert!(err.to_string().contains("googleads.client_secret"));
    }
}
