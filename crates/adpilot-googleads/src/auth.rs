// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth 2.0 authorization URL construction.

use rand::rngs::OsRng;
use rand::RngCore;
use url::Url;

use adpilot_config::model::GoogleAdsConfig;
use adpilot_core::AdpilotError;

use crate::require_config;

/// Google's OAuth 2.0 authorization endpoint.
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// An authorization URL plus the CSRF state token embedded in it.
///
/// The caller keeps `state` and compares it against the value echoed back
/// on the redirect before exchanging the code.
#[derive(Debug, Clone)]
pub struct AuthorizeUrl {
    pub url: Url,
    pub state: String,
}

/// Builds the authorization URL the user opens in a browser.
///
/// `access_type=offline` and `prompt=consent` force Google to issue a
/// refresh token alongside the access token.
pub fn authorize_url(config: &GoogleAdsConfig) -> Result<AuthorizeUrl, AdpilotError> {
    let client_id = require_config(&config.client_id, "googleads.client_id")?;
    let state = csrf_state();

    let mut url = Url::parse(AUTH_ENDPOINT).map_err(|e| {
        AdpilotError::Internal(format!("authorization endpoint failed to parse: {e}"))
    })?;
    url.query_pairs_mut()
        .append_pair("client_id", &client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", &config.scope)
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("state", &state);

    Ok(AuthorizeUrl { url, state })
}

/// 128 bits of OS randomness, hex encoded.
fn csrf_state() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
