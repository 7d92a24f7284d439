// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Google Ads gateway API.
//!
//! Provides [`GoogleAdsClient`], the production [`AdsGateway`] implementation.
//! Ads API requests carry the configured developer token plus the session's
//! bearer token; mutation requests additionally carry a per-attempt
//! idempotency key.
//! The client never retries on its own. A mutation that times out or drops
//! mid-flight is reported as a failure, not silently reissued.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use adpilot_config::model::GoogleAdsConfig;
use adpilot_core::types::{
    AccountSummary, CampaignId, CampaignMutation, CustomerId, MutationOutcome, OAuthTokens,
    PlatformSession,
};
use adpilot_core::{AdpilotError, AdsGateway};

use crate::require_config;
use crate::wire::{AccessibleAccountsResponse, ApiErrorResponse, MutateResponse, TokenRequest, TokenResponse};

/// HTTP client for Google Ads gateway communication.
///
/// Holds a connection pool with the request timeout taken from configuration.
/// Construction never touches the network and does not require credentials;
/// each Ads API call resolves the developer token when it runs, so commands
/// that never reach the platform work without one.
#[derive(Clone)]
pub struct GoogleAdsClient {
    client: reqwest::Client,
    config: GoogleAdsConfig,
    base_url: String,
}

impl GoogleAdsClient {
    /// Creates a new Google Ads gateway client from the given configuration.
    pub fn new(config: &GoogleAdsConfig) -> Result<Self, AdpilotError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdpilotError::Platform {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            config: config.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolves the configured developer token into a header value.
    ///
    /// Fails with [`AdpilotError::NotConfigured`] before any request is sent
    /// when the token is absent.
    fn developer_token(&self) -> Result<HeaderValue, AdpilotError> {
        let token = require_config(&self.config.developer_token, "googleads.developer_token")?;
        HeaderValue::from_str(&token).map_err(|e| {
            AdpilotError::Config(format!("invalid developer token header value: {e}"))
        })
    }
}

#[async_trait]
impl AdsGateway for GoogleAdsClient {
    async fn exchange_auth_code(&self, code: &str) -> Result<OAuthTokens, AdpilotError> {
        let request = TokenRequest {
            client_id: require_config(&self.config.client_id, "googleads.client_id")?,
            client_secret: require_config(&self.config.client_secret, "googleads.client_secret")?,
            code: code.to_string(),
            grant_type: "authorization_code".to_string(),
            redirect_uri: self.config.redirect_uri.clone(),
        };

        let url = format!("{}/oauth/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(map_transport_err)?;

        let status = response.status();
        debug!(status = %status, "token exchange response received");
        if !status.is_success() {
            return Err(read_error_envelope(status, response).await);
        }

        let tokens: TokenResponse = parse_body(response).await?;
        Ok(OAuthTokens {
            access_token: SecretString::from(tokens.access_token),
            refresh_token: tokens.refresh_token.map(SecretString::from),
        })
    }

    async fn list_accessible_accounts(
        &self,
        session: &PlatformSession,
    ) -> Result<Vec<AccountSummary>, AdpilotError> {
        let url = format!("{}/accessible-accounts", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("developer-token", self.developer_token()?)
            .bearer_auth(session.access_token.expose_secret())
            .send()
            .await
            .map_err(map_transport_err)?;

        let status = response.status();
        debug!(status = %status, "accessible accounts response received");
        if !status.is_success() {
            return Err(read_error_envelope(status, response).await);
        }

        let listing: AccessibleAccountsResponse = parse_body(response).await?;
        Ok(listing.accounts)
    }

    async fn mutate_campaign(
        &self,
        session: &PlatformSession,
        customer_id: &CustomerId,
        campaign_id: &CampaignId,
        mutation: &CampaignMutation,
        idempotency_key: &str,
    ) -> Result<MutationOutcome, AdpilotError> {
        let url = format!(
            "{}/customers/{customer_id}/campaigns/{campaign_id}:mutate",
            self.base_url
        );
        let response = self
            .client
            .patch(&url)
            .header("developer-token", self.developer_token()?)
            .bearer_auth(session.access_token.expose_secret())
            .header("x-idempotency-key", idempotency_key)
            .json(mutation)
            .send()
            .await
            .map_err(map_transport_err)?;

        let status = response.status();
        debug!(
            status = %status,
            customer_id = %customer_id,
            campaign_id = %campaign_id,
            "mutate response received"
        );
        if !status.is_success() {
            return Err(read_error_envelope(status, response).await);
        }

        let outcome: MutateResponse = parse_body(response).await?;
        if !outcome.success {
            return Err(AdpilotError::Platform {
                message: "platform reported an unsuccessful mutation".to_string(),
                source: None,
            });
        }
        let applied_value = outcome.applied_value.ok_or_else(|| AdpilotError::Platform {
            message: "mutation response is missing appliedValue".to_string(),
            source: None,
        })?;
        Ok(MutationOutcome {
            applied_value,
            previous_value: outcome.previous_value,
        })
    }
}

/// Maps a transport-level reqwest failure (connect, timeout, TLS) into the
/// shared platform error.
fn map_transport_err(e: reqwest::Error) -> AdpilotError {
    AdpilotError::Platform {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Reads a non-2xx response body and extracts the gateway error envelope
/// when one is present.
async fn read_error_envelope(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> AdpilotError {
    let body = response.text().await.unwrap_or_default();
    let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
        format!("Google Ads API error ({status}): {}", api_err.error.message)
    } else {
        format!("API returned {status}: {body}")
    };
    AdpilotError::Platform {
        message,
        source: None,
    }
}

async fn parse_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AdpilotError> {
    let body = response.text().await.map_err(|e| AdpilotError::Platform {
        message: format!("failed to read response body: {e}"),
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| AdpilotError::Platform {
        message: format!("failed to parse API response: {e}"),
        source: Some(Box::new(e)),
    })
}
