// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request/response wire types for the Google Ads gateway API.

use adpilot_core::types::AccountSummary;
use serde::{Deserialize, Serialize};

// --- OAuth token exchange ---

/// Body of `POST /oauth/token`. Field names follow the OAuth 2.0 wire
/// convention, so no renaming is needed.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    /// OAuth client identifier.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// The one-time authorization code from the redirect.
    pub code: String,
    /// Always "authorization_code" for this flow.
    pub grant_type: String,
    /// Must match the redirect URI the code was issued for.
    pub redirect_uri: String,
}

/// Successful token exchange response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token. Only present when the consent prompt ran
    /// with `access_type=offline`.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Token type, normally "Bearer".
    #[serde(default)]
    pub token_type: Option<String>,
}

// --- Account listing ---

/// Response of `GET /accessible-accounts`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessibleAccountsResponse {
    /// Accounts the authenticated user can access.
    pub accounts: Vec<AccountSummary>,
}

// --- Campaign mutation ---

/// Response of `PATCH /customers/{id}/campaigns/{campaignId}:mutate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutateResponse {
    /// Whether the platform applied the mutation.
    pub success: bool,
    /// The value now in effect, rendered as a string.
    #[serde(default)]
    pub applied_value: Option<String>,
    /// The value that was replaced, when the platform knows it.
    #[serde(default)]
    pub previous_value: Option<String>,
}

// --- Error envelope ---

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// The inner error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable error description.
    pub message: String,
    /// Optional machine-readable status code (e.g. "NOT_FOUND").
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_request_serializes_oauth_field_names() {
        let request = TokenRequest {
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            code: "4/auth-code".to_string(),
            grant_type: "authorization_code".to_string(),
            redirect_uri: "http://localhost:8085/oauth/callback".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["grant_type"], "authorization_code");
        assert_eq!(value["redirect_uri"], "http://localhost:8085/oauth/callback");
    }

    #[test]
    fn token_response_tolerates_missing_optional_fields() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token": "ya29.abc"}"#).unwrap();
        assert_eq!(parsed.access_token, "ya29.abc");
        assert_eq!(parsed.refresh_token, None);
        assert_eq!(parsed.expires_in, None);
    }

    #[test]
    fn accessible_accounts_parse_camel_case_entries() {
        let body = r#"{
            "accounts": [{
                "customerId": "999-000-1111",
                "descriptiveName": "Acme Corporation",
                "currencyCode": "USD",
                "timeZone": "America/New_York",
                "isManager": false,
                "canManageClients": false,
                "status": "enabled"
            }]
        }"#;
        let parsed: AccessibleAccountsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.accounts.len(), 1);
        assert_eq!(parsed.accounts[0].customer_id.0, "999-000-1111");
    }

    #[test]
    fn mutate_response_previous_value_is_optional() {
        let parsed: MutateResponse = serde_json::from_str(
            r#"{"success": true, "appliedValue": "75000000"}"#,
        )
        .unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.applied_value.as_deref(), Some("75000000"));
        assert_eq!(parsed.previous_value, None);
    }

    #[test]
    fn error_envelope_parses_with_and_without_status() {
        let parsed: ApiErrorResponse =
            serde_json::from_str(r#"{"error": {"message": "Campaign not found"}}"#).unwrap();
        assert_eq!(parsed.error.message, "Campaign not found");
        assert_eq!(parsed.error.status, None);

        let parsed: ApiErrorResponse = serde_json::from_str(
            r#"{"error": {"message": "Campaign not found", "status": "NOT_FOUND"}}"#,
        )
        .unwrap();
        assert_eq!(parsed.error.status.as_deref(), Some("NOT_FOUND"));
    }
}
