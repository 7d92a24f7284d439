// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway trait for the Google Ads platform integration.

use async_trait::async_trait;

use crate::error::AdpilotError;
use crate::types::{
    AccountSummary, CampaignId, CampaignMutation, CustomerId, MutationOutcome, OAuthTokens,
    PlatformSession,
};

/// Outbound port to the Google Ads platform.
///
/// Every network side effect of the engine goes through this trait. The
/// engine never constructs HTTP requests itself, which keeps the executor
/// testable against an in-memory mock.
#[async_trait]
pub trait AdsGateway: Send + Sync {
    /// Exchanges an OAuth authorization code for access credentials.
    async fn exchange_auth_code(&self, code: &str) -> Result<OAuthTokens, AdpilotError>;

    /// Lists the customer accounts the authenticated user can access.
    async fn list_accessible_accounts(
        &self,
        session: &PlatformSession,
    ) -> Result<Vec<AccountSummary>, AdpilotError>;

    /// Applies a single campaign mutation under the given customer account.
    ///
    /// `idempotency_key` is minted fresh for each attempt and forwarded to
    /// the platform so a retried request can be deduplicated server-side.
    /// Implementations must not retry internally; an ambiguous outcome
    /// (timeout, connection reset) surfaces as [`AdpilotError::Platform`].
    async fn mutate_campaign(
        &self,
        session: &PlatformSession,
        customer_id: &CustomerId,
        campaign_id: &CampaignId,
        mutation: &CampaignMutation,
        idempotency_key: &str,
    ) -> Result<MutationOutcome, AdpilotError>;
}
