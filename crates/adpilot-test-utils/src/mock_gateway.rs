// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock Ads gateway for deterministic testing.
//!
//! `MockAdsGateway` implements `AdsGateway` with configurable account
//! listings, queueable mutation outcomes, and captured calls for assertion
//! in tests. No network is involved.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::Mutex;

use adpilot_core::types::{
    AccountStatus, AccountSummary, CampaignId, CampaignMutation, CustomerId, MutationOutcome,
    OAuthTokens, PlatformSession,
};
use adpilot_core::{AdpilotError, AdsGateway};

/// One `mutate_campaign` call as the gateway saw it.
///
/// Recorded for every call that reaches the gateway, including calls whose
/// queued outcome is a failure. A mutation rejected before the network (gate,
/// missing session) never shows up here.
#[derive(Debug, Clone)]
pub struct RecordedMutation {
    pub customer_id: CustomerId,
    pub campaign_id: CampaignId,
    pub mutation: CampaignMutation,
    pub idempotency_key: String,
}

/// A mock Ads platform gateway for testing.
///
/// - `exchange_auth_code` records the code and returns fixed mock tokens
///   unless a failure is queued.
/// - `list_accessible_accounts` returns the configured account list unless a
///   failure is queued.
/// - `mutate_campaign` records the call, then pops the next queued outcome.
///   When the queue is empty it succeeds with an outcome echoing the
///   mutation's new value (no `previous_value`).
pub struct MockAdsGateway {
    accounts: Arc<Mutex<Vec<AccountSummary>>>,
    outcomes: Arc<Mutex<VecDeque<Result<MutationOutcome, AdpilotError>>>>,
    exchange_failures: Arc<Mutex<VecDeque<AdpilotError>>>,
    listing_failures: Arc<Mutex<VecDeque<AdpilotError>>>,
    exchanged_codes: Arc<Mutex<Vec<String>>>,
    mutate_calls: Arc<Mutex<Vec<RecordedMutation>>>,
}

impl MockAdsGateway {
    /// Create a mock gateway with an empty account list and no queued outcomes.
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(Mutex::new(Vec::new())),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            exchange_failures: Arc::new(Mutex::new(VecDeque::new())),
            listing_failures: Arc::new(Mutex::new(VecDeque::new())),
            exchanged_codes: Arc::new(Mutex::new(Vec::new())),
            mutate_calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock gateway pre-loaded with the given accessible accounts.
    pub fn with_accounts(accounts: Vec<AccountSummary>) -> Self {
        let gateway = Self::new();
        *gateway.accounts.try_lock().expect("no contention at construction") = accounts;
        gateway
    }

    /// Replace the accessible-account listing.
    pub async fn set_accounts(&self, accounts: Vec<AccountSummary>) {
        *self.accounts.lock().await = accounts;
    }

    /// Queue a successful mutation outcome.
    pub async fn queue_outcome(&self, outcome: MutationOutcome) {
        self.outcomes.lock().await.push_back(Ok(outcome));
    }

    /// Queue a mutation failure.
    pub async fn queue_mutation_failure(&self, err: AdpilotError) {
        self.outcomes.lock().await.push_back(Err(err));
    }

    /// Queue a failure for the next token exchange.
    pub async fn queue_exchange_failure(&self, err: AdpilotError) {
        self.exchange_failures.lock().await.push_back(err);
    }

    /// Queue a failure for the next account listing.
    pub async fn queue_listing_failure(&self, err: AdpilotError) {
        self.listing_failures.lock().await.push_back(err);
    }

    /// All mutation calls the gateway received, in order.
    pub async fn mutate_calls(&self) -> Vec<RecordedMutation> {
        self.mutate_calls.lock().await.clone()
    }

    /// Count of mutation calls the gateway received.
    pub async fn mutation_count(&self) -> usize {
        self.mutate_calls.lock().await.len()
    }

    /// All authorization codes passed to `exchange_auth_code`, in order.
    pub async fn exchanged_codes(&self) -> Vec<String> {
        self.exchanged_codes.lock().await.clone()
    }
}

impl Default for MockAdsGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Three-account fixture mirroring a typical accessible-accounts listing.
///
/// Contains customer id `999-000-1111` so scenario tests can link it.
pub fn sample_accounts() -> Vec<AccountSummary> {
    vec![
        AccountSummary {
            customer_id: CustomerId("999-000-1111".to_string()),
            descriptive_name: "Acme Storefront".to_string(),
            currency_code: "USD".to_string(),
            time_zone: "America/New_York".to_string(),
            is_manager: false,
            can_manage_clients: false,
            status: AccountStatus::Enabled,
        },
        AccountSummary {
            customer_id: CustomerId("222-333-4444".to_string()),
            descriptive_name: "Globex Marketing".to_string(),
            currency_code: "EUR".to_string(),
            time_zone: "Europe/Berlin".to_string(),
            is_manager: true,
            can_manage_clients: true,
            status: AccountStatus::Enabled,
        },
        AccountSummary {
            customer_id: CustomerId("555-666-7777".to_string()),
            descriptive_name: "Initech Legacy".to_string(),
            currency_code: "USD".to_string(),
            time_zone: "America/Chicago".to_string(),
            is_manager: false,
            can_manage_clients: false,
            status: AccountStatus::Suspended,
        },
    ]
}

/// Fallback outcome when no outcome is queued: echo the mutation's new value.
fn default_outcome(mutation: &CampaignMutation) -> MutationOutcome {
    let applied_value = match mutation {
        CampaignMutation::Budget { new_budget_micros } => new_budget_micros.to_string(),
        CampaignMutation::Status { new_status } => new_status.to_string(),
        CampaignMutation::Bid { new_bid_micros, .. } => new_bid_micros.to_string(),
        CampaignMutation::NegativeKeyword { text, .. } => text.clone(),
    };
    MutationOutcome {
        applied_value,
        previous_value: None,
    }
}

#[async_trait]
impl AdsGateway for MockAdsGateway {
    async fn exchange_auth_code(&self, code: &str) -> Result<OAuthTokens, AdpilotError> {
        self.exchanged_codes.lock().await.push(code.to_string());
        if let Some(err) = self.exchange_failures.lock().await.pop_front() {
            return Err(err);
        }
        Ok(OAuthTokens {
            access_token: SecretString::from("ya29.mock-access".to_string()),
            refresh_token: Some(SecretString::from("1//mock-refresh".to_string())),
        })
    }

    async fn list_accessible_accounts(
        &self,
        _session: &PlatformSession,
    ) -> Result<Vec<AccountSummary>, AdpilotError> {
        if let Some(err) = self.listing_failures.lock().await.pop_front() {
            return Err(err);
        }
        Ok(self.accounts.lock().await.clone())
    }

    async fn mutate_campaign(
        &self,
        _session: &PlatformSession,
        customer_id: &CustomerId,
        campaign_id: &CampaignId,
        mutation: &CampaignMutation,
        idempotency_key: &str,
    ) -> Result<MutationOutcome, AdpilotError> {
        self.mutate_calls.lock().await.push(RecordedMutation {
            customer_id: customer_id.clone(),
            campaign_id: campaign_id.clone(),
            mutation: mutation.clone(),
            idempotency_key: idempotency_key.to_string(),
        });

        match self.outcomes.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(default_outcome(mutation)),
        }
    }
}
