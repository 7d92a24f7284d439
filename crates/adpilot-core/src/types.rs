// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Adpilot services and the platform gateway.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// --- Identifiers ---

/// Internal identifier of a linked account (UUID, minted at link time).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// External Google Ads customer id, as displayed (e.g. `999-000-1111`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

/// Platform identifier of a campaign within a customer account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

/// Identifier of a row in the change ledger (UUID, minted at apply time).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeId(pub String);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ChangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Session types ---

/// Credentials returned by the OAuth authorization-code exchange.
///
/// `Debug` output is redacted via [`SecretString`]; the raw token text is
/// only reachable through `expose_secret`.
#[derive(Debug, Clone)]
pub struct OAuthTokens {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
}

/// An active platform connection.
///
/// At most one session exists per installation. It is created by the OAuth
/// code exchange, persisted across restarts, and destroyed by disconnect.
#[derive(Debug, Clone)]
pub struct PlatformSession {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// UTC ISO-8601 timestamp of the code exchange.
    pub connected_at: String,
    /// Customer id of the currently selected account, if any. All campaign
    /// mutations are issued against this customer.
    pub active_customer_id: Option<CustomerId>,
}

// --- Account types ---

/// Lifecycle status of a customer account on the platform side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Enabled,
    Suspended,
    Cancelled,
    Pending,
}

/// An account visible to the authenticated user, as reported by the
/// accessible-accounts listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub customer_id: CustomerId,
    pub descriptive_name: String,
    pub currency_code: String,
    pub time_zone: String,
    #[serde(default)]
    pub is_manager: bool,
    #[serde(default)]
    pub can_manage_clients: bool,
    pub status: AccountStatus,
}

/// An account the user has linked into the registry.
///
/// `customer_id` is unique across the registry; at most one linked account
/// is selected at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedAccount {
    pub id: AccountId,
    pub customer_id: CustomerId,
    pub descriptive_name: String,
    pub currency_code: String,
    pub time_zone: String,
    pub is_manager: bool,
    pub can_manage_clients: bool,
    pub status: AccountStatus,
    /// UTC ISO-8601 timestamp of the link operation.
    pub linked_at: String,
}

// --- Change types ---

/// Category of a campaign change, as recorded in the ledger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Budget,
    Status,
    Bid,
    Keyword,
    Targeting,
}

/// Lifecycle status of a recorded change.
///
/// The executor only ever writes `Applied`; the single permitted transition
/// afterwards is `Applied -> Reverted`. `Pending` and `Failed` exist for
/// wire compatibility with exported history dumps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Pending,
    Applied,
    Failed,
    Reverted,
}

/// Serving status a campaign can be switched to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Enabled,
    Paused,
    Removed,
}

/// Match type for a negative keyword criterion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Phrase,
    Broad,
}

/// A change that was applied to a live campaign, as recorded in the ledger.
///
/// Rows are immutable once written except for `status`, which may move from
/// `applied` to `reverted` exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignChange {
    pub id: ChangeId,
    pub campaign_id: CampaignId,
    pub change_type: ChangeType,
    /// Value the platform reported as replaced, when it reported one.
    pub previous_value: Option<String>,
    pub new_value: String,
    pub confidence: u8,
    pub reason: String,
    /// UTC ISO-8601 timestamp of the successful platform call.
    pub applied_at: String,
    pub status: ChangeStatus,
}

// --- Recommendations ---

/// The typed payload of a recommendation, discriminated by its `type` tag.
///
/// The payload shape is validated at the serde boundary, so a `bid`
/// recommendation carrying a budget-shaped value fails to parse instead of
/// reaching the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "value",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum RecommendationKind {
    Budget { new_budget_micros: i64 },
    Status { new_status: CampaignStatus },
    Bid { keyword_id: String, new_bid_micros: i64 },
    Keyword { text: String },
    Targeting { criteria: String },
}

impl RecommendationKind {
    /// The ledger category this recommendation maps to.
    pub fn change_type(&self) -> ChangeType {
        match self {
            Self::Budget { .. } => ChangeType::Budget,
            Self::Status { .. } => ChangeType::Status,
            Self::Bid { .. } => ChangeType::Bid,
            Self::Keyword { .. } => ChangeType::Keyword,
            Self::Targeting { .. } => ChangeType::Targeting,
        }
    }
}

/// A recommendation produced by the optimization pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub campaign_id: CampaignId,
    /// Confidence score in percent, 0 to 100.
    pub confidence: u8,
    /// Human-readable rationale, copied into the ledger row on apply.
    pub reason: String,
    #[serde(flatten)]
    pub kind: RecommendationKind,
}

// --- Mutations ---

/// A concrete campaign mutation sent to the platform, discriminated by its
/// `type` tag on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CampaignMutation {
    Budget { new_budget_micros: i64 },
    Status { new_status: CampaignStatus },
    Bid { keyword_id: String, new_bid_micros: i64 },
    NegativeKeyword { text: String, match_type: MatchType },
}

impl CampaignMutation {
    /// The ledger category this mutation is recorded under.
    pub fn change_type(&self) -> ChangeType {
        match self {
            Self::Budget { .. } => ChangeType::Budget,
            Self::Status { .. } => ChangeType::Status,
            Self::Bid { .. } => ChangeType::Bid,
            Self::NegativeKeyword { .. } => ChangeType::Keyword,
        }
    }
}

/// What the platform reported after accepting a mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    /// Canonical form of the value now in effect.
    pub applied_value: String,
    /// The value that was replaced, when the platform echoes it.
    #[serde(default)]
    pub previous_value: Option<String>,
}

// --- Notifications ---

/// Outcome class of a notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Failure,
}

/// A user-facing notification emitted after a state-changing operation.
///
/// Every state-changing engine operation emits exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub message: String,
}

impl NotificationEvent {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: message.into(),
        }
    }
}

// --- API envelope ---

/// Uniform result wrapper used by the JSON output surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
