// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Adpilot change engine.
//!
//! This crate provides the error taxonomy, domain types, and port traits
//! used throughout the Adpilot workspace. The engine services, the SQLite
//! stores, and the Google Ads client all build on the definitions here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::AdpilotError;
pub use types::{
    AccountId, AccountStatus, AccountSummary, ApiEnvelope, CampaignChange, CampaignId,
    CampaignMutation, CampaignStatus, ChangeId, ChangeStatus, ChangeType, CustomerId,
    LinkedAccount, MatchType, MutationOutcome, NotificationEvent, NotificationKind, OAuthTokens,
    PlatformSession, Recommendation, RecommendationKind,
};

// Re-export the port traits at crate root.
pub use traits::{AdsGateway, NotificationSink};
