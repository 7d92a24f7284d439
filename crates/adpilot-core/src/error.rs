// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Adpilot change engine.

use thiserror::Error;

use crate::types::ChangeType;

/// The primary error type used across all Adpilot services and the platform
/// gateway port.
#[derive(Debug, Error)]
pub enum AdpilotError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// No platform connection is active; the operation requires a connected account.
    #[error("not authenticated: no Google Ads connection is active")]
    NotAuthenticated,

    /// A required piece of setup is missing (developer token, selected account).
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// User-supplied input that fails validation before reaching any service
    /// (malformed recommendation documents, unreadable input files).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The recommendation's confidence is below the auto-apply threshold.
    ///
    /// The display text is part of the product contract; dashboards match on it
    /// verbatim, so the wording here must not drift.
    #[error(
        "Cannot apply change: Confidence is {confidence}%, must be {required}% to auto-apply changes."
    )]
    ConfidenceTooLow { confidence: u8, required: u8 },

    /// A referenced entity does not exist.
    #[error("{what} not found: {id}")]
    NotFound { what: String, id: String },

    /// The customer id is already present in the linked-account registry.
    #[error("account {customer_id} is already linked")]
    DuplicateAccount { customer_id: String },

    /// The recommendation type has no auto-apply handler.
    #[error("unsupported change type: {0}")]
    UnsupportedChangeType(ChangeType),

    /// The change was already reverted; a second revert would double-compensate.
    #[error("change {id} has already been reverted")]
    AlreadyReverted { id: String },

    /// Ads platform errors (HTTP failure, API error envelope, timeout).
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
