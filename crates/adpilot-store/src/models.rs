// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `adpilot-core::types` for use across
//! service boundaries. This module re-exports the stored ones and adds the
//! raw session row, which keeps tokens as plain text for SQLite binding.

pub use adpilot_core::types::{AccountStatus, LinkedAccount};

/// The single persisted OAuth session, as stored.
///
/// Token columns are plain strings here so they can be bound as SQL
/// parameters. The engine wraps them in `SecretString` before handing the
/// session to anything outside the storage layer.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub active_customer_id: Option<String>,
    pub selected_account_id: Option<String>,
    pub connected_at: String,
}

impl std::fmt::Debug for SessionRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRow")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("active_customer_id", &self.active_customer_id)
            .field("selected_account_id", &self.selected_account_id)
            .field("connected_at", &self.connected_at)
            .finish()
    }
}
