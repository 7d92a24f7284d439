// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification sink trait for user-facing operation outcomes.

use async_trait::async_trait;

use crate::error::AdpilotError;
use crate::types::NotificationEvent;

/// Inbound surface for user-facing success/failure messages.
///
/// Delivery is best-effort: callers treat a sink error as non-fatal and must
/// not fail the underlying operation because of it.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers one notification event.
    async fn notify(&self, event: NotificationEvent) -> Result<(), AdpilotError>;
}
