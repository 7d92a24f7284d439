// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording notification sink for deterministic testing.
//!
//! `RecordingNotifier` implements `NotificationSink` by capturing every
//! event for later assertion. A failing variant exists to verify that
//! callers treat sink errors as non-fatal.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use adpilot_core::types::{NotificationEvent, NotificationKind};
use adpilot_core::{AdpilotError, NotificationSink};

/// A notification sink that records every delivered event.
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
    fail_delivery: bool,
}

impl RecordingNotifier {
    /// Create a sink that records events and reports successful delivery.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            fail_delivery: false,
        }
    }

    /// Create a sink that records events but reports every delivery as
    /// failed. Operations must still succeed when notified through this.
    pub fn failing() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            fail_delivery: true,
        }
    }

    /// All recorded events, in delivery order.
    pub async fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().await.clone()
    }

    /// Count of recorded events.
    pub async fn event_count(&self) -> usize {
        self.events.lock().await.len()
    }

    /// The most recently recorded event.
    pub async fn last_event(&self) -> Option<NotificationEvent> {
        self.events.lock().await.last().cloned()
    }

    /// Count of recorded events of the given kind.
    pub async fn count_of(&self, kind: NotificationKind) -> usize {
        self.events
            .lock()
            .await
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Clear all recorded events.
    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, event: NotificationEvent) -> Result<(), AdpilotError> {
        self.events.lock().await.push(event);
        if self.fail_delivery {
            return Err(AdpilotError::Internal(
                "notification delivery failed".to_string(),
            ));
        }
        Ok(())
    }
}
