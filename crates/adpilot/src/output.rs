// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output helpers shared by the CLI commands.
//!
//! Human mode prints notification lines and compact detail blocks. JSON
//! mode wraps every result in the uniform `{success, data?, error?}`
//! envelope and keeps stdout free of anything else.

use std::io::IsTerminal;

use async_trait::async_trait;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use adpilot_core::types::{ApiEnvelope, NotificationEvent, NotificationKind};
use adpilot_core::{AdpilotError, NotificationSink};

/// Prints a success envelope around `data`.
pub fn emit_ok<T: Serialize>(data: &T) {
    let envelope = ApiEnvelope::ok(data);
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Prints a failure envelope carrying `message`.
pub fn emit_failure(message: &str) {
    let envelope: ApiEnvelope<()> = ApiEnvelope::error(message);
    println!(
        "{}",
        serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Notification sink that prints engine events to the terminal.
///
/// Success events become `✓` lines (`[OK]` when stdout is not a TTY).
/// Failure events are not printed here: the same text reaches stderr
/// through the command's error path. In JSON mode every event is logged
/// instead of printed so stdout stays machine-readable.
pub struct TerminalNotifier {
    quiet: bool,
}

impl TerminalNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

#[async_trait]
impl NotificationSink for TerminalNotifier {
    async fn notify(&self, event: NotificationEvent) -> Result<(), AdpilotError> {
        if self.quiet || event.kind == NotificationKind::Failure {
            debug!(kind = %event.kind, message = %event.message, "notification");
            return Ok(());
        }
        if std::io::stdout().is_terminal() {
            println!("{} {}", "✓".green(), event.message);
        } else {
            println!("[OK] {}", event.message);
        }
        Ok(())
    }
}
