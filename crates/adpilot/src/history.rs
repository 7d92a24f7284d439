// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adpilot history` command implementation.
//!
//! Lists recorded changes newest first. Reverted rows stay in the listing
//! with their status flipped; nothing is ever deleted from the ledger.

use std::io::IsTerminal;

use colored::Colorize;
use serde::Serialize;

use adpilot_core::types::{CampaignChange, ChangeStatus};
use adpilot_core::AdpilotError;
use adpilot_engine::AdsEngine;

use crate::output;

/// Structured output for `adpilot history`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    total_recorded: u64,
    changes: Vec<CampaignChange>,
}

/// Runs `adpilot history`.
pub async fn run_history(engine: &AdsEngine, limit: u32, json: bool) -> Result<(), AdpilotError> {
    let changes = engine.ledger().list(Some(limit)).await?;
    let total_recorded = engine.ledger().count().await?;

    if json {
        output::emit_ok(&HistoryResponse {
            total_recorded,
            changes,
        });
        return Ok(());
    }
    if changes.is_empty() {
        println!("No changes recorded.");
        return Ok(());
    }

    let use_color = std::io::stdout().is_terminal();
    for change in &changes {
        println!(
            "{}  {}  {} on {}  [{}]",
            change.id,
            change.applied_at,
            change.change_type,
            change.campaign_id,
            status_text(change.status, use_color)
        );
        match &change.previous_value {
            Some(previous) => println!("    {previous} -> {}", change.new_value),
            None => println!("    -> {}", change.new_value),
        }
        println!("    {}% -- {}", change.confidence, change.reason);
    }
    if total_recorded > changes.len() as u64 {
        println!();
        println!("{} of {} recorded changes shown.", changes.len(), total_recorded);
    }
    Ok(())
}

fn status_text(status: ChangeStatus, use_color: bool) -> String {
    if !use_color {
        return status.to_string();
    }
    match status {
        ChangeStatus::Applied => status.to_string().green().to_string(),
        ChangeStatus::Reverted => status.to_string().yellow().to_string(),
        ChangeStatus::Failed => status.to_string().red().to_string(),
        ChangeStatus::Pending => status.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_status_text_matches_the_wire_form() {
        assert_eq!(status_text(ChangeStatus::Applied, false), "applied");
        assert_eq!(status_text(ChangeStatus::Reverted, false), "reverted");
    }

    #[test]
    fn history_response_serializes_the_total() {
        let response = HistoryResponse {
            total_recorded: 7,
            changes: Vec::new(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["totalRecorded"], 7);
        assert!(value["changes"].as_array().unwrap().is_empty());
    }
}
