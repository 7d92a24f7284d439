// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `adpilot apply`, `adpilot recommend`, and `adpilot revert` command
//! implementations.
//!
//! Manual applies default to 100% confidence; passing `--confidence` routes
//! the change through the same gate the recommendation path uses.
//!
//! `adpilot recommend` consumes a recommendation document:
//!
//! ```json
//! {
//!   "campaignId": "camp-42",
//!   "confidence": 92,
//!   "reason": "Weekend traffic is converting above target CPA",
//!   "type": "budget",
//!   "value": { "newBudgetMicros": 75000000 }
//! }
//! ```

use std::io::Read;
use std::path::Path;

use clap::Subcommand;

use adpilot_core::types::{
    CampaignChange, CampaignId, CampaignStatus, MatchType, Recommendation,
};
use adpilot_core::AdpilotError;
use adpilot_engine::AdsEngine;

use crate::output;

/// Campaign change subcommands.
#[derive(Subcommand, Debug)]
pub enum ApplyCommand {
    /// Set a campaign's daily budget.
    Budget {
        campaign_id: String,
        /// New daily budget in micros (1000000 = one currency unit).
        new_budget_micros: i64,
        #[arg(long, default_value_t = 100)]
        confidence: u8,
        #[arg(long, default_value = "manual change")]
        reason: String,
    },
    /// Switch a campaign's serving status.
    Status {
        campaign_id: String,
        /// One of: enabled, paused, removed.
        #[arg(value_parser = parse_campaign_status)]
        new_status: CampaignStatus,
        #[arg(long, default_value_t = 100)]
        confidence: u8,
        #[arg(long, default_value = "manual change")]
        reason: String,
    },
    /// Set a keyword bid within a campaign.
    Bid {
        campaign_id: String,
        keyword_id: String,
        /// New bid in micros.
        new_bid_micros: i64,
        #[arg(long, default_value_t = 100)]
        confidence: u8,
        #[arg(long, default_value = "manual change")]
        reason: String,
    },
    /// Add a negative keyword to a campaign.
    NegativeKeyword {
        campaign_id: String,
        /// Keyword text to exclude.
        text: String,
        /// One of: exact, phrase, broad.
        #[arg(long, default_value = "exact", value_parser = parse_match_type)]
        match_type: MatchType,
        #[arg(long, default_value_t = 100)]
        confidence: u8,
        #[arg(long, default_value = "manual change")]
        reason: String,
    },
}

fn parse_campaign_status(s: &str) -> Result<CampaignStatus, String> {
    s.parse().map_err(|_| {
        format!("invalid campaign status `{s}` (expected enabled, paused, or removed)")
    })
}

fn parse_match_type(s: &str) -> Result<MatchType, String> {
    s.parse()
        .map_err(|_| format!("invalid match type `{s}` (expected exact, phrase, or broad)"))
}

/// Runs an `adpilot apply` subcommand.
pub async fn run_apply(
    engine: &AdsEngine,
    command: ApplyCommand,
    json: bool,
) -> Result<(), AdpilotError> {
    let change = match command {
        ApplyCommand::Budget {
            campaign_id,
            new_budget_micros,
            confidence,
            reason,
        } => {
            engine
                .executor()
                .apply_budget_change(
                    &CampaignId(campaign_id),
                    new_budget_micros,
                    confidence,
                    &reason,
                )
                .await?
        }
        ApplyCommand::Status {
            campaign_id,
            new_status,
            confidence,
            reason,
        } => {
            engine
                .executor()
                .apply_status_change(&CampaignId(campaign_id), new_status, confidence, &reason)
                .await?
        }
        ApplyCommand::Bid {
            campaign_id,
            keyword_id,
            new_bid_micros,
            confidence,
            reason,
        } => {
            engine
                .executor()
                .apply_bid_change(
                    &CampaignId(campaign_id),
                    &keyword_id,
                    new_bid_micros,
                    confidence,
                    &reason,
                )
                .await?
        }
        ApplyCommand::NegativeKeyword {
            campaign_id,
            text,
            match_type,
            confidence,
            reason,
        } => {
            engine
                .executor()
                .apply_negative_keyword(
                    &CampaignId(campaign_id),
                    &text,
                    match_type,
                    confidence,
                    &reason,
                )
                .await?
        }
    };
    print_change(&change, json);
    Ok(())
}

/// Runs `adpilot recommend`: parses a recommendation document and applies it.
pub async fn run_recommend(
    engine: &AdsEngine,
    file: Option<&Path>,
    json: bool,
) -> Result<(), AdpilotError> {
    let text = read_recommendation_text(file)?;
    let recommendation = parse_recommendation(&text)?;
    let change = engine
        .executor()
        .apply_recommendation(recommendation)
        .await?;
    print_change(&change, json);
    Ok(())
}

/// Runs `adpilot revert`.
pub async fn run_revert(
    engine: &AdsEngine,
    change_id: &str,
    json: bool,
) -> Result<(), AdpilotError> {
    let change = engine.executor().revert_change(change_id).await?;
    if json {
        output::emit_ok(&change);
    }
    Ok(())
}

fn read_recommendation_text(file: Option<&Path>) -> Result<String, AdpilotError> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            AdpilotError::InvalidInput(format!(
                "cannot read recommendation file {}: {e}",
                path.display()
            ))
        }),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).map_err(|e| {
                AdpilotError::InvalidInput(format!("cannot read recommendation from stdin: {e}"))
            })?;
            Ok(text)
        }
    }
}

fn parse_recommendation(text: &str) -> Result<Recommendation, AdpilotError> {
    serde_json::from_str(text)
        .map_err(|e| AdpilotError::InvalidInput(format!("invalid recommendation document: {e}")))
}

/// Prints the recorded change: the full row in JSON mode, the id and value
/// transition in human mode (the outcome line comes from the sink).
fn print_change(change: &CampaignChange, json: bool) {
    if json {
        output::emit_ok(change);
        return;
    }
    println!("  change id: {}", change.id);
    match &change.previous_value {
        Some(previous) => println!("  value: {previous} -> {}", change.new_value),
        None => println!("  value: {}", change.new_value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adpilot_core::types::RecommendationKind;

    #[test]
    fn campaign_status_parses_case_insensitively() {
        assert_eq!(parse_campaign_status("paused").unwrap(), CampaignStatus::Paused);
        assert_eq!(parse_campaign_status("ENABLED").unwrap(), CampaignStatus::Enabled);
        let err = parse_campaign_status("archived").unwrap_err();
        assert!(err.contains("archived"));
        assert!(err.contains("enabled, paused, or removed"));
    }

    #[test]
    fn match_type_parses_the_three_forms() {
        assert_eq!(parse_match_type("exact").unwrap(), MatchType::Exact);
        assert_eq!(parse_match_type("Phrase").unwrap(), MatchType::Phrase);
        assert_eq!(parse_match_type("broad").unwrap(), MatchType::Broad);
        assert!(parse_match_type("regex").is_err());
    }

    #[test]
    fn recommendation_document_parses_by_type_tag() {
        let rec = parse_recommendation(
            r#"{
                "campaignId": "camp-42",
                "confidence": 92,
                "reason": "Weekend traffic is converting above target CPA",
                "type": "budget",
                "value": { "newBudgetMicros": 75000000 }
            }"#,
        )
        .unwrap();
        assert_eq!(rec.campaign_id.0, "camp-42");
        assert_eq!(rec.confidence, 92);
        assert_eq!(
            rec.kind,
            RecommendationKind::Budget {
                new_budget_micros: 75_000_000
            }
        );
    }

    #[test]
    fn mismatched_payload_shape_is_rejected_at_the_boundary() {
        // A bid recommendation carrying a budget-shaped value must not parse.
        let err = parse_recommendation(
            r#"{
                "campaignId": "camp-42",
                "confidence": 92,
                "reason": "r",
                "type": "bid",
                "value": { "newBudgetMicros": 75000000 }
            }"#,
        )
        .unwrap_err();
        assert!(matches!(err, AdpilotError::InvalidInput(_)));
        assert!(err.to_string().contains("invalid recommendation document"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err =
            read_recommendation_text(Some(Path::new("/nonexistent/rec.json"))).unwrap_err();
        assert!(matches!(err, AdpilotError::InvalidInput(_)));
        assert!(err.to_string().contains("/nonexistent/rec.json"));
    }
}
