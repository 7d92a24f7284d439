// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete change-application pipeline.
//!
//! Each test creates an isolated EngineHarness with a temp SQLite database,
//! a mock Ads gateway, and a recording notifier. Tests are independent and
//! order-insensitive.

use adpilot_core::types::{
    CampaignId, CampaignMutation, CampaignStatus, ChangeStatus, NotificationKind, Recommendation,
    RecommendationKind,
};
use adpilot_core::AdpilotError;
use adpilot_test_utils::EngineHarness;

fn camp(id: &str) -> CampaignId {
    CampaignId(id.to_string())
}

// ---- Test 1: Connect, link, and select ----

#[tokio::test]
async fn test_connect_link_select_reaches_ready_state() {
    let harness = EngineHarness::builder().build().await.unwrap();

    let accounts = harness
        .engine
        .session()
        .connect("4/auth-code")
        .await
        .unwrap();
    assert_eq!(accounts.len(), 3);
    assert_eq!(harness.gateway.exchanged_codes().await, vec!["4/auth-code"]);

    let linked = harness
        .engine
        .registry()
        .link_account("999-000-1111")
        .await
        .unwrap();
    assert_eq!(linked.descriptive_name, "Acme Storefront");

    let selected = harness
        .engine
        .registry()
        .select_account(&linked.id.0)
        .await
        .unwrap();
    assert_eq!(selected.customer_id.0, "999-000-1111");

    let session = harness
        .engine
        .session()
        .current_session()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.active_customer_id.unwrap().0, "999-000-1111");
}

// ---- Test 2: Confidence gate on the apply path ----

#[tokio::test]
async fn test_full_confidence_applies_and_low_confidence_is_rejected() {
    let harness = EngineHarness::builder().build().await.unwrap();
    harness.connect_and_select("999-000-1111").await.unwrap();

    let change = harness
        .engine
        .executor()
        .apply_budget_change(&camp("camp-42"), 75_000_000, 100, "Scale the winning campaign")
        .await
        .unwrap();
    assert_eq!(change.status, ChangeStatus::Applied);
    assert_eq!(harness.engine.ledger().count().await.unwrap(), 1);

    let err = harness
        .engine
        .executor()
        .apply_bid_change(&camp("camp-42"), "kw-7", 2_500_000, 87, "Bid up the converting keyword")
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot apply change: Confidence is 87%, must be 100% to auto-apply changes."
    );

    // The rejected change reached neither the platform nor the ledger.
    assert_eq!(harness.gateway.mutation_count().await, 1);
    assert_eq!(harness.engine.ledger().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_configured_threshold_admits_lower_confidence() {
    let harness = EngineHarness::builder()
        .with_confidence_threshold(80)
        .build()
        .await
        .unwrap();
    harness.connect_and_select("999-000-1111").await.unwrap();

    let change = harness
        .engine
        .executor()
        .apply_bid_change(&camp("camp-9"), "kw-1", 1_200_000, 85, "Above the 80% bar")
        .await
        .unwrap();
    assert_eq!(change.confidence, 85);

    let err = harness
        .engine
        .executor()
        .apply_bid_change(&camp("camp-9"), "kw-1", 1_300_000, 79, "Below the bar")
        .await
        .unwrap_err();
    assert!(matches!(err, AdpilotError::ConfidenceTooLow { .. }));
    assert!(err.to_string().contains("must be 80%"));
}

// ---- Test 3: Revert marks the row in place ----

#[tokio::test]
async fn test_revert_flips_status_without_removing_the_row() {
    let harness = EngineHarness::builder().build().await.unwrap();
    harness.connect_and_select("999-000-1111").await.unwrap();

    let change = harness
        .engine
        .executor()
        .apply_budget_change(&camp("camp-42"), 75_000_000, 100, "Scale up")
        .await
        .unwrap();
    assert_eq!(harness.engine.ledger().count().await.unwrap(), 1);

    let reverted = harness
        .engine
        .executor()
        .revert_change(&change.id.0)
        .await
        .unwrap();
    assert_eq!(reverted.status, ChangeStatus::Reverted);

    // Still one row; its status moved instead of the row disappearing.
    assert_eq!(harness.engine.ledger().count().await.unwrap(), 1);
    let row = harness
        .engine
        .ledger()
        .find(&change.id.0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ChangeStatus::Reverted);

    // Mark-only mode: the revert issued no platform mutation.
    assert_eq!(harness.gateway.mutation_count().await, 1);

    let err = harness
        .engine
        .executor()
        .revert_change(&change.id.0)
        .await
        .unwrap_err();
    assert!(matches!(err, AdpilotError::AlreadyReverted { .. }));
}

// ---- Test 4: History is newest-first ----

#[tokio::test]
async fn test_history_lists_newest_change_first() {
    let harness = EngineHarness::builder().build().await.unwrap();
    harness.connect_and_select("999-000-1111").await.unwrap();

    harness
        .engine
        .executor()
        .apply_budget_change(&camp("camp-1"), 10_000_000, 100, "first")
        .await
        .unwrap();
    harness
        .engine
        .executor()
        .apply_status_change(&camp("camp-2"), CampaignStatus::Paused, 100, "second")
        .await
        .unwrap();

    let changes = harness.engine.ledger().list(None).await.unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].campaign_id.0, "camp-2");
    assert_eq!(changes[1].campaign_id.0, "camp-1");

    let limited = harness.engine.ledger().list(Some(1)).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].campaign_id.0, "camp-2");
}

// ---- Test 5: Recommendation documents ----

#[tokio::test]
async fn test_recommendation_document_round_trips_into_a_change() {
    let harness = EngineHarness::builder().build().await.unwrap();
    harness.connect_and_select("999-000-1111").await.unwrap();

    // Parse the document exactly as `adpilot recommend` does.
    let recommendation: Recommendation = serde_json::from_str(
        r#"{
            "campaignId": "camp-42",
            "confidence": 100,
            "reason": "Weekend traffic is converting above target CPA",
            "type": "budget",
            "value": { "newBudgetMicros": 80000000 }
        }"#,
    )
    .unwrap();

    let change = harness
        .engine
        .executor()
        .apply_recommendation(recommendation)
        .await
        .unwrap();
    assert_eq!(change.campaign_id.0, "camp-42");
    assert_eq!(change.new_value, "80000000");
    assert_eq!(change.reason, "Weekend traffic is converting above target CPA");
}

#[tokio::test]
async fn test_keyword_recommendations_have_no_auto_apply_handler() {
    let harness = EngineHarness::builder().build().await.unwrap();
    harness.connect_and_select("999-000-1111").await.unwrap();

    let recommendation = Recommendation {
        campaign_id: camp("camp-42"),
        confidence: 100,
        reason: "Add converting search term".to_string(),
        kind: RecommendationKind::Keyword {
            text: "running shoes".to_string(),
        },
    };

    let err = harness
        .engine
        .executor()
        .apply_recommendation(recommendation)
        .await
        .unwrap_err();
    assert!(matches!(err, AdpilotError::UnsupportedChangeType(_)));
    assert_eq!(harness.gateway.mutation_count().await, 0);
    assert_eq!(harness.engine.ledger().count().await.unwrap(), 0);
}

// ---- Test 6: Disconnect lifecycle ----

#[tokio::test]
async fn test_disconnect_clears_the_session_and_blocks_applies() {
    let harness = EngineHarness::builder().build().await.unwrap();
    harness.connect_and_select("999-000-1111").await.unwrap();

    harness.engine.session().disconnect().await.unwrap();
    assert!(!harness.engine.session().is_configured().await.unwrap());

    // Disconnect is idempotent.
    harness.engine.session().disconnect().await.unwrap();

    let err = harness
        .engine
        .executor()
        .apply_budget_change(&camp("camp-42"), 75_000_000, 100, "after disconnect")
        .await
        .unwrap_err();
    assert!(matches!(err, AdpilotError::NotAuthenticated));
}

// ---- Test 7: Exactly one notification per state-changing operation ----

#[tokio::test]
async fn test_each_state_change_emits_one_notification() {
    let harness = EngineHarness::builder().build().await.unwrap();

    harness.engine.session().connect("4/code").await.unwrap();
    let account = harness
        .engine
        .registry()
        .link_account("999-000-1111")
        .await
        .unwrap();
    harness
        .engine
        .registry()
        .select_account(&account.id.0)
        .await
        .unwrap();
    harness
        .engine
        .executor()
        .apply_budget_change(&camp("camp-1"), 1_000_000, 100, "r")
        .await
        .unwrap();

    let events = harness.notifier.events().await;
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e.kind == NotificationKind::Success));
    assert_eq!(events[0].message, "Connected to Google Ads. 3 accounts accessible.");
    assert_eq!(events[3].message, "Applied budget change to campaign camp-1 (now 1000000).");

    // A gate rejection is one failure event, nothing more.
    harness.notifier.clear().await;
    let _ = harness
        .engine
        .executor()
        .apply_budget_change(&camp("camp-1"), 2_000_000, 40, "r")
        .await;
    assert_eq!(harness.notifier.event_count().await, 1);
    assert_eq!(
        harness.notifier.count_of(NotificationKind::Failure).await,
        1
    );
}

// ---- Test 8: Compensating reverts ----

#[tokio::test]
async fn test_compensating_revert_restores_the_previous_value() {
    let harness = EngineHarness::builder()
        .with_compensating_reverts()
        .build()
        .await
        .unwrap();
    harness.connect_and_select("999-000-1111").await.unwrap();

    harness
        .gateway
        .queue_outcome(adpilot_core::types::MutationOutcome {
            applied_value: "75000000".to_string(),
            previous_value: Some("50000000".to_string()),
        })
        .await;

    let change = harness
        .engine
        .executor()
        .apply_budget_change(&camp("camp-42"), 75_000_000, 100, "Scale up")
        .await
        .unwrap();
    assert_eq!(change.previous_value.as_deref(), Some("50000000"));

    harness
        .engine
        .executor()
        .revert_change(&change.id.0)
        .await
        .unwrap();

    let calls = harness.gateway.mutate_calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1].mutation,
        CampaignMutation::Budget {
            new_budget_micros: 50_000_000
        }
    );
    // Each platform attempt carries its own idempotency key.
    assert_ne!(calls[0].idempotency_key, calls[1].idempotency_key);

    let row = harness
        .engine
        .ledger()
        .find(&change.id.0)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ChangeStatus::Reverted);
}

// ---- Test 9: Harness isolation ----

#[tokio::test]
async fn test_harnesses_are_independent() {
    let h1 = EngineHarness::builder().build().await.unwrap();
    let h2 = EngineHarness::builder().build().await.unwrap();

    h1.connect_and_select("999-000-1111").await.unwrap();
    h1.engine
        .executor()
        .apply_budget_change(&camp("camp-1"), 1_000_000, 100, "r")
        .await
        .unwrap();

    assert_eq!(h1.engine.ledger().count().await.unwrap(), 1);
    assert_eq!(h2.engine.ledger().count().await.unwrap(), 0);
    assert!(!h2.engine.session().is_configured().await.unwrap());
}

// ---- Test 10: Applying requires a selected account ----

#[tokio::test]
async fn test_apply_without_selection_names_the_fix() {
    let harness = EngineHarness::builder().build().await.unwrap();
    harness.engine.session().connect("4/code").await.unwrap();
    harness
        .engine
        .registry()
        .link_account("999-000-1111")
        .await
        .unwrap();

    let err = harness
        .engine
        .executor()
        .apply_budget_change(&camp("camp-42"), 75_000_000, 100, "no selection yet")
        .await
        .unwrap_err();
    assert!(matches!(err, AdpilotError::NotConfigured(_)));
    assert!(err.to_string().contains("adpilot accounts select"));
    assert_eq!(harness.gateway.mutation_count().await, 0);
}
