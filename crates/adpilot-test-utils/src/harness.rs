// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end engine testing.
//!
//! `EngineHarness` assembles a complete engine stack around a temp SQLite
//! database, the mock gateway, and the recording notifier. Provides
//! `connect_and_select()` to reach the ready-to-apply state in one call.

use std::sync::Arc;

use adpilot_config::model::{AdpilotConfig, EngineConfig, StorageConfig};
use adpilot_core::types::{AccountSummary, LinkedAccount};
use adpilot_core::AdpilotError;
use adpilot_engine::AdsEngine;
use adpilot_store::Database;

use crate::mock_gateway::{sample_accounts, MockAdsGateway};
use crate::mock_notifier::RecordingNotifier;

/// Builder for creating engine test environments with configurable options.
pub struct EngineHarnessBuilder {
    confidence_threshold: u8,
    revert_compensates: bool,
    accounts: Option<Vec<AccountSummary>>,
}

impl EngineHarnessBuilder {
    fn new() -> Self {
        Self {
            confidence_threshold: 100,
            revert_compensates: false,
            accounts: None,
        }
    }

    /// Set the auto-apply confidence threshold.
    pub fn with_confidence_threshold(mut self, threshold: u8) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    /// Enable compensating mutations on revert.
    pub fn with_compensating_reverts(mut self) -> Self {
        self.revert_compensates = true;
        self
    }

    /// Override the mock gateway's accessible accounts.
    pub fn with_accounts(mut self, accounts: Vec<AccountSummary>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    /// Build the harness, creating the temp database and wiring the engine.
    pub async fn build(self) -> Result<EngineHarness, AdpilotError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| AdpilotError::Storage {
            source: Box::new(e),
        })?;
        let db_path = temp_dir.path().join("test.db");

        let config = AdpilotConfig {
            engine: EngineConfig {
                confidence_threshold: self.confidence_threshold,
                revert_compensates: self.revert_compensates,
                ..EngineConfig::default()
            },
            storage: StorageConfig {
                database_path: db_path.to_string_lossy().to_string(),
                wal_mode: true,
            },
            ..AdpilotConfig::default()
        };

        let db = Database::open_with_config(&config.storage).await?;
        let gateway = Arc::new(MockAdsGateway::with_accounts(
            self.accounts.unwrap_or_else(sample_accounts),
        ));
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = AdsEngine::new(&config, db.clone(), gateway.clone(), notifier.clone());

        Ok(EngineHarness {
            engine,
            gateway,
            notifier,
            db,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete engine test environment with mocks and temp storage.
///
/// Exposes the mocks and the database handle so tests can queue gateway
/// behavior and assert on recorded calls, notifications, and ledger rows.
pub struct EngineHarness {
    /// The fully wired engine under test.
    pub engine: AdsEngine,
    /// The mock platform gateway.
    pub gateway: Arc<MockAdsGateway>,
    /// The recording notification sink.
    pub notifier: Arc<RecordingNotifier>,
    /// Shared database handle (temp file, cleaned up on drop).
    pub db: Database,
    /// The configuration the engine was built from.
    pub config: AdpilotConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl EngineHarness {
    /// Create a new builder for configuring the harness.
    pub fn builder() -> EngineHarnessBuilder {
        EngineHarnessBuilder::new()
    }

    /// Connect, link the given customer id, and select it.
    ///
    /// Clears recorded notifications afterwards so tests observe only the
    /// events of the operation under test.
    pub async fn connect_and_select(
        &self,
        customer_id: &str,
    ) -> Result<LinkedAccount, AdpilotError> {
        self.engine.session().connect("test-auth-code").await?;
        let account = self.engine.registry().link_account(customer_id).await?;
        let account = self.engine.registry().select_account(&account.id.0).await?;
        self.notifier.clear().await;
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = EngineHarness::builder().build().await.unwrap();
        assert!(!harness.engine.session().is_configured().await.unwrap());
        assert_eq!(harness.engine.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn connect_and_select_reaches_the_ready_state() {
        let harness = EngineHarness::builder().build().await.unwrap();

        let account = harness.connect_and_select("999-000-1111").await.unwrap();
        assert_eq!(account.customer_id.0, "999-000-1111");

        let selected = harness
            .engine
            .registry()
            .selected_account()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(selected.id, account.id);
        // The setup notifications were cleared.
        assert_eq!(harness.notifier.event_count().await, 0);
    }

    #[tokio::test]
    async fn builder_threshold_reaches_the_gate() {
        let harness = EngineHarness::builder()
            .with_confidence_threshold(80)
            .build()
            .await
            .unwrap();
        harness.connect_and_select("999-000-1111").await.unwrap();

        harness
            .engine
            .executor()
            .apply_budget_change(
                &adpilot_core::types::CampaignId("camp-1".to_string()),
                40_000_000,
                85,
                "Above the relaxed bar",
            )
            .await
            .unwrap();
        assert_eq!(harness.engine.ledger().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn temp_db_is_unique_per_harness() {
        let h1 = EngineHarness::builder().build().await.unwrap();
        let h2 = EngineHarness::builder().build().await.unwrap();

        h1.connect_and_select("999-000-1111").await.unwrap();
        assert!(h1.engine.session().is_configured().await.unwrap());
        assert!(!h2.engine.session().is_configured().await.unwrap());
    }
}
