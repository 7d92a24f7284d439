// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engine services for the Adpilot change engine.
//!
//! This crate wires the session lifecycle, the linked-account registry, and
//! the confidence-gated change executor on top of the storage and gateway
//! crates. Services take their ports (`AdsGateway`, `NotificationSink`) as
//! `Arc<dyn Trait>` so production wiring and tests inject different
//! implementations through the same constructors.

pub mod executor;
pub mod gate;
pub mod registry;
pub mod session;

use std::sync::Arc;

use adpilot_config::AdpilotConfig;
use adpilot_core::types::NotificationEvent;
use adpilot_core::{AdsGateway, NotificationSink};
use adpilot_ledger::ChangeLedger;
use adpilot_store::Database;
use tracing::warn;

pub use executor::ChangeExecutor;
pub use gate::ConfidencePolicy;
pub use registry::AccountRegistry;
pub use session::SessionService;

/// Deliver a notification, swallowing sink errors.
///
/// Notification delivery is best-effort: a broken sink must never fail the
/// operation it reports on.
pub(crate) async fn deliver(notifier: &Arc<dyn NotificationSink>, event: NotificationEvent) {
    if let Err(e) = notifier.notify(event).await {
        warn!(error = %e, "notification delivery failed (non-fatal)");
    }
}

/// Current UTC time as the ISO-8601 string format used across storage.
pub(crate) fn utc_now_iso() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// The fully wired engine: one value owning every service.
///
/// All services share the same database handle, gateway, and notifier. The
/// binary builds one of these at startup; tests build them around mocks.
pub struct AdsEngine {
    session: SessionService,
    registry: AccountRegistry,
    executor: ChangeExecutor,
    ledger: ChangeLedger,
}

impl AdsEngine {
    pub fn new(
        config: &AdpilotConfig,
        db: Database,
        gateway: Arc<dyn AdsGateway>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let ledger = ChangeLedger::new(db.connection().clone());
        let gate = ConfidencePolicy::from_config(&config.engine);
        let session = SessionService::new(
            db.clone(),
            gateway.clone(),
            notifier.clone(),
            config.googleads.clone(),
        );
        let registry = AccountRegistry::new(db.clone(), gateway.clone(), notifier.clone());
        let executor = ChangeExecutor::new(
            db,
            ledger.clone(),
            gateway,
            notifier,
            gate,
            config.engine.revert_compensates,
        );
        Self {
            session,
            registry,
            executor,
            ledger,
        }
    }

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &ChangeExecutor {
        &self.executor
    }

    pub fn ledger(&self) -> &ChangeLedger {
        &self.ledger
    }
}
