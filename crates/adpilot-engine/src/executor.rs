// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gated change executor: the only path that mutates live campaigns.
//!
//! Every apply runs the same pipeline: confidence gate, session check,
//! selected-account check, per-campaign lock, gateway call, ledger append.
//! A change row exists if and only if the platform accepted the mutation.

use std::sync::Arc;

use adpilot_core::types::{
    CampaignChange, CampaignId, CampaignMutation, CampaignStatus, ChangeId, ChangeStatus,
    ChangeType, CustomerId, MatchType, NotificationEvent, PlatformSession, Recommendation,
    RecommendationKind,
};
use adpilot_core::{AdpilotError, AdsGateway, NotificationSink};
use adpilot_ledger::ChangeLedger;
use adpilot_store::Database;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::gate::ConfidencePolicy;
use crate::session::require_session;
use crate::{deliver, utc_now_iso};

fn active_customer(session: &PlatformSession) -> Result<CustomerId, AdpilotError> {
    session.active_customer_id.clone().ok_or_else(|| {
        AdpilotError::NotConfigured(
            "no account is selected. Run `adpilot accounts select <id>` first.".to_string(),
        )
    })
}

/// Applies campaign changes against the selected account and records them.
pub struct ChangeExecutor {
    db: Database,
    ledger: ChangeLedger,
    gateway: Arc<dyn AdsGateway>,
    notifier: Arc<dyn NotificationSink>,
    gate: ConfidencePolicy,
    revert_compensates: bool,
    /// One async mutex per campaign id. Entries are never removed; the set
    /// of campaigns touched in one process lifetime stays small.
    campaign_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ChangeExecutor {
    pub fn new(
        db: Database,
        ledger: ChangeLedger,
        gateway: Arc<dyn AdsGateway>,
        notifier: Arc<dyn NotificationSink>,
        gate: ConfidencePolicy,
        revert_compensates: bool,
    ) -> Self {
        Self {
            db,
            ledger,
            gateway,
            notifier,
            gate,
            revert_compensates,
            campaign_locks: DashMap::new(),
        }
    }

    pub async fn apply_budget_change(
        &self,
        campaign_id: &CampaignId,
        new_budget_micros: i64,
        confidence: u8,
        reason: &str,
    ) -> Result<CampaignChange, AdpilotError> {
        self.apply(
            campaign_id,
            CampaignMutation::Budget { new_budget_micros },
            confidence,
            reason,
        )
        .await
    }

    pub async fn apply_status_change(
        &self,
        campaign_id: &CampaignId,
        new_status: CampaignStatus,
        confidence: u8,
        reason: &str,
    ) -> Result<CampaignChange, AdpilotError> {
        self.apply(
            campaign_id,
            CampaignMutation::Status { new_status },
            confidence,
            reason,
        )
        .await
    }

    pub async fn apply_bid_change(
        &self,
        campaign_id: &CampaignId,
        keyword_id: &str,
        new_bid_micros: i64,
        confidence: u8,
        reason: &str,
    ) -> Result<CampaignChange, AdpilotError> {
        self.apply(
            campaign_id,
            CampaignMutation::Bid {
                keyword_id: keyword_id.to_string(),
                new_bid_micros,
            },
            confidence,
            reason,
        )
        .await
    }

    pub async fn apply_negative_keyword(
        &self,
        campaign_id: &CampaignId,
        text: &str,
        match_type: MatchType,
        confidence: u8,
        reason: &str,
    ) -> Result<CampaignChange, AdpilotError> {
        self.apply(
            campaign_id,
            CampaignMutation::NegativeKeyword {
                text: text.to_string(),
                match_type,
            },
            confidence,
            reason,
        )
        .await
    }

    /// Apply an AI recommendation by dispatching on its kind.
    ///
    /// `Keyword` and `Targeting` recommendations have no auto-apply handler
    /// and fail with `UnsupportedChangeType` rather than silently succeed.
    pub async fn apply_recommendation(
        &self,
        rec: Recommendation,
    ) -> Result<CampaignChange, AdpilotError> {
        let Recommendation {
            campaign_id,
            confidence,
            reason,
            kind,
        } = rec;
        let change_type = kind.change_type();
        let mutation = match kind {
            RecommendationKind::Budget { new_budget_micros } => {
                CampaignMutation::Budget { new_budget_micros }
            }
            RecommendationKind::Status { new_status } => CampaignMutation::Status { new_status },
            RecommendationKind::Bid {
                keyword_id,
                new_bid_micros,
            } => CampaignMutation::Bid {
                keyword_id,
                new_bid_micros,
            },
            RecommendationKind::Keyword { .. } | RecommendationKind::Targeting { .. } => {
                let err = AdpilotError::UnsupportedChangeType(change_type);
                deliver(&self.notifier, NotificationEvent::failure(err.to_string())).await;
                return Err(err);
            }
        };
        self.apply(&campaign_id, mutation, confidence, &reason).await
    }

    async fn apply(
        &self,
        campaign_id: &CampaignId,
        mutation: CampaignMutation,
        confidence: u8,
        reason: &str,
    ) -> Result<CampaignChange, AdpilotError> {
        match self
            .apply_inner(campaign_id, &mutation, confidence, reason)
            .await
        {
            Ok(change) => {
                deliver(
                    &self.notifier,
                    NotificationEvent::success(format!(
                        "Applied {} change to campaign {} (now {}).",
                        change.change_type, change.campaign_id, change.new_value
                    )),
                )
                .await;
                Ok(change)
            }
            Err(e) => {
                deliver(&self.notifier, NotificationEvent::failure(e.to_string())).await;
                Err(e)
            }
        }
    }

    async fn apply_inner(
        &self,
        campaign_id: &CampaignId,
        mutation: &CampaignMutation,
        confidence: u8,
        reason: &str,
    ) -> Result<CampaignChange, AdpilotError> {
        self.gate.check(confidence)?;
        let session = require_session(&self.db).await?;
        let customer_id = active_customer(&session)?;

        let lock = self.lock_for(campaign_id);
        let _guard = lock.lock().await;

        // Fresh token per attempt; a retried apply is a new attempt.
        let attempt = Uuid::new_v4().to_string();
        let outcome = match self
            .gateway
            .mutate_campaign(&session, &customer_id, campaign_id, mutation, &attempt)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(campaign_id = %campaign_id, error = %e, "campaign mutation failed");
                return Err(e);
            }
        };

        let change = CampaignChange {
            id: ChangeId(Uuid::new_v4().to_string()),
            campaign_id: campaign_id.clone(),
            change_type: mutation.change_type(),
            previous_value: outcome.previous_value,
            new_value: outcome.applied_value,
            confidence,
            reason: reason.to_string(),
            applied_at: utc_now_iso(),
            status: ChangeStatus::Applied,
        };
        if let Err(e) = self.ledger.append(&change).await {
            error!(
                change_id = %change.id,
                error = %e,
                "change applied on the platform but could not be recorded"
            );
            return Err(e);
        }
        Ok(change)
    }

    /// Revert a previously applied change.
    ///
    /// The ledger row is marked `reverted` in place; no new row is written.
    /// With `revert_compensates` enabled, a compensating mutation restoring
    /// the recorded previous value is issued first, and the row is only
    /// marked once that call succeeds.
    pub async fn revert_change(&self, change_id: &str) -> Result<CampaignChange, AdpilotError> {
        match self.revert_inner(change_id).await {
            Ok(change) => {
                deliver(
                    &self.notifier,
                    NotificationEvent::success(format!(
                        "Reverted {} change to campaign {}.",
                        change.change_type, change.campaign_id
                    )),
                )
                .await;
                Ok(change)
            }
            Err(e) => {
                deliver(&self.notifier, NotificationEvent::failure(e.to_string())).await;
                Err(e)
            }
        }
    }

    async fn revert_inner(&self, change_id: &str) -> Result<CampaignChange, AdpilotError> {
        let Some(mut change) = self.ledger.find(change_id).await? else {
            return Err(AdpilotError::NotFound {
                what: "change".to_string(),
                id: change_id.to_string(),
            });
        };
        if change.status == ChangeStatus::Reverted {
            return Err(AdpilotError::AlreadyReverted {
                id: change_id.to_string(),
            });
        }
        if self.revert_compensates {
            self.compensate(&change).await?;
        }
        if !self.ledger.mark_reverted(change_id).await? {
            // A concurrent revert won the race after our read.
            return Err(AdpilotError::AlreadyReverted {
                id: change_id.to_string(),
            });
        }
        change.status = ChangeStatus::Reverted;
        info!(change_id = %change.id, campaign_id = %change.campaign_id, "change reverted");
        Ok(change)
    }

    /// Issue a mutation restoring the change's recorded previous value.
    ///
    /// Only budget and status rows carry enough information to rebuild the
    /// original mutation; bid rows do not record which keyword they touched
    /// and keyword/targeting rows have no restorable scalar.
    async fn compensate(&self, change: &CampaignChange) -> Result<(), AdpilotError> {
        let Some(previous) = change.previous_value.as_deref() else {
            return Err(AdpilotError::Internal(
                "change has no recorded previous value to restore".to_string(),
            ));
        };
        let mutation = match change.change_type {
            ChangeType::Budget => {
                let micros: i64 = previous.parse().map_err(|_| {
                    AdpilotError::Internal(format!(
                        "recorded previous value `{previous}` is not a budget amount"
                    ))
                })?;
                CampaignMutation::Budget {
                    new_budget_micros: micros,
                }
            }
            ChangeType::Status => {
                let status: CampaignStatus = previous.parse().map_err(|_| {
                    AdpilotError::Internal(format!(
                        "recorded previous value `{previous}` is not a campaign status"
                    ))
                })?;
                CampaignMutation::Status { new_status: status }
            }
            ChangeType::Bid | ChangeType::Keyword | ChangeType::Targeting => {
                return Err(AdpilotError::UnsupportedChangeType(change.change_type));
            }
        };

        let session = require_session(&self.db).await?;
        let customer_id = active_customer(&session)?;
        let lock = self.lock_for(&change.campaign_id);
        let _guard = lock.lock().await;
        let attempt = Uuid::new_v4().to_string();
        self.gateway
            .mutate_campaign(&session, &customer_id, &change.campaign_id, &mutation, &attempt)
            .await?;
        info!(
            change_id = %change.id,
            campaign_id = %change.campaign_id,
            "compensating mutation applied"
        );
        Ok(())
    }

    fn lock_for(&self, campaign_id: &CampaignId) -> Arc<Mutex<()>> {
        self.campaign_locks
            .entry(campaign_id.0.clone())
            .or_default()
            .clone()
    }
}
