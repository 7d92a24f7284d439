// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linked-account registry: link, unlink, select, and platform listings.

use std::sync::Arc;

use adpilot_core::types::{
    AccountId, AccountStatus, AccountSummary, CustomerId, LinkedAccount, NotificationEvent,
};
use adpilot_core::{AdpilotError, AdsGateway, NotificationSink};
use adpilot_store::queries::{accounts as accounts_store, session as session_store};
use adpilot_store::Database;
use tracing::{info, warn};
use uuid::Uuid;

use crate::session::require_session;
use crate::{deliver, utc_now_iso};

/// Manages which platform accounts are linked and which one is selected.
///
/// Mutation calls always run against the selected account's customer id, so
/// the registry is the executor's source of truth for the working customer.
pub struct AccountRegistry {
    db: Database,
    gateway: Arc<dyn AdsGateway>,
    notifier: Arc<dyn NotificationSink>,
}

impl AccountRegistry {
    pub fn new(
        db: Database,
        gateway: Arc<dyn AdsGateway>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            db,
            gateway,
            notifier,
        }
    }

    /// Query the platform for every account the session can access.
    ///
    /// Read-only; does not touch the linked set and emits no notification.
    pub async fn fetch_accessible_accounts(&self) -> Result<Vec<AccountSummary>, AdpilotError> {
        let session = require_session(&self.db).await?;
        self.gateway.list_accessible_accounts(&session).await
    }

    /// All linked accounts in linking order.
    pub async fn list_linked_accounts(&self) -> Result<Vec<LinkedAccount>, AdpilotError> {
        accounts_store::list_accounts(&self.db).await
    }

    /// The currently selected account, if any.
    pub async fn selected_account(&self) -> Result<Option<LinkedAccount>, AdpilotError> {
        accounts_store::selected_account(&self.db).await
    }

    /// Link a platform account into the registry by its customer id.
    ///
    /// Metadata is enriched from the accessible-accounts listing when the
    /// platform knows the id; manually entered ids fall back to placeholder
    /// metadata. Emits exactly one notification.
    pub async fn link_account(&self, customer_id: &str) -> Result<LinkedAccount, AdpilotError> {
        match self.do_link(customer_id).await {
            Ok(account) => {
                deliver(
                    &self.notifier,
                    NotificationEvent::success(format!(
                        "Linked account {} ({}).",
                        account.customer_id, account.descriptive_name
                    )),
                )
                .await;
                Ok(account)
            }
            Err(e) => {
                deliver(&self.notifier, NotificationEvent::failure(e.to_string())).await;
                Err(e)
            }
        }
    }

    async fn do_link(&self, customer_id: &str) -> Result<LinkedAccount, AdpilotError> {
        let session = require_session(&self.db).await?;
        let summary = match self.gateway.list_accessible_accounts(&session).await {
            Ok(list) => list.into_iter().find(|a| a.customer_id.0 == customer_id),
            Err(e) => {
                warn!(error = %e, "account enrichment failed, using placeholder metadata (non-fatal)");
                None
            }
        };
        let account = match summary {
            Some(s) => LinkedAccount {
                id: AccountId(Uuid::new_v4().to_string()),
                customer_id: s.customer_id,
                descriptive_name: s.descriptive_name,
                currency_code: s.currency_code,
                time_zone: s.time_zone,
                is_manager: s.is_manager,
                can_manage_clients: s.can_manage_clients,
                status: s.status,
                linked_at: utc_now_iso(),
            },
            None => LinkedAccount {
                id: AccountId(Uuid::new_v4().to_string()),
                customer_id: CustomerId(customer_id.to_string()),
                descriptive_name: format!("Account {customer_id}"),
                currency_code: "USD".to_string(),
                time_zone: "UTC".to_string(),
                is_manager: false,
                can_manage_clients: false,
                status: AccountStatus::Enabled,
                linked_at: utc_now_iso(),
            },
        };
        accounts_store::insert_account(&self.db, &account).await?;
        info!(customer_id = %account.customer_id, "account linked");
        Ok(account)
    }

    /// Remove a linked account by its registry id.
    ///
    /// Unlinking the selected account clears the selection and the
    /// session's working customer pointer. Emits exactly one notification.
    pub async fn unlink_account(&self, id: &str) -> Result<(), AdpilotError> {
        match self.do_unlink(id).await {
            Ok(customer_id) => {
                deliver(
                    &self.notifier,
                    NotificationEvent::success(format!("Unlinked account {customer_id}.")),
                )
                .await;
                Ok(())
            }
            Err(e) => {
                deliver(&self.notifier, NotificationEvent::failure(e.to_string())).await;
                Err(e)
            }
        }
    }

    async fn do_unlink(&self, id: &str) -> Result<CustomerId, AdpilotError> {
        let Some(account) = accounts_store::get_account(&self.db, id).await? else {
            return Err(AdpilotError::NotFound {
                what: "account".to_string(),
                id: id.to_string(),
            });
        };
        let was_selected = session_store::get_session(&self.db)
            .await?
            .is_some_and(|row| row.selected_account_id.as_deref() == Some(id));
        if !accounts_store::delete_account(&self.db, id).await? {
            // A concurrent unlink won the race.
            return Err(AdpilotError::NotFound {
                what: "account".to_string(),
                id: id.to_string(),
            });
        }
        if was_selected {
            session_store::update_selection(&self.db, None, None).await?;
        }
        info!(customer_id = %account.customer_id, was_selected, "account unlinked");
        Ok(account.customer_id)
    }

    /// Select a linked account as the working account.
    ///
    /// The selection resolves the session's working customer id; every
    /// campaign mutation runs against it. Emits exactly one notification.
    pub async fn select_account(&self, id: &str) -> Result<LinkedAccount, AdpilotError> {
        match self.do_select(id).await {
            Ok(account) => {
                deliver(
                    &self.notifier,
                    NotificationEvent::success(format!(
                        "Selected account {} ({}).",
                        account.customer_id, account.descriptive_name
                    )),
                )
                .await;
                Ok(account)
            }
            Err(e) => {
                deliver(&self.notifier, NotificationEvent::failure(e.to_string())).await;
                Err(e)
            }
        }
    }

    async fn do_select(&self, id: &str) -> Result<LinkedAccount, AdpilotError> {
        require_session(&self.db).await?;
        let Some(account) = accounts_store::get_account(&self.db, id).await? else {
            return Err(AdpilotError::NotFound {
                what: "account".to_string(),
                id: id.to_string(),
            });
        };
        session_store::update_selection(&self.db, Some(id), Some(&account.customer_id.0)).await?;
        info!(customer_id = %account.customer_id, "account selected");
        Ok(account)
    }
}
