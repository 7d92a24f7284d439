// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform session lifecycle: connect, disconnect, connection probes.

use std::sync::Arc;

use adpilot_config::model::GoogleAdsConfig;
use adpilot_core::types::{AccountSummary, CustomerId, NotificationEvent, PlatformSession};
use adpilot_core::{AdpilotError, AdsGateway, NotificationSink};
use adpilot_googleads::AuthorizeUrl;
use adpilot_store::models::SessionRow;
use adpilot_store::queries::session as session_store;
use adpilot_store::Database;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::{deliver, utc_now_iso};

/// Wrap a stored session row into the in-memory session handed to the
/// gateway. Token text crosses into `SecretString` at this boundary.
pub(crate) fn to_platform_session(row: &SessionRow) -> PlatformSession {
    PlatformSession {
        access_token: SecretString::from(row.access_token.clone()),
        refresh_token: row.refresh_token.clone().map(SecretString::from),
        connected_at: row.connected_at.clone(),
        active_customer_id: row.active_customer_id.clone().map(CustomerId),
    }
}

/// Load the persisted session or fail with `NotAuthenticated`.
pub(crate) async fn require_session(db: &Database) -> Result<PlatformSession, AdpilotError> {
    let Some(row) = session_store::get_session(db).await? else {
        return Err(AdpilotError::NotAuthenticated);
    };
    Ok(to_platform_session(&row))
}

/// Manages the single platform connection.
///
/// At most one session exists per installation. Connect replaces any
/// previous session wholesale; disconnect tears down the session together
/// with every linked account.
pub struct SessionService {
    db: Database,
    gateway: Arc<dyn AdsGateway>,
    notifier: Arc<dyn NotificationSink>,
    googleads: GoogleAdsConfig,
}

impl SessionService {
    pub fn new(
        db: Database,
        gateway: Arc<dyn AdsGateway>,
        notifier: Arc<dyn NotificationSink>,
        googleads: GoogleAdsConfig,
    ) -> Self {
        Self {
            db,
            gateway,
            notifier,
            googleads,
        }
    }

    /// Whether a platform connection currently exists.
    pub async fn is_configured(&self) -> Result<bool, AdpilotError> {
        Ok(session_store::get_session(&self.db).await?.is_some())
    }

    /// The live session, if one exists.
    pub async fn current_session(&self) -> Result<Option<PlatformSession>, AdpilotError> {
        Ok(session_store::get_session(&self.db)
            .await?
            .as_ref()
            .map(to_platform_session))
    }

    /// Build the OAuth consent URL the user opens in a browser.
    pub fn authorize_url(&self) -> Result<AuthorizeUrl, AdpilotError> {
        adpilot_googleads::authorize_url(&self.googleads)
    }

    /// Exchange an OAuth authorization code for a session.
    ///
    /// Returns the accessible accounts reported by the platform at connect
    /// time. Emits exactly one notification, success or failure.
    pub async fn connect(&self, auth_code: &str) -> Result<Vec<AccountSummary>, AdpilotError> {
        match self.establish(auth_code).await {
            Ok(accounts) => {
                deliver(
                    &self.notifier,
                    NotificationEvent::success(format!(
                        "Connected to Google Ads. {} accounts accessible.",
                        accounts.len()
                    )),
                )
                .await;
                Ok(accounts)
            }
            Err(e) => {
                deliver(&self.notifier, NotificationEvent::failure(e.to_string())).await;
                Err(e)
            }
        }
    }

    async fn establish(&self, auth_code: &str) -> Result<Vec<AccountSummary>, AdpilotError> {
        let tokens = self.gateway.exchange_auth_code(auth_code).await?;
        let session = PlatformSession {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            connected_at: utc_now_iso(),
            active_customer_id: None,
        };
        // Listing runs before anything is persisted, so a connect that
        // cannot reach the account list leaves no half-connected state.
        let accounts = self.gateway.list_accessible_accounts(&session).await?;
        let row = SessionRow {
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            active_customer_id: None,
            selected_account_id: None,
            connected_at: session.connected_at.clone(),
        };
        session_store::save_session(&self.db, &row).await?;
        info!(accounts = accounts.len(), "platform connection established");
        Ok(accounts)
    }

    /// Tear down the session and every linked account in one transaction.
    ///
    /// Idempotent: disconnecting without a session is a no-op, not an
    /// error. Emits exactly one notification.
    pub async fn disconnect(&self) -> Result<(), AdpilotError> {
        let result = session_store::delete_session_and_accounts(&self.db).await;
        match &result {
            Ok(()) => {
                info!("platform connection removed");
                deliver(
                    &self.notifier,
                    NotificationEvent::success("Disconnected from Google Ads."),
                )
                .await;
            }
            Err(e) => {
                deliver(&self.notifier, NotificationEvent::failure(e.to_string())).await;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use adpilot_core::NotificationKind;
    use adpilot_test_utils::{MockAdsGateway, RecordingNotifier};

    use super::*;

    async fn setup() -> (SessionService, Arc<MockAdsGateway>, Arc<RecordingNotifier>) {
        let db = Database::open_in_memory().await.unwrap();
        let gateway = Arc::new(MockAdsGateway::with_accounts(
            adpilot_test_utils::sample_accounts(),
        ));
        let notifier = Arc::new(RecordingNotifier::new());
        let service = SessionService::new(
            db,
            gateway.clone(),
            notifier.clone(),
            GoogleAdsConfig::default(),
        );
        (service, gateway, notifier)
    }

    #[tokio::test]
    async fn connect_persists_a_session_and_returns_the_accounts() {
        let (service, gateway, notifier) = setup().await;

        assert!(!service.is_configured().await.unwrap());
        let accounts = service.connect("auth-code-123").await.unwrap();

        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].customer_id.0, "999-000-1111");
        assert!(service.is_configured().await.unwrap());
        assert_eq!(gateway.exchanged_codes().await, vec!["auth-code-123"]);

        let session = service.current_session().await.unwrap().unwrap();
        assert_eq!(session.access_token.expose_secret(), "ya29.mock-access");
        assert!(session.active_customer_id.is_none());

        let events = notifier.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NotificationKind::Success);
        assert_eq!(
            events[0].message,
            "Connected to Google Ads. 3 accounts accessible."
        );
    }

    #[tokio::test]
    async fn failed_code_exchange_leaves_no_session_behind() {
        let (service, gateway, notifier) = setup().await;
        gateway
            .queue_exchange_failure(AdpilotError::Platform {
                message: "invalid_grant".to_string(),
                source: None,
            })
            .await;

        let err = service.connect("expired-code").await.unwrap_err();
        assert!(matches!(err, AdpilotError::Platform { .. }));
        assert!(!service.is_configured().await.unwrap());

        let events = notifier.events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NotificationKind::Failure);
    }

    #[tokio::test]
    async fn failed_account_listing_aborts_the_connect() {
        let (service, gateway, _notifier) = setup().await;
        gateway
            .queue_listing_failure(AdpilotError::Platform {
                message: "listing unavailable".to_string(),
                source: None,
            })
            .await;

        service.connect("auth-code").await.unwrap_err();
        // The exchange succeeded but nothing may be persisted.
        assert!(!service.is_configured().await.unwrap());
        assert!(service.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reconnect_replaces_the_previous_session() {
        let (service, _gateway, _notifier) = setup().await;
        service.connect("first-code").await.unwrap();
        let first = service.current_session().await.unwrap().unwrap();

        service.connect("second-code").await.unwrap();
        let second = service.current_session().await.unwrap().unwrap();

        // Same mock token text, but the connect timestamp moves forward
        // (or at worst stays equal within timer resolution).
        assert!(second.connected_at >= first.connected_at);
        assert!(service.is_configured().await.unwrap());
    }

    #[tokio::test]
    async fn disconnect_clears_the_session_and_is_idempotent() {
        let (service, _gateway, notifier) = setup().await;
        service.connect("auth-code").await.unwrap();
        notifier.clear().await;

        service.disconnect().await.unwrap();
        assert!(!service.is_configured().await.unwrap());

        // Second disconnect is a no-op, not an error.
        service.disconnect().await.unwrap();

        let events = notifier.events().await;
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| e.message == "Disconnected from Google Ads."));
    }

    #[tokio::test]
    async fn notification_failures_do_not_fail_the_operation() {
        let db = Database::open_in_memory().await.unwrap();
        let gateway = Arc::new(MockAdsGateway::with_accounts(
            adpilot_test_utils::sample_accounts(),
        ));
        let notifier = Arc::new(RecordingNotifier::failing());
        let service = SessionService::new(
            db,
            gateway,
            notifier.clone(),
            GoogleAdsConfig::default(),
        );

        service.connect("auth-code").await.unwrap();
        assert!(service.is_configured().await.unwrap());
        // The sink still saw the event even though delivery failed.
        assert_eq!(notifier.event_count().await, 1);
    }

    #[tokio::test]
    async fn authorize_url_requires_oauth_config() {
        let (service, _gateway, _notifier) = setup().await;
        // Default config carries no client id.
        let err = service.authorize_url().unwrap_err();
        assert!(matches!(err, AdpilotError::NotConfigured(_)));
    }
}
