// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linked-account registry operations.

use adpilot_core::types::{AccountId, AccountStatus, CustomerId, LinkedAccount};
use adpilot_core::AdpilotError;
use rusqlite::params;

use crate::database::Database;

const ACCOUNT_COLUMNS: &str = "id, customer_id, descriptive_name, currency_code, time_zone,
     is_manager, can_manage_clients, status, linked_at";

fn row_to_account(row: &rusqlite::Row<'_>) -> Result<LinkedAccount, rusqlite::Error> {
    let status: String = row.get(7)?;
    let status = status.parse::<AccountStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(LinkedAccount {
        id: AccountId(row.get(0)?),
        customer_id: CustomerId(row.get(1)?),
        descriptive_name: row.get(2)?,
        currency_code: row.get(3)?,
        time_zone: row.get(4)?,
        is_manager: row.get(5)?,
        can_manage_clients: row.get(6)?,
        status,
        linked_at: row.get(8)?,
    })
}

/// Insert a new linked account.
///
/// The duplicate check and the insert run inside one `call` closure, so
/// they are atomic on the single writer thread. The UNIQUE constraint on
/// `customer_id` remains as a backstop.
pub async fn insert_account(db: &Database, account: &LinkedAccount) -> Result<(), AdpilotError> {
    let account = account.clone();
    let customer_id = account.customer_id.0.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            let existing: i64 = conn.query_row(
                "SELECT COUNT(*) FROM linked_accounts WHERE customer_id = ?1",
                params![account.customer_id.0],
                |row| row.get(0),
            )?;
            if existing > 0 {
                return Ok(false);
            }
            conn.execute(
                "INSERT INTO linked_accounts
                 (id, customer_id, descriptive_name, currency_code, time_zone,
                  is_manager, can_manage_clients, status, linked_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    account.id.0,
                    account.customer_id.0,
                    account.descriptive_name,
                    account.currency_code,
                    account.time_zone,
                    account.is_manager,
                    account.can_manage_clients,
                    account.status.to_string(),
                    account.linked_at,
                ],
            )?;
            Ok(true)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if inserted {
        Ok(())
    } else {
        Err(AdpilotError::DuplicateAccount { customer_id })
    }
}

/// Get a linked account by its registry id.
pub async fn get_account(db: &Database, id: &str) -> Result<Option<LinkedAccount>, AdpilotError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM linked_accounts WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_account);
            match result {
                Ok(account) => Ok(Some(account)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all linked accounts in linking order.
pub async fn list_accounts(db: &Database) -> Result<Vec<LinkedAccount>, AdpilotError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM linked_accounts ORDER BY linked_at"
            ))?;
            let rows = stmt.query_map([], row_to_account)?;
            let mut accounts = Vec::new();
            for row in rows {
                accounts.push(row?);
            }
            Ok(accounts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a linked account. Returns false when the id was unknown.
pub async fn delete_account(db: &Database, id: &str) -> Result<bool, AdpilotError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let affected = conn.execute("DELETE FROM linked_accounts WHERE id = ?1", params![id])?;
            Ok(affected > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve the currently selected account through the session pointer.
pub async fn selected_account(db: &Database) -> Result<Option<LinkedAccount>, AdpilotError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM linked_accounts
                 WHERE id = (SELECT selected_account_id FROM platform_session WHERE id = 1)"
            ))?;
            let result = stmt.query_row([], row_to_account);
            match result {
                Ok(account) => Ok(Some(account)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionRow;
    use crate::queries::session;

    fn make_account(id: &str, customer_id: &str) -> LinkedAccount {
        LinkedAccount {
            id: AccountId(id.to_string()),
            customer_id: CustomerId(customer_id.to_string()),
            descriptive_name: "Acme Corporation".to_string(),
            currency_code: "USD".to_string(),
            time_zone: "America/New_York".to_string(),
            is_manager: false,
            can_manage_clients: false,
            status: AccountStatus::Enabled,
            linked_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn insert_and_get_account_roundtrips() {
        let db = setup_db().await;
        let account = make_account("a1", "999-000-1111");

        insert_account(&db, &account).await.unwrap();
        let retrieved = get_account(&db, "a1").await.unwrap().unwrap();
        assert_eq!(retrieved, account);
    }

    #[tokio::test]
    async fn get_unknown_account_returns_none() {
        let db = setup_db().await;
        assert!(get_account(&db, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_customer_id_is_rejected() {
        let db = setup_db().await;
        insert_account(&db, &make_account("a1", "999-000-1111"))
            .await
            .unwrap();

        let err = insert_account(&db, &make_account("a2", "999-000-1111"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AdpilotError::DuplicateAccount { ref customer_id } if customer_id == "999-000-1111"
        ));

        // The failed insert must not grow the registry.
        let all = list_accounts(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id.0, "a1");
    }

    #[tokio::test]
    async fn list_returns_accounts_in_linking_order() {
        let db = setup_db().await;
        let mut first = make_account("a1", "111-111-1111");
        first.linked_at = "2026-01-01T00:00:00.000Z".to_string();
        let mut second = make_account("a2", "222-222-2222");
        second.linked_at = "2026-01-02T00:00:00.000Z".to_string();

        insert_account(&db, &second).await.unwrap();
        insert_account(&db, &first).await.unwrap();

        let all = list_accounts(&db).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id.0, "a1");
        assert_eq!(all[1].id.0, "a2");
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let db = setup_db().await;
        insert_account(&db, &make_account("a1", "999-000-1111"))
            .await
            .unwrap();

        assert!(delete_account(&db, "a1").await.unwrap());
        assert!(!delete_account(&db, "a1").await.unwrap());
        assert!(get_account(&db, "a1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn selected_account_follows_the_session_pointer() {
        let db = setup_db().await;
        let account = make_account("a1", "999-000-1111");
        insert_account(&db, &account).await.unwrap();
        session::save_session(
            &db,
            &SessionRow {
                access_token: "tok".to_string(),
                refresh_token: None,
                active_customer_id: None,
                selected_account_id: None,
                connected_at: "2026-01-01T00:00:00.000Z".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(selected_account(&db).await.unwrap().is_none());

        session::update_selection(&db, Some("a1"), Some("999-000-1111"))
            .await
            .unwrap();
        let selected = selected_account(&db).await.unwrap().unwrap();
        assert_eq!(selected.id.0, "a1");
    }

    #[tokio::test]
    async fn status_column_roundtrips_every_variant() {
        let db = setup_db().await;
        let statuses = [
            AccountStatus::Enabled,
            AccountStatus::Suspended,
            AccountStatus::Cancelled,
            AccountStatus::Pending,
        ];
        for (i, status) in statuses.iter().enumerate() {
            let mut account = make_account(&format!("a{i}"), &format!("{i}00-000-000{i}"));
            account.status = *status;
            insert_account(&db, &account).await.unwrap();
            let retrieved = get_account(&db, &format!("a{i}")).await.unwrap().unwrap();
            assert_eq!(retrieved.status, *status);
        }
    }
}
