// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform session persistence.
//!
//! The `platform_session` table holds at most one row (id = 1). Saving
//! replaces the previous session wholesale, so a reconnect never leaves
//! stale token or selection state behind.

use adpilot_core::AdpilotError;
use rusqlite::params;

use crate::database::Database;
use crate::models::SessionRow;

/// Persist the session, replacing any existing one.
pub async fn save_session(db: &Database, session: &SessionRow) -> Result<(), AdpilotError> {
    let session = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO platform_session
                 (id, access_token, refresh_token, active_customer_id, selected_account_id, connected_at)
                 VALUES (1, ?1, ?2, ?3, ?4, ?5)",
                params![
                    session.access_token,
                    session.refresh_token,
                    session.active_customer_id,
                    session.selected_account_id,
                    session.connected_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the current session, if one exists.
pub async fn get_session(db: &Database) -> Result<Option<SessionRow>, AdpilotError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT access_token, refresh_token, active_customer_id, selected_account_id, connected_at
                 FROM platform_session WHERE id = 1",
            )?;
            let result = stmt.query_row([], |row| {
                Ok(SessionRow {
                    access_token: row.get(0)?,
                    refresh_token: row.get(1)?,
                    active_customer_id: row.get(2)?,
                    selected_account_id: row.get(3)?,
                    connected_at: row.get(4)?,
                })
            });
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Update the selection pointers on the session row.
///
/// Select writes both; unlinking the selected account clears both. A
/// missing session row makes this a no-op, which callers guard against
/// with their own authentication check.
pub async fn update_selection(
    db: &Database,
    selected_account_id: Option<&str>,
    active_customer_id: Option<&str>,
) -> Result<(), AdpilotError> {
    let selected = selected_account_id.map(|s| s.to_string());
    let active = active_customer_id.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE platform_session
                 SET selected_account_id = ?1, active_customer_id = ?2
                 WHERE id = 1",
                params![selected, active],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete the session and every linked account in one transaction.
///
/// This is the disconnect path. Running it without a session is fine; the
/// deletes simply touch zero rows.
pub async fn delete_session_and_accounts(db: &Database) -> Result<(), AdpilotError> {
    db.connection()
        .call(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM platform_session", [])?;
            tx.execute("DELETE FROM linked_accounts", [])?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
