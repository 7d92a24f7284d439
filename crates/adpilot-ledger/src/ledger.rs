// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only ledger of applied campaign changes.
//!
//! Every successful mutation is recorded with its confidence, reasoning,
//! and the value it replaced. Rows are never deleted; reverting a change
//! flips its status to `reverted` in place, so the history stays complete.

use adpilot_core::types::{
    CampaignChange, CampaignId, ChangeId, ChangeStatus, ChangeType,
};
use adpilot_core::AdpilotError;
use rusqlite::params;
use tracing::info;

/// Convert a tokio-rusqlite error into AdpilotError::Storage.
fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> AdpilotError {
    AdpilotError::Storage {
        source: Box::new(e),
    }
}

fn row_to_change(row: &rusqlite::Row<'_>) -> Result<CampaignChange, rusqlite::Error> {
    let change_type: String = row.get(2)?;
    let change_type = change_type.parse::<ChangeType>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let status: String = row.get(8)?;
    let status = status.parse::<ChangeStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(CampaignChange {
        id: ChangeId(row.get(0)?),
        campaign_id: CampaignId(row.get(1)?),
        change_type,
        previous_value: row.get(3)?,
        new_value: row.get(4)?,
        confidence: row.get(5)?,
        reason: row.get(6)?,
        applied_at: row.get(7)?,
        status,
    })
}

/// Persistent change ledger backed by SQLite.
///
/// Records are written to the `change_ledger` table (created by the store's
/// V2 migration). All operations go through the single tokio-rusqlite
/// background thread.
#[derive(Clone)]
pub struct ChangeLedger {
    conn: tokio_rusqlite::Connection,
}

impl ChangeLedger {
    /// Create a new change ledger using the given tokio-rusqlite connection.
    pub fn new(conn: tokio_rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Open a change ledger from a database file path.
    ///
    /// Creates its own tokio-rusqlite connection to the given path.
    /// The change_ledger table must already exist (created by store migrations).
    pub async fn open(path: &str) -> Result<Self, AdpilotError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| AdpilotError::Storage {
                source: Box::new(e),
            })?;
        Ok(Self::new(conn))
    }

    /// Append a change record to the ledger.
    pub async fn append(&self, change: &CampaignChange) -> Result<(), AdpilotError> {
        let id = change.id.0.clone();
        let campaign_id = change.campaign_id.0.clone();
        let change_type = change.change_type.to_string();
        let previous_value = change.previous_value.clone();
        let new_value = change.new_value.clone();
        let confidence = change.confidence;
        let reason = change.reason.clone();
        let applied_at = change.applied_at.clone();
        let status = change.status.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO change_ledger (id, campaign_id, change_type, previous_value, \
                     new_value, confidence, reason, applied_at, status) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        id,
                        campaign_id,
                        change_type,
                        previous_value,
                        new_value,
                        confidence,
                        reason,
                        applied_at,
                        status,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        info!(
            change_id = %change.id,
            campaign_id = %change.campaign_id,
            change_type = %change.change_type,
            confidence = change.confidence,
            "change recorded"
        );

        Ok(())
    }

    /// List changes, newest first, optionally limited.
    pub async fn list(&self, limit: Option<u32>) -> Result<Vec<CampaignChange>, AdpilotError> {
        self.conn
            .call(move |conn| {
                let mut changes = Vec::new();
                match limit {
                    Some(lim) => {
                        let mut stmt = conn.prepare(
                            "SELECT id, campaign_id, change_type, previous_value, new_value, \
                             confidence, reason, applied_at, status \
                             FROM change_ledger ORDER BY applied_at DESC, rowid DESC LIMIT ?1",
                        )?;
                        let rows = stmt.query_map(params![lim], row_to_change)?;
                        for row in rows {
                            changes.push(row?);
                        }
                    }
                    None => {
                        let mut stmt = conn.prepare(
                            "SELECT id, campaign_id, change_type, previous_value, new_value, \
                             confidence, reason, applied_at, status \
                             FROM change_ledger ORDER BY applied_at DESC, rowid DESC",
                        )?;
                        let rows = stmt.query_map([], row_to_change)?;
                        for row in rows {
                            changes.push(row?);
                        }
                    }
                }
                Ok(changes)
            })
            .await
            .map_err(map_tr_err)
    }

    /// Find a single change by id.
    pub async fn find(&self, id: &str) -> Result<Option<CampaignChange>, AdpilotError> {
        let id = id.to_string();
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, campaign_id, change_type, previous_value, new_value, \
                     confidence, reason, applied_at, status \
                     FROM change_ledger WHERE id = ?1",
                )?;
                let result = stmt.query_row(params![id], row_to_change);
                match result {
                    Ok(change) => Ok(Some(change)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    /// Mark an applied change as reverted, in place.
    ///
    /// Returns false when no row moved, either because the id is unknown or
    /// because the change was not in the `applied` state. The guard in the
    /// WHERE clause makes a concurrent double revert lose cleanly.
    pub async fn mark_reverted(&self, id: &str) -> Result<bool, AdpilotError> {
        let id = id.to_string();
        let sql_id = id.clone();
        let marked = self
            .conn
            .call(move |conn| {
                let affected = conn.execute(
                    "UPDATE change_ledger SET status = 'reverted' \
                     WHERE id = ?1 AND status = 'applied'",
                    params![sql_id],
                )?;
                Ok(affected > 0)
            })
            .await
            .map_err(map_tr_err)?;

        if marked {
            info!(change_id = %id, "change marked reverted");
        }
        Ok(marked)
    }

    /// Total number of recorded changes, reverted ones included.
    pub async fn count(&self) -> Result<u64, AdpilotError> {
        self.conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM change_ledger", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(map_tr_err)
    }
}
