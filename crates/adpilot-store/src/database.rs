// SPDX-FileCopyrightText: 2026 Adpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management.
//!
//! Wraps a single `tokio_rusqlite::Connection`. All queries in this crate
//! funnel through [`Database::connection`], which serializes work on one
//! background thread and keeps SQLite access single-writer.

use std::path::Path;

use tracing::debug;

use adpilot_config::model::StorageConfig;
use adpilot_core::AdpilotError;

use crate::migrations;

/// Map a tokio-rusqlite error into the shared storage error.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> AdpilotError {
    AdpilotError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database.
///
/// Cloning is cheap: clones share the same background connection thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` with WAL mode enabled, then
    /// run any pending migrations.
    pub async fn open(path: &str) -> Result<Self, AdpilotError> {
        Self::open_with_wal(path, true).await
    }

    /// Open the database described by the storage configuration.
    pub async fn open_with_config(config: &StorageConfig) -> Result<Self, AdpilotError> {
        Self::open_with_wal(&config.database_path, config.wal_mode).await
    }

    /// Open an in-memory database with migrations applied. Test use only.
    pub async fn open_in_memory() -> Result<Self, AdpilotError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| AdpilotError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.configure(false).await?;
        db.migrate().await?;
        Ok(db)
    }

    async fn open_with_wal(path: &str, wal_mode: bool) -> Result<Self, AdpilotError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| AdpilotError::Storage {
                source: Box::new(e),
            })?;
        }
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| AdpilotError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.configure(wal_mode).await?;
        db.migrate().await?;
        debug!(path, "database opened");
        Ok(db)
    }

    async fn configure(&self, wal_mode: bool) -> Result<(), AdpilotError> {
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal_mode {
                    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
                }
                conn.execute_batch(
                    "PRAGMA foreign_keys=ON;
                     PRAGMA synchronous=NORMAL;
                     PRAGMA busy_timeout=5000;",
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn migrate(&self) -> Result<(), AdpilotError> {
        self.conn
            .call(|conn| -> Result<Result<(), AdpilotError>, rusqlite::Error> {
                Ok(migrations::run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)?
    }

    /// Returns the underlying connection handle for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL. The connection itself closes when the last clone
    /// of this handle is dropped.
    pub async fn close(&self) -> Result<(), AdpilotError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}
