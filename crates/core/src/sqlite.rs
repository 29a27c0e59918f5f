// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed state store.
//!
//! Values live in a single `kv` table; every write lands synchronously
//! before subscribers are notified, so anything a callback observes is
//! already durable. An exclusive lock file in the state directory enforces
//! one process per store: notifications are delivered in-process only, and
//! a second process attached to the same files would observe writes without
//! them.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::notify::NotifierHub;
use crate::store::{merge_values, StateStore, StoreCallback, SubscriptionId};

/// SQL schema for the state store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;

/// Database filename within the state directory.
const DB_NAME: &str = "relay.db";
/// Lock filename for the single-process guarantee.
const LOCK_NAME: &str = "store.lock";

/// A durable [`StateStore`] over a SQLite database in a state directory.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    hub: NotifierHub,
    /// Held for the lifetime of the store; releasing it frees the directory
    /// for the next process.
    _lock: std::fs::File,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Opens (creating if needed) the store in `state_dir`.
    ///
    /// Fails with [`Error::StoreLocked`] if another process holds the store.
    pub fn open(state_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(state_dir)?;
        let lock = acquire_lock(state_dir)?;

        let conn = Connection::open(state_dir.join(DB_NAME))?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(SqliteStore {
            conn: Mutex::new(conn),
            hub: NotifierHub::new(),
            _lock: lock,
        })
    }

    /// Blocks until all queued notifications (and their cascades) have been
    /// delivered.
    pub fn settle(&self) {
        self.hub.settle();
    }

    /// When the value of `key` was last written, if the key is set.
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let conn = self.lock_conn();
        let row: Option<String> = conn
            .query_row("SELECT updated_at FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        match row {
            None => Ok(None),
            Some(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(|_| {
                    Error::CorruptedData(format!("invalid timestamp '{text}' for key '{key}'"))
                }),
        }
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_row(conn: &Connection, key: &str, value: &Value) -> Result<()> {
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, serde_json::to_string(value)?, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn read_row(conn: &Connection, key: &str) -> Result<Option<Value>> {
        let row: Option<String> = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        match row {
            None => Ok(None),
            Some(text) => Ok(Some(serde_json::from_str(&text).map_err(|_| {
                Error::CorruptedData(format!("invalid JSON stored for key '{key}'"))
            })?)),
        }
    }
}

fn acquire_lock(state_dir: &Path) -> Result<std::fs::File> {
    use fs2::FileExt;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(state_dir.join(LOCK_NAME))?;
    file.try_lock_exclusive().map_err(|_| Error::StoreLocked {
        path: state_dir.to_path_buf(),
    })?;
    Ok(file)
}

impl StateStore for SqliteStore {
    fn set(&self, key: &str, value: Option<Value>) -> Result<()> {
        {
            let conn = self.lock_conn();
            match &value {
                Some(v) => SqliteStore::write_row(&conn, key, v)?,
                None => {
                    conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
                }
            }
        }
        self.hub.publish(key, value);
        Ok(())
    }

    fn merge(&self, key: &str, partial: Value) -> Result<()> {
        let merged = {
            let mut conn = self.lock_conn();
            let tx = conn.transaction()?;
            let current = SqliteStore::read_row(&tx, key)?;
            let merged = merge_values(current, partial);
            SqliteStore::write_row(&tx, key, &merged)?;
            tx.commit()?;
            merged
        };
        self.hub.publish(key, Some(merged));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let conn = self.lock_conn();
        SqliteStore::read_row(&conn, key)
    }

    fn subscribe(&self, key: &str, callback: StoreCallback) -> SubscriptionId {
        let current = match self.get(key) {
            Ok(current) => current,
            Err(e) => {
                tracing::warn!(key, error = %e, "initial read failed; delivering unset");
                None
            }
        };
        self.hub.subscribe(key, callback, current)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.hub.unsubscribe(id);
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
