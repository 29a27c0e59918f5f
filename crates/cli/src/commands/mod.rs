// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations for the relay CLI.

pub mod clear;
pub mod list;
pub mod save;
pub mod status;

use relay_core::{keys, Request, SqliteStore, StateStore};

use crate::error::{Error, Result};

/// Reads the pending queue directly from the store, in processing order.
fn load_pending(store: &SqliteStore) -> Result<Vec<Request>> {
    match store.get(keys::PENDING_REQUESTS)? {
        None => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value).map_err(|source| Error::CorruptedEntry {
            key: keys::PENDING_REQUESTS.to_string(),
            source,
        }),
    }
}

/// Reads the ongoing slot directly from the store.
fn load_ongoing(store: &SqliteStore) -> Result<Option<Request>> {
    match store.get(keys::ONGOING_REQUEST)? {
        None => Ok(None),
        Some(serde_json::Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| Error::CorruptedEntry {
                key: keys::ONGOING_REQUEST.to_string(),
                source,
            }),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
