// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the relay CLI.

use thiserror::Error;

/// All possible errors that can occur in relay CLI operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Core(#[from] relay_core::Error),

    #[error(
        "invalid JSON for --data: {0}\n  hint: pass a JSON document, e.g. --data '{{\"amount\": 1200}}'"
    )]
    InvalidData(serde_json::Error),

    #[error("corrupted store entry for key '{key}': {source}\n  hint: 'relay clear' resets the store")]
    CorruptedEntry {
        key: String,
        source: serde_json::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for relay CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
