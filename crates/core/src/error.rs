// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for relay-core operations.

use std::path::PathBuf;
use thiserror::Error;

/// All possible errors that can occur in relay-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "no pending requests\n  hint: the queue is empty and nothing is in flight; save() work before processing"
    )]
    NoPendingRequests,

    #[error(
        "state store at '{path}' is locked by another process\n  hint: stop the other relay process, or point this one at a different --state-dir"
    )]
    StoreLocked { path: PathBuf },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for relay-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
