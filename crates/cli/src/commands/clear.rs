// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Resetting the queue store (debug tool).

use std::path::Path;
use std::sync::Arc;

use relay_core::{RequestQueue, SqliteStore};

use crate::error::Result;

/// Reset both store keys and all queue-owned in-memory state.
pub fn run(state_dir: &Path) -> Result<()> {
    let store = Arc::new(SqliteStore::open(state_dir)?);
    let queue = RequestQueue::new(store.clone());
    store.settle();
    queue.clear();
    store.settle();

    println!("cleared");
    Ok(())
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
