// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queueing a request from the command line.
//!
//! Attaches a real [`RequestQueue`] rather than writing the store key
//! directly, so buffered-save semantics and crash recovery run exactly as
//! they do in an embedding application.

use std::path::Path;
use std::sync::Arc;

use relay_core::{Request, RequestQueue, SqliteStore};

use crate::error::{Error, Result};

pub struct SaveArgs {
    pub command: String,
    pub data: Option<String>,
    pub request_id: Option<String>,
    pub persist_ongoing: bool,
}

/// Queue a request and report the new queue length.
pub fn run(state_dir: &Path, args: SaveArgs) -> Result<()> {
    let data = match &args.data {
        Some(text) => serde_json::from_str(text).map_err(Error::InvalidData)?,
        None => serde_json::Value::Null,
    };

    let mut request = Request::new(args.command).with_data(data);
    if let Some(id) = args.request_id {
        request = request.with_request_id(id);
    }
    if args.persist_ongoing {
        request = request.persist_when_ongoing();
    }

    let store = Arc::new(SqliteStore::open(state_dir)?);
    let queue = RequestQueue::new(store.clone());
    // Let the initial deliveries land (and any crash recovery run) before
    // saving, so the save appends to known state instead of buffering.
    store.settle();
    queue.save(request);
    store.settle();

    println!("queued ({} pending)", queue.get_length());
    Ok(())
}

#[cfg(test)]
#[path = "save_tests.rs"]
mod tests;
