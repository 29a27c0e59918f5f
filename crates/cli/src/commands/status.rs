// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue status overview.

use std::path::Path;

use chrono::{DateTime, Utc};
use relay_core::{keys, SqliteStore};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::error::Result;

/// Show pending count, ongoing presence, and per-key last-updated times.
pub fn run(state_dir: &Path, output: OutputFormat) -> Result<()> {
    let store = SqliteStore::open(state_dir)?;
    let pending = super::load_pending(&store)?;
    let ongoing = super::load_ongoing(&store)?;
    let queue_updated = store.updated_at(keys::PENDING_REQUESTS)?;
    let ongoing_updated = store.updated_at(keys::ONGOING_REQUEST)?;

    match output {
        OutputFormat::Text => {
            println!("Pending: {}", pending.len());
            match &ongoing {
                Some(request) => println!("Ongoing: {}", request.command),
                None => println!("Ongoing: none"),
            }
            println!("Queue updated: {}", format_stamp(queue_updated));
            println!("Ongoing updated: {}", format_stamp(ongoing_updated));
        }
        OutputFormat::Json => {
            let value = json!({
                "pending": pending.len(),
                "ongoing": ongoing,
                "queue_updated_at": queue_updated.map(|t| t.to_rfc3339()),
                "ongoing_updated_at": ongoing_updated.map(|t| t.to_rfc3339()),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn format_stamp(stamp: Option<DateTime<Utc>>) -> String {
    match stamp {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "never".to_string(),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
