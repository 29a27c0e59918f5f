// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending queue listing.

use std::path::Path;

use relay_core::{Request, SqliteStore};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::error::Result;

/// List pending requests in processing order, plus the ongoing slot.
pub fn run(state_dir: &Path, output: OutputFormat) -> Result<()> {
    let store = SqliteStore::open(state_dir)?;
    let pending = super::load_pending(&store)?;
    let ongoing = super::load_ongoing(&store)?;

    match output {
        OutputFormat::Text => {
            match &ongoing {
                Some(request) => println!("ongoing  {}", describe(request)),
                None => println!("ongoing  (none)"),
            }
            if pending.is_empty() {
                println!("queue    (empty)");
            }
            for (index, request) in pending.iter().enumerate() {
                println!("{:<8} {}", index, describe(request));
            }
        }
        OutputFormat::Json => {
            let value = json!({
                "ongoing": ongoing,
                "pending": pending,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(())
}

fn describe(request: &Request) -> String {
    let mut line = request.command.clone();
    if let Some(id) = &request.request_id {
        line.push_str(&format!(" [{}]", id));
    }
    if request.persist_when_ongoing {
        line.push_str(" (persist)");
    }
    if request.is_rollback {
        line.push_str(" (rollback)");
    }
    line
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
