// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "relay")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and manage the offline request queue")]
#[command(
    long_about = "Inspect and manage the offline request queue.\n\n\
    Requests are queued in a durable store and drained in submission order; \
    a request in flight when the process dies is rolled back to the front of \
    the queue on the next start."
)]
pub struct Cli {
    /// Use <path> as the state directory instead of the default
    #[arg(long = "state-dir", global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show pending count, ongoing slot, and last-updated timestamps
    Status {
        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// List pending requests in processing order, plus the ongoing slot
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Queue a request for later processing
    Save {
        /// Command identifier of the request
        #[arg(long, value_parser = non_empty_string)]
        command: String,

        /// JSON payload for the request
        #[arg(long, value_name = "json")]
        data: Option<String>,

        /// Correlation identifier for related requests
        #[arg(long = "request-id", value_name = "id")]
        request_id: Option<String>,

        /// Persist the in-flight state so a crash mid-flight is recoverable
        #[arg(long = "persist-ongoing")]
        persist_ongoing: bool,
    },

    /// Reset both store keys and all in-memory queue state (debug tool)
    Clear,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
