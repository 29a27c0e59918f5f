// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! relayrs - Library behind the `relay` CLI.
//!
//! The `relay` binary is an operator and debug tool over the durable
//! request queue in [`relay_core`]: it shows queue status, lists pending
//! requests, queues new ones, and resets the store. State lives in a
//! SQLite-backed store in a state directory resolved from the
//! `--state-dir` flag, `RELAY_STATE_DIR`, or the XDG state directory.

mod cli;
mod commands;

pub mod env;
pub mod error;

pub use cli::{Cli, Command, OutputFormat};
pub use error::{Error, Result};

use commands::save::SaveArgs;

/// Run a parsed CLI invocation.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = env::resolve_state_dir(cli.state_dir.as_deref());
    match cli.command {
        Command::Status { output } => commands::status::run(&state_dir, output),
        Command::List { output } => commands::list::run(&state_dir, output),
        Command::Save {
            command,
            data,
            request_id,
            persist_ongoing,
        } => commands::save::run(
            &state_dir,
            SaveArgs {
                command,
                data,
                request_id,
                persist_ongoing,
            },
        ),
        Command::Clear => commands::clear::run(&state_dir),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
