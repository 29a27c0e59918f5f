// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! State directory resolution.
//!
//! Resolution order: `--state-dir` flag, then `RELAY_STATE_DIR`, then the
//! XDG state directory (`~/.local/state/relay`).

use std::path::{Path, PathBuf};

/// Environment variable overriding the state directory.
pub const STATE_DIR_ENV: &str = "RELAY_STATE_DIR";

/// Resolves the state directory from the flag, the environment, or XDG.
pub fn resolve_state_dir(flag: Option<&Path>) -> PathBuf {
    if let Some(dir) = flag {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(STATE_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    if let Some(dir) = dirs::state_dir() {
        return dir.join("relay");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/relay"))
        .unwrap_or_else(|| PathBuf::from(".local/state/relay"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
