// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// The spec files under cli/ are compiled as integration tests of the
// relay CLI crate; see the [[test]] entries in crates/cli/Cargo.toml.
