// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `relay clear` command.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn relay() -> Command {
    cargo_bin_cmd!("relay")
}

fn state_dir() -> TempDir {
    TempDir::new().unwrap()
}

#[test]
fn clear_on_a_fresh_store_succeeds() {
    let temp = state_dir();
    relay()
        .arg("clear")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared"));
}

#[test]
fn clear_empties_the_queue() {
    let temp = state_dir();
    for command in ["a", "b"] {
        relay()
            .arg("save")
            .arg("--command")
            .arg(command)
            .arg("--state-dir")
            .arg(temp.path())
            .assert()
            .success();
    }

    relay()
        .arg("clear")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success();

    relay()
        .arg("status")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 0"))
        .stdout(predicate::str::contains("Ongoing: none"));
}

#[test]
fn clear_recovers_a_corrupt_queue_entry() {
    let temp = state_dir();
    relay()
        .arg("save")
        .arg("--command")
        .arg("a")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success();

    let conn = rusqlite::Connection::open(temp.path().join("relay.db")).unwrap();
    conn.execute(
        "UPDATE kv SET value = '\"not a queue\"' WHERE key = 'pending_requests'",
        [],
    )
    .unwrap();
    drop(conn);

    relay()
        .arg("status")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .failure();

    relay()
        .arg("clear")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success();

    relay()
        .arg("status")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 0"));
}
