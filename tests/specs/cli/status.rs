// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `relay status` command.

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

fn save(temp: &TempDir, command: &str) {
    relay()
        .arg("save")
        .arg("--command")
        .arg(command)
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success();
}

#[test]
fn status_on_a_fresh_store_shows_nothing_queued() {
    let temp = state_dir();
    relay()
        .arg("status")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 0"))
        .stdout(predicate::str::contains("Ongoing: none"))
        .stdout(predicate::str::contains("Queue updated: never"));
}

#[test]
fn status_counts_saved_requests() {
    let temp = state_dir();
    save(&temp, "a");
    save(&temp, "b");

    relay()
        .arg("status")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 2"))
        .stdout(predicate::str::contains("Queue updated: never").not());
}

#[test]
fn status_json_has_the_full_shape() {
    let temp = state_dir();
    save(&temp, "a");

    let output = relay()
        .arg("status")
        .arg("--output")
        .arg("json")
        .arg("--state-dir")
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["pending"], 1);
    assert!(value["ongoing"].is_null());
    assert!(value["queue_updated_at"].is_string());
    assert!(value["ongoing_updated_at"].is_null());
}

#[test]
fn status_fails_with_a_hint_when_the_queue_entry_is_corrupt() {
    let temp = state_dir();
    save(&temp, "a");

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
        .failure()
        .stderr(predicate::str::contains("pending_requests"))
        .stderr(predicate::str::contains("relay clear"));
}
