// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `relay save` command.

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

fn pending(temp: &TempDir) -> Vec<serde_json::Value> {
    let output = relay()
        .arg("list")
        .arg("--output")
        .arg("json")
        .arg("--state-dir")
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["pending"].as_array().unwrap().clone()
}

#[test]
fn save_reports_the_new_queue_length() {
    let temp = state_dir();
    relay()
        .arg("save")
        .arg("--command")
        .arg("write_expense")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("queued (1 pending)"));
}

#[test]
fn saves_append_in_order() {
    let temp = state_dir();
    for command in ["a", "b", "c"] {
        relay()
            .arg("save")
            .arg("--command")
            .arg(command)
            .arg("--state-dir")
            .arg(temp.path())
            .assert()
            .success();
    }

    let queue = pending(&temp);
    let commands: Vec<&str> = queue
        .iter()
        .map(|entry| entry["command"].as_str().unwrap())
        .collect();
    assert_eq!(commands, ["a", "b", "c"]);
}

#[test]
fn save_records_payload_id_and_durability() {
    let temp = state_dir();
    relay()
        .arg("save")
        .arg("--command")
        .arg("write_expense")
        .arg("--data")
        .arg(r#"{"amount": 1200}"#)
        .arg("--request-id")
        .arg("req-1")
        .arg("--persist-ongoing")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success();

    let queue = pending(&temp);
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["data"]["amount"], 1200);
    assert_eq!(queue[0]["request_id"], "req-1");
    assert_eq!(queue[0]["persist_when_ongoing"], true);
}

#[test]
fn invalid_data_is_rejected_with_a_hint() {
    let temp = state_dir();
    relay()
        .arg("save")
        .arg("--command")
        .arg("a")
        .arg("--data")
        .arg("{not json")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON for --data"));
}

#[test]
fn an_empty_command_is_rejected_at_parse_time() {
    let temp = state_dir();
    relay()
        .arg("save")
        .arg("--command")
        .arg("   ")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .failure();
}

#[test]
fn a_concurrent_holder_of_the_store_is_reported() {
    let temp = state_dir();
    // Take the store's exclusive lock the way a running process would.
    let lock = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(temp.path().join("store.lock"))
        .unwrap();
    fs2::FileExt::try_lock_exclusive(&lock).unwrap();

    relay()
        .arg("save")
        .arg("--command")
        .arg("a")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("locked"));
}
