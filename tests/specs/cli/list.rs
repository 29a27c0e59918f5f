// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for the `relay list` command.

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

fn save(temp: &TempDir, args: &[&str]) {
    relay()
        .args(args)
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success();
}

#[test]
fn list_on_a_fresh_store_shows_an_empty_queue() {
    let temp = state_dir();
    relay()
        .arg("list")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("ongoing  (none)"))
        .stdout(predicate::str::contains("queue    (empty)"));
}

#[test]
fn list_shows_requests_in_processing_order() {
    let temp = state_dir();
    save(&temp, &["save", "--command", "first"]);
    save(&temp, &["save", "--command", "second"]);

    let output = relay()
        .arg("list")
        .arg("--state-dir")
        .arg(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.find("first").unwrap();
    let second = stdout.find("second").unwrap();
    assert!(first < second);
}

#[test]
fn list_marks_request_traits() {
    let temp = state_dir();
    save(
        &temp,
        &[
            "save",
            "--command",
            "sync",
            "--request-id",
            "r-9",
            "--persist-ongoing",
        ],
    );

    relay()
        .arg("list")
        .arg("--state-dir")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("sync [r-9] (persist)"));
}

#[test]
fn list_json_carries_ongoing_and_pending() {
    let temp = state_dir();
    save(&temp, &["save", "--command", "a"]);

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
    assert!(value["ongoing"].is_null());
    assert_eq!(value["pending"].as_array().unwrap().len(), 1);
    assert_eq!(value["pending"][0]["command"], "a");
}
