//! command line contract tests for the bookworm-server binary

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn no_args_prints_usage_and_fails() {
    Command::cargo_bin("bookworm-server")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("USAGE"));
}

#[test]
fn missing_pattern_prints_usage_and_fails() {
    Command::cargo_bin("bookworm-server")
        .unwrap()
        .args(&["--port", "4000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("USAGE"));
}

#[test]
fn missing_port_prints_usage_and_fails() {
    Command::cargo_bin("bookworm-server")
        .unwrap()
        .args(&["--pattern", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("USAGE"));
}

#[test]
fn unparseable_port_is_rejected() {
    Command::cargo_bin("bookworm-server")
        .unwrap()
        .args(&["--port", "not-a-port", "--pattern", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not parse"));
}

#[test]
fn port_zero_is_rejected() {
    Command::cargo_bin("bookworm-server")
        .unwrap()
        .args(&["--port", "0", "--pattern", "cat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive"));
}

#[test]
fn empty_pattern_is_rejected() {
    Command::cargo_bin("bookworm-server")
        .unwrap()
        .args(&["--port", "4000", "--pattern", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn zero_interval_is_rejected() {
    Command::cargo_bin("bookworm-server")
        .unwrap()
        .args(&["--port", "4000", "--pattern", "cat", "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("interval"));
}
