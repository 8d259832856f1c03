//! Integration tests for the flpimg CLI.
//!
//! These exercise argument handling only; transfers need a drive, which the
//! test environment does not have.

use assert_cmd::Command;
use predicates::prelude::*;

fn flpimg() -> Command {
    Command::cargo_bin("flpimg").unwrap()
}

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    flpimg()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Read/write floppy disk images"))
        .stdout(predicate::str::contains("--boot-sector"))
        .stdout(predicate::str::contains("--verify"));
}

#[test]
fn version_flag() {
    flpimg()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flpimg"));
}

#[test]
fn no_args_is_a_usage_error() {
    flpimg()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn one_operand_is_a_usage_error() {
    flpimg().arg("a:").assert().failure();
}

#[test]
fn two_drive_letters_are_rejected() {
    flpimg()
        .args(["a:", "b:"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("two drive letters"));
}

#[test]
fn two_file_operands_are_rejected() {
    flpimg()
        .args(["one.img", "two.img"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no drive letter"));
}

#[test]
fn missing_drive_fails_with_nonzero_status() {
    // No floppy hardware in the test environment; opening the drive node
    // must fail cleanly rather than hang or panic.
    let dir = tempfile::TempDir::new().unwrap();
    let image = dir.path().join("floppy.img");

    flpimg()
        .args(["q:", image.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
