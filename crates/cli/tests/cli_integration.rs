//! CLI integration tests.
//!
//! Uses `assert_cmd` to spawn the `bento` binary and verify exit codes
//! and stderr content. Every test pins HOME and the session directory
//! to a temp dir so no real user state is read or written, and no test
//! reaches a live server: they exercise configuration resolution and
//! the local precondition checks that run before any network call.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper: a `bento` command isolated from the caller's environment.
fn bento(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("bento");
    cmd.env_clear()
        .env("HOME", home.path())
        .env("BENTO_SESSION_DIR", home.path().join("session"));
    cmd
}

// ──────────────────────────────────────────────
// Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Bento school financial reporting client",
        ));
}

#[test]
fn version_exits_0() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bento"));
}

#[test]
fn set_status_help_documents_the_target_flag() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .args(["set-status", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--to"));
}

// ──────────────────────────────────────────────
// Configuration resolution
// ──────────────────────────────────────────────

#[test]
fn missing_server_configuration_is_a_hard_error() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .args([
            "transitions", "--kind", "daily", "--school", "1", "--year", "2025", "--month", "6",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no server configured"));
}

#[test]
fn server_can_come_from_the_config_file() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join(".config").join("bento");
    std::fs::create_dir_all(&config_dir).unwrap();
    // Unroutable address: resolution succeeds, the request itself fails.
    std::fs::write(config_dir.join("config.toml"), "server = \"http://127.0.0.1:1\"\n").unwrap();

    bento(&home)
        .args([
            "transitions", "--kind", "daily", "--school", "1", "--year", "2025", "--month", "6",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no server configured").not());
}

// ──────────────────────────────────────────────
// Local preconditions (no network call involved)
// ──────────────────────────────────────────────

#[test]
fn liquidation_without_category_fails_before_any_request() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .args([
            "--server", "http://127.0.0.1:1",
            "set-status", "--kind", "liquidation", "--school", "9", "--year", "2025",
            "--month", "3", "--to", "review", "--yes",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("category"));
}

#[test]
fn unknown_report_kind_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .args([
            "--server", "http://127.0.0.1:1",
            "transitions", "--kind", "weekly", "--school", "1", "--year", "2025", "--month", "6",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown report kind"));
}

#[test]
fn unknown_target_status_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .args([
            "--server", "http://127.0.0.1:1",
            "set-status", "--kind", "daily", "--school", "1", "--year", "2025",
            "--month", "6", "--to", "pending", "--yes",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown report status"));
}

#[test]
fn month_out_of_range_is_rejected_locally() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .args([
            "--server", "http://127.0.0.1:1",
            "transitions", "--kind", "daily", "--school", "1", "--year", "2025", "--month", "13",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid month"));
}

// ──────────────────────────────────────────────
// Logout
// ──────────────────────────────────────────────

#[test]
fn logout_with_no_session_succeeds() {
    let home = TempDir::new().unwrap();
    bento(&home)
        .args(["--server", "http://127.0.0.1:1", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("logged out"));
}
