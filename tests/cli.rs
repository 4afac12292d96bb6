//! Integration tests for the ticket-desk binary

mod common;

use assert_cmd::Command;
use chrono::Utc;
use common::make_token;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's config and storage
#[allow(deprecated)]
fn ticket_desk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ticket-desk").unwrap();
    cmd.env("TICKET_DESK__STORAGE__PATH", dir.path().join("storage.json"))
        .env("TICKET_DESK__API__BASE_URL", "http://127.0.0.1:9")
        .env_remove("RUST_LOG")
        .arg("--no-color")
        .arg("--config")
        .arg(dir.path().join("ticket-desk.toml"));
    cmd
}

#[test]
fn test_check_valid_token() {
    let dir = TempDir::new().unwrap();
    let token = make_token(Utc::now().timestamp() + 3600);

    ticket_desk(&dir)
        .args(["auth", "check", &token])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token is valid"));
}

#[test]
fn test_check_expired_token_fails() {
    let dir = TempDir::new().unwrap();
    let token = make_token(Utc::now().timestamp() - 10);

    ticket_desk(&dir)
        .args(["auth", "check", &token])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Token is malformed or expired"));
}

#[test]
fn test_check_malformed_token_json() {
    let dir = TempDir::new().unwrap();

    ticket_desk(&dir)
        .args(["--json", "auth", "check", "not-a-token"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"valid\": false"))
        .stdout(predicate::str::contains("\"status\": \"error\""));
}

#[test]
fn test_ticket_list_requires_login() {
    let dir = TempDir::new().unwrap();

    ticket_desk(&dir)
        .args(["tickets", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn test_filters_persist_between_runs() {
    let dir = TempDir::new().unwrap();

    ticket_desk(&dir)
        .args([
            "filters",
            "set",
            "--search",
            "printer",
            "--status",
            "open,on-hold",
            "--buildings",
            "2,5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Filters saved"));

    ticket_desk(&dir)
        .args(["--json", "filters", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"search\": \"printer\""))
        .stdout(predicate::str::contains("open,on_hold"));

    ticket_desk(&dir)
        .args(["filters", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Filters reset to defaults"));
}

#[test]
fn test_invalid_status_filter_is_rejected() {
    let dir = TempDir::new().unwrap();

    ticket_desk(&dir)
        .args(["filters", "set", "--status", "sleeping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status"));
}

#[test]
fn test_login_then_logout() {
    let dir = TempDir::new().unwrap();
    let token = make_token(Utc::now().timestamp() + 3600);

    ticket_desk(&dir)
        .args(["auth", "login", &token])
        .assert()
        .success();
    assert!(dir.path().join("storage.json").exists());

    ticket_desk(&dir).args(["auth", "logout"]).assert().success();
}

#[test]
fn test_config_shows_environment_override() {
    let dir = TempDir::new().unwrap();

    ticket_desk(&dir)
        .args(["--json", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://127.0.0.1:9"));
}
