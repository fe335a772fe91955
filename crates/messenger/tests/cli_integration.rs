//! CLI integration tests for the messenger command-line interface.
//!
//! These tests cover help output, argument parsing and failures that are
//! detected before any request is sent. None of them need a server.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the messenger binary with a clean environment.
fn messenger() -> Command {
    let mut cmd = Command::cargo_bin("messenger").unwrap();
    for var in [
        "MESSENGER_API_TOKEN",
        "MESSENGER_API_TRANSPORT",
        "MESSENGER_API_DOMAIN",
        "MESSENGER_API_VERSION",
        "MESSENGER_API_PORT",
        "MESSENGER_DOWNLOAD_DIR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    messenger()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Messenger chat API"));
}

#[test]
fn test_version_displays() {
    messenger()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("messenger"));
}

#[test]
fn test_help_lists_subcommands() {
    messenger()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("user"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("group"))
        .stdout(predicate::str::contains("download"));
}

#[test]
fn test_help_lists_connection_flags() {
    messenger()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--token"))
        .stdout(predicate::str::contains("--domain"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--download-dir"));
}

#[test]
fn test_chat_help_lists_subcommands() {
    messenger()
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("message"));
}

#[test]
fn test_download_help_lists_subcommands() {
    messenger()
        .args(["download", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("attachment"))
        .stdout(predicate::str::contains("pdf"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument Validation Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_no_subcommand_fails() {
    messenger().assert().failure();
}

#[test]
fn test_unknown_subcommand_fails() {
    messenger()
        .arg("bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_chat_send_requires_body() {
    messenger()
        .args(["chat", "send", "chat-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_port_rejected() {
    messenger()
        .args(["--port", "not-a-port", "user", "get", "u1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_pdf_date_rejected() {
    messenger()
        .args(["download", "pdf", "chat-1", "chat.pdf", "--start", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Local Failure Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_token_fails_before_request() {
    messenger()
        .args(["user", "get", "u1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API token not set"));
}

#[test]
fn test_missing_attachment_fails_before_request() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("nope.txt");

    messenger()
        .args(["--token", "t0k3n", "chat", "send", "chat-1", "hello", "--attach"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("file does not exist"));
}

#[test]
fn test_empty_attachment_fails_before_request() {
    let dir = tempfile::TempDir::new().unwrap();
    let empty = dir.path().join("empty.txt");
    std::fs::write(&empty, b"").unwrap();

    messenger()
        .env("MESSENGER_API_TOKEN", "t0k3n")
        .args(["chat", "send", "--group", "chat-1", "hello", "--attach"])
        .arg(&empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("file is empty"));
}

#[test]
fn test_download_without_token_fails() {
    let dir = tempfile::TempDir::new().unwrap();

    messenger()
        .arg("--download-dir")
        .arg(dir.path())
        .args(["download", "pdf", "--group", "g-1", "chat.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API token not set"));

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_download_attachment_requires_mime() {
    messenger()
        .args(["download", "attachment", "chat-1", "att-1", "photo.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<MIME>"));
}
