//! Integration tests for the `kioskhub` CLI binary.
//!
//! Argument parsing, completions and error exit codes run without any
//! tablet. The command round trip runs against a mocked tablet.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `kioskhub` binary with env isolation.
///
/// Clears `KIOSKHUB_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn kioskhub_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("kioskhub");
    cmd.env("HOME", "/tmp/kioskhub-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/kioskhub-cli-test-nonexistent")
        .env_remove("KIOSKHUB_CONFIG")
        .env_remove("KIOSKHUB_PORT")
        .env_remove("KIOSKHUB_TIMEOUT")
        .env_remove("KIOSKHUB_OUTPUT")
        .env_remove("KIOSK_API_KEY");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const ROSTER: &str = r##"
[[devices]]
id = 1
ip = "10.0.0.11"
name = "Lobby"

[[devices]]
id = 2
ip = "10.0.0.12"
name = "Kitchen"

[[groups]]
id = 7
name = "Ground floor"
color = "#00ff00"
members = [1, 2]
"##;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = kioskhub_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    kioskhub_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("FreeKiosk")
            .and(predicate::str::contains("command"))
            .and(predicate::str::contains("monitor"))
            .and(predicate::str::contains("devices")),
    );
}

#[test]
fn test_version_flag() {
    kioskhub_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kioskhub"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    kioskhub_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    kioskhub_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    kioskhub_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = kioskhub_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    kioskhub_cmd()
        .args(["devices", "-o", "xml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_brightness_out_of_range() {
    kioskhub_cmd()
        .args(["command", "--ip", "10.0.0.1", "brightness", "150"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_remote_action_cannot_escape_its_endpoint() {
    let output = kioskhub_cmd()
        .args(["command", "--ip", "127.0.0.1", "--port", "9", "remote", "../reboot"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("remote action"),
        "Expected remote action error:\n{text}"
    );
}

#[test]
fn test_status_without_target() {
    let output = kioskhub_cmd().arg("status").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("No target"), "Expected no-target error:\n{text}");
}

#[test]
fn test_unknown_device_is_not_found() {
    let config = config_file(ROSTER);
    kioskhub_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["command", "--device", "99", "beep"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_invalid_config_exit_code() {
    let config = config_file("[hub]\npoll_interval = 0\n");
    kioskhub_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("devices")
        .assert()
        .failure()
        .code(3);
}

// ── Roster ──────────────────────────────────────────────────────────

#[test]
fn test_devices_empty_without_config() {
    kioskhub_cmd()
        .args(["devices", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_devices_lists_configured_roster() {
    let config = config_file(ROSTER);
    let output = kioskhub_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["devices", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let devices: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = devices
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Lobby", "Kitchen"]);
}

#[test]
fn test_groups_show_members() {
    let config = config_file(ROSTER);
    let output = kioskhub_cmd()
        .arg("--config")
        .arg(config.path())
        .args(["groups", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let groups: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(groups[0]["name"], "Ground floor");
    assert_eq!(groups[0]["members"], json!([1, 2]));
}

// ── Commands against a mocked tablet ────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_beep_by_address() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/audio/beep"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "executed": true, "command": "beep" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let port = server.address().port().to_string();
    let output = tokio::task::spawn_blocking(move || {
        kioskhub_cmd()
            .args(["command", "--ip", "127.0.0.1", "--port", &port, "-o", "json", "beep"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["command"], "beep");
    assert_eq!(
        report["summary"],
        "1/1 devices executed the command successfully"
    );
    assert_eq!(report["results"][0]["ip"], "127.0.0.1");
    assert_eq!(report["results"][0]["success"], true);
}
