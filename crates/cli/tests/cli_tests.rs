//! CLI integration tests

use std::process::{Command, Output};

fn dockctl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dockctl"))
        .args(args)
        .env_remove("DOCKBOARD_API_URL")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = dockctl(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Dockboard"), "Should show app name");
    for command in ["images", "containers", "start", "stop", "version", "predict"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = dockctl(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("dockctl"), "Should show binary name");
}

#[test]
fn test_predict_help() {
    let output = dockctl(&["predict", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--refresh"), "Should show refresh flag");
}

#[test]
fn test_api_url_option() {
    let output = dockctl(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("DOCKBOARD_API_URL"), "Should show env var");
}

#[test]
fn test_format_option() {
    let output = dockctl(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
}

#[test]
fn test_invalid_format_rejected() {
    let output = dockctl(&["--format", "yaml", "images"]);

    assert!(!output.status.success(), "Unknown format should fail");
}

#[test]
fn test_start_requires_id() {
    let output = dockctl(&["start"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Missing argument should fail");
    assert!(stderr.contains("<ID>"), "Should name the missing argument");
}

#[test]
fn test_unreachable_dashboard_fails() {
    // Nothing listens on the discard port
    let output = dockctl(&["--api-url", "http://127.0.0.1:9", "images"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Could not reach the dashboard"));
}
