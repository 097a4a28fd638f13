//! Integration tests for linksentinel.
//!
//! These tests verify end-to-end functionality without relying on external
//! network services: they exercise validation failures, schema generation,
//! and the missing-key sentinel path, all of which are deterministic
//! offline. No API key is ever configured here, so no request leaves the
//! machine.

use std::path::PathBuf;
use std::process::Command;
use std::str;

/// Helper to get the path to the compiled binary
fn get_binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("linksentinel");
    path
}

/// Helper: command with all service configuration stripped from the
/// environment, so every scan deterministically takes the failure path.
fn offline_command() -> Command {
    let mut cmd = Command::new(get_binary_path());
    cmd.env_remove("LINKSENTINEL_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("LINKSENTINEL_ENDPOINT")
        .env_remove("LINKSENTINEL_MODEL");
    cmd
}

/// Test that a URL argument is required
#[test]
fn test_requires_url_argument() {
    let output = offline_command()
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}

/// Test schema generation early exit
#[test]
fn test_generate_schema() {
    let output = offline_command()
        .arg("--generate-schema")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout).unwrap();
    let schema: serde_json::Value =
        serde_json::from_str(stdout).expect("schema output should be valid JSON");
    let schema_text = schema.to_string();
    assert!(
        schema_text.contains("risk_level"),
        "Schema should describe the risk_level field: {schema_text}"
    );
    assert!(schema_text.contains("technical_flags"));
}

/// Test blank input rejection
#[test]
fn test_empty_input_rejected() {
    let output = offline_command()
        .arg("   ")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());

    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(
        stderr.contains("Please enter a link"),
        "Should reject blank input inline: {stderr}"
    );
}

/// Test malformed URL rejection (no service call, local failure)
#[test]
fn test_malformed_url_rejected() {
    let output = offline_command()
        .arg("https://")
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());

    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(
        stderr.contains("does not look like a valid link"),
        "Should reject malformed URL inline: {stderr}"
    );
}

/// Test that a missing API key collapses into the sentinel result
#[test]
fn test_missing_key_yields_sentinel_json() {
    let output = offline_command()
        .arg("example.com")
        .args(["--format", "json", "--verbose", "0"])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout).unwrap();
    let doc: serde_json::Value = serde_json::from_str(stdout).expect("valid JSON document");

    let scan = &doc["scans"][0];
    assert_eq!(scan["raw_input"], "example.com");
    assert_eq!(scan["url"], "https://example.com");
    assert_eq!(scan["risk_level"], "UNKNOWN");
    assert_eq!(scan["risk_score"], 0);
    assert_eq!(scan["threat_type"], "Error");
    assert_eq!(
        scan["technical_flags"],
        serde_json::json!(["Connection Error"])
    );

    assert_eq!(doc["statistics"]["failures"], 1);
    assert_eq!(doc["result"]["success"], false);
}

/// Test batch output format on the offline failure path
#[test]
fn test_batch_output_offline() {
    let output = offline_command()
        .arg("example.com")
        .args(["--format", "batch", "--verbose", "0"])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout).unwrap();
    let lines: Vec<&str> = stdout.trim().split('\n').collect();
    assert_eq!(lines.len(), 1, "Batch mode should output exactly one line");
    assert_eq!(lines[0], "https://example.com\tUNKNOWN\t0");
}

/// Test plain output shows the generic failure explanation
#[test]
fn test_plain_output_offline() {
    let output = offline_command()
        .arg("example.com")
        .args(["--format", "plain", "--verbose", "0"])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert!(stdout.contains("UNKNOWN"));
    assert!(
        stdout.contains("could not reach the analysis server"),
        "Failure card should show the generic message: {stdout}"
    );
}

/// Test a mixed run: invalid inputs surface inline, valid ones still scan
#[test]
fn test_mixed_valid_and_invalid_inputs() {
    let output = offline_command()
        .args(["example.com", "   "])
        .args(["--format", "batch"])
        .output()
        .expect("Failed to execute binary");

    // One URL scanned successfully, so the run itself succeeds.
    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert_eq!(stdout.trim().split('\n').count(), 1);

    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(
        stderr.contains("Please enter a link"),
        "Invalid input should be reported inline: {stderr}"
    );
}

/// Test multi-URL run renders a history table in plain format
#[test]
fn test_multi_url_history_table() {
    let output = offline_command()
        .args(["a.test", "b.test"])
        .args(["--format", "plain", "--verbose", "0"])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert!(
        stdout.contains("Scan History"),
        "Multi-URL run should print the history table: {stdout}"
    );
    assert!(stdout.contains("https://a.test"));
    assert!(stdout.contains("https://b.test"));
}

/// Test YAML structured output parses and carries the sentinel fields
#[test]
fn test_yaml_output_offline() {
    let output = offline_command()
        .arg("example.com")
        .args(["--format", "yaml", "--verbose", "0"])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert!(stdout.contains("risk_level: UNKNOWN"));
    assert!(stdout.contains("threat_type: Error"));
}
