//! Integration tests for the physio binary.
//!
//! These tests verify end-to-end behavior including:
//! - Configuration and credential resolution
//! - Local argument validation before any request is sent
//! - Transport failures surfacing as errors
//! - The demo walkthrough and JSON output against a mockito server

use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a test config directory with an empty config file
fn setup_config() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "").expect("Failed to write config");
    (temp_dir, path)
}

/// Helper to get the path to the CLI binary with a clean environment
fn cli(config: &PathBuf) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("physio"));
    cmd.env_remove("PHYSIO_API_KEY")
        .env_remove("PHYSIO_BASE_URL")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}

/// A base URL on which nothing is listening
fn dead_base_url() -> String {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    format!("http://127.0.0.1:{}/v1", port)
}

/// A `200 OK` JSON response for an authenticated GET, not yet created
fn mock_get(
    server: &mut mockito::ServerGuard,
    path: &str,
    body: &serde_json::Value,
) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_header("x-api-key", "key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
}

fn template(id: &str, name: &str, difficulty: u8) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "Shoulder strengthening",
        "category": "strength",
        "difficulty": difficulty,
        "bodyRegion": "upper_body",
        "primaryJoints": ["shoulder"],
        "estimatedDuration": 240,
        "recommendedReps": 12,
        "recommendedSets": 3,
        "patientInstructions": "Move slowly.",
        "active": true
    })
}

#[test]
fn test_cli_help() {
    let (_dir, config) = setup_config();
    cli(&config)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "PhysioAssist prescription API client",
        ));
}

#[test]
fn test_missing_api_key_fails() {
    let (_dir, config) = setup_config();
    cli(&config)
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No API key configured"));
}

#[test]
fn test_api_key_from_config_file() {
    let (_dir, config) = setup_config();
    fs::write(
        &config,
        format!("[api]\napi_key = \"from-file\"\nbase_url = \"{}\"\n", dead_base_url()),
    )
    .unwrap();

    // Gets past credential resolution and fails on the network instead
    cli(&config)
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transport"));
}

#[test]
fn test_unreachable_server_is_transport_error() {
    let (_dir, config) = setup_config();
    cli(&config)
        .args(["--api-key", "key", "--base-url"])
        .arg(dead_base_url())
        .args(["prescriptions", "cancel", "rx_1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transport"));
}

#[test]
fn test_unknown_category_rejected_locally() {
    let (_dir, config) = setup_config();
    cli(&config)
        .args(["--api-key", "key", "--base-url"])
        .arg(dead_base_url())
        .args(["templates", "list", "--category", "aquatic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown exercise category"));
}

#[test]
fn test_completion_out_of_range_rejected_locally() {
    let (_dir, config) = setup_config();
    cli(&config)
        .args(["--api-key", "key", "--base-url"])
        .arg(dead_base_url())
        .args(["prescriptions", "update", "rx_1", "--completion", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("completion_percent"));
}

#[test]
fn test_empty_update_rejected_with_single_message() {
    let (_dir, config) = setup_config();
    cli(&config)
        .args(["--api-key", "key", "--base-url"])
        .arg(dead_base_url())
        .args(["prescriptions", "update", "rx_1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to update, pass --status"))
        .stderr(predicate::str::contains("Nothing to update").not());
}

#[test]
fn test_demo_walkthrough() {
    let page = json!({
        "total": 3,
        "templates": [
            template("t1", "Banded External Rotation", 2),
            template("t2", "Wall Push-up", 1)
        ]
    });
    let stats = json!({
        "totalTemplates": 30,
        "activeCount": 28,
        "byCategory": { "strength": 7, "balance": 0, "flexibility": 4 }
    });
    let mut server = mockito::Server::new();
    let list_mock = mock_get(&mut server, "/v1/templates", &page)
        .match_query(Matcher::Exact(
            "limit=10&offset=0&category=strength&search=shoulder".into(),
        ))
        .create();
    let stats_mock = mock_get(&mut server, "/v1/library/stats", &stats).create();
    let base_url = format!("{}/v1", server.url());
    let (_dir, config) = setup_config();

    cli(&config)
        .args(["--api-key", "key", "--base-url", base_url.as_str(), "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 templates"))
        .stdout(predicate::str::contains("Banded External Rotation (Difficulty: 2/5)"))
        .stdout(predicate::str::contains("Total templates: 30"))
        .stdout(predicate::str::contains("strength: 7"))
        .stdout(predicate::str::contains("balance").not());

    list_mock.assert();
    stats_mock.assert();
}

#[test]
fn test_get_template_json_output() {
    let mut server = mockito::Server::new();
    let mock = mock_get(&mut server, "/v1/templates/t1", &template("t1", "Wall Push-up", 1))
        .match_header("content-type", "application/json")
        .create();
    let base_url = format!("{}/v1", server.url());
    let (_dir, config) = setup_config();

    let output = cli(&config)
        .args(["--api-key", "key", "--base-url", base_url.as_str(), "--json"])
        .args(["templates", "get", "t1"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, template("t1", "Wall Push-up", 1));
    mock.assert();
}

#[test]
fn test_unacknowledged_cancel_fails_with_single_message() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("DELETE", "/v1/prescriptions/rx_1")
        .match_header("x-api-key", "key")
        .with_status(200)
        .with_body("{}")
        .create();
    let base_url = format!("{}/v1", server.url());
    let (_dir, config) = setup_config();

    cli(&config)
        .args(["--api-key", "key", "--base-url", base_url.as_str()])
        .args(["prescriptions", "cancel", "rx_1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prescription rx_1 was not cancelled"))
        .stderr(predicate::str::contains("Prescription rx_1 was not cancelled").not());
    mock.assert();
}
