//
//  cydarm-connector
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const ENV_VARS: [&str; 6] = [
    "CYDARM_API_BASE_URL",
    "CYDARM_USERNAME",
    "CYDARM_PASSWORD",
    "CYDARM_BASIC_AUTH_USERNAME",
    "CYDARM_BASIC_AUTH_PASSWORD",
    "CYDARM_CONFIG",
];

/// A `cydarm` command isolated from the caller's environment.
fn cydarm() -> Command {
    let mut cmd = Command::cargo_bin("cydarm").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("CYDARM_NO_PROMPT", "true");
    cmd
}

fn empty_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, "").unwrap();
    path
}

fn write_input(dir: &Path, input: &Value) -> PathBuf {
    let path = dir.join("input.json");
    fs::write(&path, serde_json::to_string(input).unwrap()).unwrap();
    path
}

#[test]
fn test_actions_lists_every_identifier() {
    let output = cydarm().args(["actions", "--json"]).output().unwrap();
    assert!(output.status.success());

    let actions: Value = serde_json::from_slice(&output.stdout).unwrap();
    let actions = actions.as_array().unwrap();
    assert_eq!(actions.len(), 24);
    assert!(actions.iter().any(|a| a["identifier"] == "get_case"));
    assert!(actions.iter().any(|a| a["identifier"] == "test_connectivity"));
}

#[test]
fn test_run_get_case_from_host_input() {
    let mut server = mockito::Server::new();
    let _login = server
        .mock("POST", "/auth/password")
        .with_status(200)
        .with_header("Access-Token", "jwt")
        .create();
    let _case = server
        .mock("GET", "/case/abc123")
        .match_header("x-cydarm-authz", "jwt")
        .with_status(200)
        .with_body(r#"{"uuid": "abc123", "description": "Phish"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let config = empty_config(&dir);
    let input = write_input(
        dir.path(),
        &json!({
            "identifier": "get_case",
            "config": {
                "cydarm_api_base_url": server.url(),
                "cydarm_username": "bot",
                "cydarm_password": "pw"
            },
            "parameters": [{"case_uuid": "abc123"}]
        }),
    );

    let output = cydarm()
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["status"], "success");
    assert_eq!(results[0]["data"][0]["uuid"], "abc123");
    assert_eq!(results[0]["summary"]["total_objects"], 1);
}

#[test]
fn test_run_reports_failed_invocations() {
    let mut server = mockito::Server::new();
    let _login = server
        .mock("POST", "/auth/password")
        .with_status(200)
        .with_header("Access-Token", "jwt")
        .create();
    let _case = server
        .mock("GET", "/case/missing")
        .with_status(404)
        .with_body(r#"{"error": "case not found"}"#)
        .create();

    let dir = TempDir::new().unwrap();
    let config = empty_config(&dir);
    let input = write_input(
        dir.path(),
        &json!({
            "identifier": "get_case",
            "config": {
                "cydarm_api_base_url": server.url(),
                "cydarm_username": "bot",
                "cydarm_password": "pw"
            },
            "parameters": [{"case_uuid": "missing"}]
        }),
    );

    cydarm()
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("case not found"))
        .stderr(predicate::str::contains("1 of 1 action invocation(s) failed"));
}

#[test]
fn test_unknown_action_exits_with_8() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), &json!({"identifier": "reboot", "parameters": [{}]}));

    cydarm()
        .arg("run")
        .arg(&input)
        .assert()
        .code(8)
        .stderr(predicate::str::contains("Unknown action: reboot"));

    cydarm()
        .args(["action", "reboot"])
        .assert()
        .code(8);
}

#[test]
fn test_missing_configuration_exits_with_4() {
    let dir = TempDir::new().unwrap();
    let config = empty_config(&dir);

    cydarm()
        .arg("--config")
        .arg(&config)
        .args(["action", "get_case", "-F", "case_uuid=abc123"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("cydarm_api_base_url"));
}

#[test]
fn test_malformed_field_exits_with_2() {
    cydarm()
        .args(["action", "get_case", "-F", "case_uuid"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Expected key=value"));
}

#[test]
fn test_action_with_environment_config() {
    let mut server = mockito::Server::new();
    let login = server
        .mock("POST", "/auth/password")
        .with_status(200)
        .with_header("Access-Token", "jwt")
        .create();

    let dir = TempDir::new().unwrap();
    let config = empty_config(&dir);

    cydarm()
        .env("CYDARM_API_BASE_URL", server.url())
        .env("CYDARM_USERNAME", "bot")
        .env("CYDARM_PASSWORD", "pw")
        .arg("--config")
        .arg(&config)
        .args(["--json", "action", "test_connectivity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test Connectivity Passed"));

    login.assert();
}

#[test]
fn test_config_set_get_and_show() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested").join("config.toml");

    cydarm()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "cydarm_username", "bot"])
        .assert()
        .success();
    cydarm()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "cydarm_password", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not());

    cydarm()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "cydarm_username"])
        .assert()
        .success()
        .stdout("bot\n");

    let output = cydarm()
        .arg("--config")
        .arg(&config)
        .args(["--json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["cydarm_username"], "bot");
    assert_eq!(shown["cydarm_password"], "********");
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    let config = empty_config(&dir);

    cydarm()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "editor", "vim"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown configuration key: editor"));
}

#[test]
fn test_completion_names_the_binary() {
    cydarm()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cydarm"));
}
