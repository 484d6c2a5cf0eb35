use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("taskdeck")
        .env("TASKDECK_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("taskdeck")
        .env("TASKDECK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("api_base_url ="));
    assert!(contents.contains("request_timeout_secs ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("taskdeck")
        .env("TASKDECK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_set_url_keeps_other_values() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        "api_base_url = \"http://old:8000\"\nlog_level = \"debug\"\n",
    )
    .unwrap();

    cargo_bin_cmd!("taskdeck")
        .env("TASKDECK_HOME", dir.path())
        .args(["config", "set-url", "https://tasks.example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://tasks.example.com"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("# Base URL of the task API server."));
    assert!(contents.contains("\"https://tasks.example.com\""));
    assert!(!contents.contains("http://old:8000"));
    assert!(contents.contains("\"debug\""));
}

#[test]
fn test_set_url_rejects_non_http_scheme() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("taskdeck")
        .env("TASKDECK_HOME", dir.path())
        .args(["config", "set-url", "ftp://tasks.example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http or https"));
}
