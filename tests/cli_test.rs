//! Integration tests for the tnr-update binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use tnr_update::Platform;

/// Command with ambient `TNR_*` configuration stripped.
fn tnr_update() -> Command {
    let mut cmd = Command::new(cargo_bin("tnr-update"));
    for var in [
        "TNR_LATEST_URL",
        "TNR_DOWNLOAD_BASE",
        "TNR_MIN_VERSION_URL",
        "TNR_UPDATE_CACHE_DIR",
        "TNR_UPDATE_DEBUG",
        "TNR_NO_SELFUPDATE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = tnr_update();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Update checker for the tnr CLI"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = tnr_update();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_check_json_reports_an_update() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;

    // The binary checks for its own host platform.
    let platform = Platform::detect();
    let target = platform.archive_name("1.2.0");
    let asset_key = format!("{}/{}", platform.os, platform.arch);
    let hash = "b".repeat(64);

    server.mock(|when, then| {
        when.method(GET).path("/latest.json");
        then.status(200).json_body(serde_json::json!({
            "version": "1.2.0",
            "channel": "stable",
            "assets": {
                asset_key: server.url(&format!("/rel/{target}")),
                "checksums": server.url("/rel/checksums.txt"),
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rel/checksums.txt");
        then.status(200).body(format!("{hash}  {target}\n"));
    });
    server.mock(|when, then| {
        when.method(GET).path("/min.json");
        then.status(200)
            .json_body(serde_json::json!({"version": "1.0.0"}));
    });

    let mut cmd = tnr_update();
    cmd.env("TNR_LATEST_URL", server.url("/latest.json"));
    cmd.env("TNR_MIN_VERSION_URL", server.url("/min.json"));
    cmd.env("TNR_UPDATE_CACHE_DIR", temp.path());
    cmd.args(["check", "--json", "--force", "--current", "1.0.0"]);

    let assert = cmd.assert().success();
    let result: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;

    assert_eq!(result["current_version"], "1.0.0");
    assert_eq!(result["latest_version"], "1.2.0");
    assert_eq!(result["min_version"], "1.0.0");
    assert_eq!(result["optional"], true);
    assert_eq!(result["mandatory"], false);
    assert_eq!(result["reason"], "new-version");
    assert_eq!(result["asset_url"], server.url(&format!("/rel/{target}")));
    assert_eq!(result["expected_sha256"], hash);
    Ok(())
}

#[test]
fn cli_check_reports_up_to_date() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;

    let platform = Platform::detect();
    let target = platform.archive_name("1.2.0");
    let asset_key = format!("{}/{}", platform.os, platform.arch);
    let hash = "c".repeat(64);

    server.mock(|when, then| {
        when.method(GET).path("/latest.json");
        then.status(200).json_body(serde_json::json!({
            "version": "1.2.0",
            "assets": {
                asset_key: server.url(&format!("/rel/{target}")),
                "checksums": server.url("/rel/checksums.txt"),
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rel/checksums.txt");
        then.status(200).body(format!("{hash}  {target}\n"));
    });

    let mut cmd = tnr_update();
    cmd.env("TNR_LATEST_URL", server.url("/latest.json"));
    cmd.env("TNR_UPDATE_CACHE_DIR", temp.path());
    cmd.args(["check", "--force", "--current", "1.2.0"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
    Ok(())
}

#[test]
fn cli_check_honors_the_kill_switch() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = tnr_update();
    // No server behind this URL; the check must bail out first.
    cmd.env("TNR_LATEST_URL", "http://127.0.0.1:9/latest.json");
    cmd.env("TNR_NO_SELFUPDATE", "1");
    cmd.arg("check");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Self-update disabled"));
    Ok(())
}

#[test]
fn cli_check_fails_on_a_bad_current_version() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let temp = TempDir::new()?;

    let platform = Platform::detect();
    let target = platform.archive_name("1.2.0");
    let asset_key = format!("{}/{}", platform.os, platform.arch);
    let hash = "d".repeat(64);

    server.mock(|when, then| {
        when.method(GET).path("/latest.json");
        then.status(200).json_body(serde_json::json!({
            "version": "1.2.0",
            "assets": {
                asset_key: server.url(&format!("/rel/{target}")),
                "checksums": server.url("/rel/checksums.txt"),
            }
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/rel/checksums.txt");
        then.status(200).body(format!("{hash}  {target}\n"));
    });

    let mut cmd = tnr_update();
    cmd.env("TNR_LATEST_URL", server.url("/latest.json"));
    cmd.env("TNR_UPDATE_CACHE_DIR", temp.path());
    cmd.args(["check", "--force", "--current", "not-a-version"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    Ok(())
}

#[test]
fn cli_cache_show_and_clear() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("latest_manifest.json"), "{}")?;

    let mut show = tnr_update();
    show.env("TNR_UPDATE_CACHE_DIR", temp.path());
    show.args(["cache", "show"]);
    show.assert()
        .success()
        .stdout(predicate::str::contains("latest_manifest.json"));

    let mut clear = tnr_update();
    clear.env("TNR_UPDATE_CACHE_DIR", temp.path());
    clear.args(["cache", "clear"]);
    clear
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 entries"));

    let mut empty = tnr_update();
    empty.env("TNR_UPDATE_CACHE_DIR", temp.path());
    empty.args(["cache", "show"]);
    empty
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache is empty"));
    Ok(())
}

#[test]
fn cli_cache_show_json_lists_entries() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("min_version.json"), "{}")?;

    let mut cmd = tnr_update();
    cmd.env("TNR_UPDATE_CACHE_DIR", temp.path());
    cmd.args(["cache", "show", "--json"]);

    let assert = cmd.assert().success();
    let output: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(output["entries"][0], "min_version.json");
    Ok(())
}

#[test]
fn cli_marker_clear_removes_the_marker() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let marker_dir = temp.path().join(".thunder").join("cache");
    fs::create_dir_all(&marker_dir)?;
    let marker_path = marker_dir.join("optional_update_status.json");
    fs::write(&marker_path, r#"{"last_attempt":"2026-01-01T00:00:00Z"}"#)?;

    let mut cmd = tnr_update();
    cmd.env("HOME", temp.path());
    cmd.args(["marker", "clear"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cleared"));
    assert!(!marker_path.exists());
    Ok(())
}
