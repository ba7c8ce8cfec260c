//! Smoke tests for the issue-sync CLI.
//!
//! These verify basic CLI behavior without any network access:
//! help/version output, build info, and configuration error handling.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    TestEnv::new()
        .bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("issue-sync"));
}

#[test]
fn test_help_flag() {
    TestEnv::new()
        .bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn test_sync_help_lists_options() {
    TestEnv::new()
        .bin()
        .args(["sync", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--app-id"))
        .stdout(predicate::str::contains("--org"))
        .stdout(predicate::str::contains("--project-number"))
        .stdout(predicate::str::contains("--opt-out-label"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_build_info_outputs_json() {
    TestEnv::new()
        .bin()
        .arg("build-info")
        .assert()
        .success()
        .stdout(predicate::str::contains("version"))
        .stdout(predicate::str::contains("commit"));
}

#[test]
fn test_build_info_human() {
    TestEnv::new()
        .bin()
        .args(["-H", "build-info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Version:"));
}

#[test]
fn test_invalid_command() {
    TestEnv::new()
        .bin()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_sync_without_configuration_is_usage_error() {
    // No env vars, no flags: clap rejects before any work happens
    TestEnv::new()
        .bin()
        .arg("sync")
        .env_remove("ISSUE_SYNC_APP_ID")
        .env_remove("ISSUE_SYNC_ORG")
        .env_remove("ISSUE_SYNC_PROJECT_NUMBER")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_missing_private_key_is_setup_fatal() {
    let env = TestEnv::new();
    env.bin()
        .arg("sync")
        .env("ISSUE_SYNC_APP_ID", "1234")
        .env("ISSUE_SYNC_ORG", "acme")
        .env("ISSUE_SYNC_PROJECT_NUMBER", "1")
        .env("ISSUE_SYNC_LOCK_FILE", env.lock_path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("private key"));
}

#[test]
fn test_unreadable_key_file_is_setup_fatal() {
    let env = TestEnv::new();
    env.bin()
        .arg("sync")
        .env("ISSUE_SYNC_APP_ID", "1234")
        .env("ISSUE_SYNC_ORG", "acme")
        .env("ISSUE_SYNC_PROJECT_NUMBER", "1")
        .env("ISSUE_SYNC_PRIVATE_KEY_FILE", "/nonexistent/app.pem")
        .env("ISSUE_SYNC_LOCK_FILE", env.lock_path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}
