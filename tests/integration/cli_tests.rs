//! CLI integration tests
//!
//! These tests verify that the binary wires configuration, analysis and
//! reporting together correctly.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_service")
}

/// orphanscan with a clean environment
fn orphanscan() -> Command {
    let mut cmd = Command::cargo_bin("orphanscan").unwrap();
    cmd.env_remove("GITHUB_WORKSPACE")
        .env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_STEP_SUMMARY")
        .env_remove("DD_API_KEY")
        .env_remove("DD_APP_KEY");
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    orphanscan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("orphanscan"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--confidence-threshold"))
        .stdout(predicate::str::contains("--service-name"));
}

#[test]
fn test_cli_version() {
    orphanscan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("orphanscan"));
}

#[test]
fn test_cli_rejects_unknown_mode() {
    orphanscan()
        .args(["--mode", "nightly"])
        .arg(fixture_path())
        .assert()
        .failure();
}

// ============================================================================
// PR mode
// ============================================================================

#[test]
fn test_cli_pr_mode_terminal() {
    orphanscan()
        .arg(fixture_path())
        .args(["--exclude-paths", "node_modules", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OC001"))
        .stdout(predicate::str::contains("DELETE /users/:id"));
}

#[test]
fn test_cli_json_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("orphans.json");

    orphanscan()
        .arg(fixture_path())
        .args(["--exclude-paths", "node_modules", "--format", "json", "-q"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"orphaned_endpoints\""));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["summary"]["total_endpoints"], 7);
    assert_eq!(written["summary"]["orphaned_count"], 1);
    assert_eq!(written["summary"]["analysis_mode"], "pr");
}

#[test]
fn test_cli_threshold_override() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("orphans.json");

    orphanscan()
        .arg(fixture_path())
        .args(["--exclude-paths", "node_modules", "--confidence-threshold", "0.5", "-q"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["summary"]["orphaned_count"], 3);
    assert_eq!(written["orphaned_functions"].as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_markdown_summary() {
    orphanscan()
        .arg(fixture_path())
        .args(["--exclude-paths", "node_modules", "--format", "markdown", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Total Endpoints | 7 |"))
        .stdout(predicate::str::contains("**Analysis Mode:** PR Changes Only"));
}

#[test]
fn test_cli_github_annotations_and_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let step_output = dir.path().join("github_output");

    orphanscan()
        .arg(fixture_path())
        .args(["--exclude-paths", "node_modules", "--format", "github", "-q"])
        .env("GITHUB_OUTPUT", &step_output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "::warning file=src/routes/users.js,line=14,endLine=14,title=Potentially orphaned endpoint::Handler function not found in codebase",
        ));

    let outputs = fs::read_to_string(&step_output).unwrap();
    assert!(outputs.contains("orphaned-count=1\n"));
}

#[test]
fn test_cli_reads_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(".orphanscan.yml"),
        "exclude: [vendor]\nconfidence_threshold: 0.5\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("vendor")).unwrap();
    fs::write(dir.path().join("vendor/lib.js"), "function vendored() {}\n").unwrap();
    fs::write(dir.path().join("app.js"), "function lonely() {}\n").unwrap();

    orphanscan()
        .arg(dir.path())
        .args(["--format", "json", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lonely"))
        .stdout(predicate::str::contains("vendored").not());
}

#[test]
fn test_cli_workspace_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("server.js"), "app.get('/ghost', ghostHandler);\n").unwrap();

    orphanscan()
        .env("GITHUB_WORKSPACE", dir.path())
        .args(["--format", "json", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/ghost"));
}

// ============================================================================
// Failure modes
// ============================================================================

#[test]
fn test_cli_full_mode_requires_credentials() {
    orphanscan()
        .arg(fixture_path())
        .args(["--mode", "full", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("service name"));
}

#[test]
fn test_cli_full_mode_rejects_bad_time_range() {
    orphanscan()
        .arg(fixture_path())
        .args([
            "--mode",
            "full",
            "--datadog-api-key",
            "k",
            "--datadog-app-key",
            "a",
            "--service-name",
            "users-api",
            "--time-range",
            "7x",
            "-q",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time range"));
}

#[test]
fn test_cli_missing_workspace() {
    orphanscan()
        .arg("/definitely/not/a/workspace")
        .arg("-q")
        .assert()
        .failure();
}

#[test]
fn test_cli_threshold_out_of_range() {
    orphanscan()
        .arg(fixture_path())
        .args(["--confidence-threshold", "1.5", "-q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 1"));
}
