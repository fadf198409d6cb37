//! CLI Integration Tests for Insight
//!
//! Runs the built binary for commands that need no LLM or network access.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_insight(args: &[&str], working_dir: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_insight-server"))
        .args(args)
        .current_dir(working_dir)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    let output = run_insight(&["--help"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Insight"));
    assert!(stdout.contains("ask"));
    assert!(stdout.contains("serve"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = run_insight(&["--version"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_config_validate_without_file() {
    let dir = TempDir::new().unwrap();
    let output = run_insight(&["--no-color", "config", "--validate"], dir.path());

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("[OK]"));
}

#[test]
fn test_config_shows_values() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("insight.toml"),
        "[server]\nport = 9123\n\n[workflow]\nmax_queries = 2\n",
    )
    .unwrap();

    let output = run_insight(&["--no-color", "config"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("127.0.0.1:9123"));
    assert!(stdout.contains("max queries: 2"));
    assert!(stdout.contains("llama3.2"));
}

#[test]
fn test_invalid_config_exits_with_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.toml"), "[search]\nmax_results = 0\n").unwrap();

    let output = run_insight(
        &["--no-color", "--config", "broken.toml", "config", "--validate"],
        dir.path(),
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ERROR]"));
    assert!(stderr.contains("max_results"));
}
