//! CLI integration tests
//!
//! These tests spawn the `blockdoc` binary against outline files written to
//! a temporary directory.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const FIRST_DOCUMENT: &str = r#"{
  "name": "My First Document",
  "blocks": [
    { "content": "First block" },
    { "content": "Second block", "children": [
        { "content": "First subblock" },
        { "content": "Second subblock" }
    ] },
    { "content": "Third block", "children": [
        { "content": "Third subblock" }
    ] }
  ]
}"#;

fn write_outline(temp_dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blockdoc"))
        .args(["--log-profile", "test"])
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_render_prints_markup() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_outline(&temp_dir, "doc.json", FIRST_DOCUMENT);

    let output = run(&["render", input.to_str().unwrap()]);

    assert!(
        output.status.success(),
        "render should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "My First Document\n  First block\n  Second block\n    First subblock\n    Second subblock\n  Third block\n    Third subblock\n"
    );
}

#[test]
fn test_render_to_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_outline(&temp_dir, "doc.json", FIRST_DOCUMENT);
    let target = temp_dir.path().join("doc.txt");

    let output = run(&[
        "render",
        input.to_str().unwrap(),
        "--output",
        target.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Rendered to"));
    let written = fs::read_to_string(&target).unwrap();
    assert!(written.starts_with("My First Document\n  First block\n"));
}

#[test]
fn test_checksums_lists_every_block_and_document() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_outline(&temp_dir, "doc.json", FIRST_DOCUMENT);

    let output = run(&["checksums", input.to_str().unwrap(), "--verify"]);

    assert!(
        output.status.success(),
        "checksums should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 8);
    assert!(lines[0].ends_with("First block"));
    assert!(lines[2].starts_with("  "));
    assert!(lines[2].ends_with("First subblock"));

    let document_line = lines[6];
    let checksum = document_line.strip_prefix("document ").unwrap();
    assert_eq!(checksum.len(), 8);
    assert!(checksum.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(lines[7], "✓ Checksums verified");
}

#[test]
fn test_checksums_are_deterministic_across_runs() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_outline(&temp_dir, "doc.json", FIRST_DOCUMENT);

    let first = run(&["checksums", input.to_str().unwrap()]);
    let second = run(&["checksums", input.to_str().unwrap()]);

    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_style_changes_checksums() {
    let temp_dir = TempDir::new().unwrap();
    let plain = write_outline(
        &temp_dir,
        "plain.json",
        r#"{ "name": "D", "blocks": [ { "content": "x" } ] }"#,
    );
    let styled = write_outline(
        &temp_dir,
        "styled.json",
        r#"{ "name": "D", "blocks": [ { "content": "x", "style": { "color": "red" } } ] }"#,
    );

    let plain = run(&["checksums", plain.to_str().unwrap()]);
    let styled = run(&["checksums", styled.to_str().unwrap()]);

    assert!(plain.status.success() && styled.status.success());
    assert_ne!(plain.stdout, styled.stdout);
}

#[test]
fn test_invalid_outline_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_outline(&temp_dir, "bad.json", "{ not json");

    let output = run(&["render", input.to_str().unwrap()]);

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_missing_file_reports_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope.json");

    let output = run(&["checksums", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}

#[test]
fn test_default_run_keeps_stderr_silent() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_outline(&temp_dir, "doc.json", FIRST_DOCUMENT);

    let output = Command::new(env!("CARGO_BIN_EXE_blockdoc"))
        .args(["render", input.to_str().unwrap()])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

#[test]
fn test_production_profile_logs_json_to_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_outline(&temp_dir, "doc.json", FIRST_DOCUMENT);

    let output = Command::new(env!("CARGO_BIN_EXE_blockdoc"))
        .args(["--log-profile", "production", "render", input.to_str().unwrap()])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("insert_block_at_root_end"));
    assert!(stdout_is_markup(&output));
}

fn stdout_is_markup(output: &Output) -> bool {
    String::from_utf8_lossy(&output.stdout).starts_with("My First Document\n")
}
