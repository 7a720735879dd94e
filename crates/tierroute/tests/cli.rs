// SPDX-FileCopyrightText: 2026 TierRoute Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the `tierroute` binary.

use std::io::Write;
use std::process::{Command, Output};

use tempfile::NamedTempFile;

fn tierroute(config: &NamedTempFile, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tierroute"))
        .arg("--config")
        .arg(config.path())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tierroute")
}

fn config_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn route_uses_configured_default_in_manual_mode() {
    let config = config_file(
        r#"
[router]
mode = "manual"
default_tier = "claude"
"#,
    );
    let output = tierroute(&config, &["route", "format this csv"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["target"], "reasoning");
    assert_eq!(json["mode"], "manual");
    assert_eq!(json["reason"], "Manual routing mode");
}

#[test]
fn route_keyword_mode_from_custom_table() {
    let config = config_file(
        r#"
[router]
mode = "keyword"

[router.keywords]
production = ["invoice"]
"#,
    );
    let output = tierroute(&config, &["route", "--plain", "generate the invoice report"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "production (0.600, keyword): Matched keyword: invoice"
    );
}

#[test]
fn stats_reflect_examples_file() {
    let mut examples = NamedTempFile::new().unwrap();
    examples
        .write_all(br#"{"local": ["sort a list"], "azure": ["build a REST API", "add a db index"]}"#)
        .unwrap();
    let config = config_file(&format!(
        "[router]\nexamples_path = {:?}\n",
        examples.path().display().to_string()
    ));

    let output = tierroute(&config, &["stats"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["examples"]["local"], 1);
    assert_eq!(json["examples"]["production"], 2);
    assert_eq!(json["embeddings_computed"], false);
}

#[test]
fn invalid_config_exits_with_diagnostic() {
    let config = config_file("[router]\ndefault_teir = \"local\"\n");
    let output = tierroute(&config, &["check-config"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("default_teir"), "stderr: {stderr}");
}

#[test]
fn check_config_prints_effective_settings() {
    let config = config_file("[history]\ncapacity = 25\n");
    let output = tierroute(&config, &["check-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("capacity = 25"));
    assert!(stdout.contains("mode = \"semantic\""));
}
