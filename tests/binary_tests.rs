//! Integration tests for the crud-resolver binary.

use std::io::Write;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::{Builder, NamedTempFile};

const FACTS_JSON: &str = r#"{
  "endpoints": [
    {"http_method": "get", "url_path": "/users", "entry_class": "UserController", "entry_method": "list"}
  ],
  "call_edges": [
    {"from_class": "UserController", "from_method": "list", "to_class": "UserService", "to_method": "findAll"},
    {"from_class": "UserService", "from_method": "findAll", "to_class": "UserMapper", "to_method": "selectAll"}
  ],
  "sql_mappings": [
    {"owner": "com.example.UserMapper", "operation_id": "selectAll", "raw_text": "SELECT * FROM users <where><if test=\"id != null\">AND id = #{id}</if></where>"}
  ]
}"#;

fn cmd() -> Command {
    cargo_bin_cmd!("crud-resolver")
}

fn facts_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_analyze_success() {
    let facts = facts_file(".json", FACTS_JSON);

    cmd()
        .args(["analyze", "--facts", facts.path().to_str().unwrap(), "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GET /users"))
        .stdout(predicate::str::contains("S users"));
}

#[test]
fn test_analyze_json_format() {
    let facts = facts_file(".json", FACTS_JSON);

    cmd()
        .args([
            "analyze",
            "--facts",
            facts.path().to_str().unwrap(),
            "-f",
            "json",
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"crud_code\": \"S\""));
}

#[test]
fn test_analyze_yaml_facts() {
    let yaml = r#"
endpoints:
  - http_method: DELETE
    url_path: /orders/{id}
    entry_class: OrderController
    entry_method: remove
call_edges:
  - from_class: OrderController
    from_method: remove
    to_class: OrderRepository
    to_method: deleteById
sql_mappings:
  - owner: OrderRepository
    operation_id: deleteById
    raw_text: "DELETE FROM orders WHERE id = #{id}"
"#;
    let facts = facts_file(".yaml", yaml);

    cmd()
        .args(["analyze", "--facts", facts.path().to_str().unwrap(), "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("D orders"));
}

#[test]
fn test_analyze_stdin() {
    cmd()
        .args(["analyze", "--facts", "-", "-f", "yaml"])
        .write_stdin(FACTS_JSON)
        .assert()
        .success()
        .stdout(predicate::str::contains("table: users"));
}

#[test]
fn test_analyze_sequential_verbose() {
    let facts = facts_file(".json", FACTS_JSON);

    cmd()
        .args([
            "analyze",
            "--facts",
            facts.path().to_str().unwrap(),
            "--sequential",
            "-v",
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tier hits"));
}

#[test]
fn test_analyze_no_links_still_succeeds() {
    let facts = facts_file(".json", r#"{"endpoints": []}"#);

    cmd()
        .args(["analyze", "--facts", facts.path().to_str().unwrap(), "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No CRUD links produced"))
        .stderr(predicate::str::contains("no CRUD links produced"));
}

#[test]
fn test_analyze_file_not_found() {
    cmd()
        .args(["analyze", "--facts", "/nonexistent/facts.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_analyze_invalid_facts() {
    let facts = facts_file(".json", "{ not json");

    cmd()
        .args(["analyze", "--facts", facts.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_explicit_config_file() {
    let facts = facts_file(".json", FACTS_JSON);
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[resolver]\ndata_access_suffixes = [\"Store\"]").unwrap();

    cmd()
        .args([
            "analyze",
            "--facts",
            facts.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap(),
            "--no-color"
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No CRUD links produced"));
}

#[test]
fn test_invalid_config_file() {
    let facts = facts_file(".json", FACTS_JSON);
    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "[sql]\ndialect = \"oracle\"").unwrap();

    cmd()
        .args([
            "analyze",
            "--facts",
            facts.path().to_str().unwrap(),
            "--config",
            config.path().to_str().unwrap()
        ])
        .assert()
        .failure();
}

#[test]
fn test_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"));
}
