use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BIN_NAME: &str = "logbook";

const CHECKING: &str = "0b5a7c1e-4f5e-4f7e-9a51-2f0d3c4b5a61";
const SAVINGS: &str = "7d1f2c3b-9a8e-4b6d-8c5f-1e2d3c4b5a69";

fn operation(timestamp: &str, amount: &str, currency: &str, description: &str, budget: &str) -> String {
    format!(
        r#"{{
            "timestamp": "{timestamp}",
            "amount": {{ "amount": "{amount}", "currency": "{currency}" }},
            "description": "{description}",
            "budget_id": "{budget}"
        }}"#
    )
}

fn write_operations(dir: &Path) -> PathBuf {
    let operations = [
        operation("2024-03-01T08:00:00Z", "2000", "EUR", "Salary", CHECKING),
        operation("2024-03-02T09:00:00Z", "-500", "EUR", "To savings", CHECKING),
        operation("2024-03-02T09:05:00Z", "500", "EUR", "From checking", SAVINGS),
        operation("2024-03-05T17:30:00Z", "-80", "EUR", "Supermarket", CHECKING),
        operation("2024-04-03T07:45:00Z", "-12", "EUR", "Bakery", CHECKING),
        operation("2024-03-10T10:00:00Z", "-3", "USD", "Coffee abroad", CHECKING),
    ];
    let path = dir.join("operations.json");
    fs::write(&path, format!("[{}]", operations.join(","))).unwrap();
    path
}

fn logbook(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("LOGBOOK_DATA_DIR", data_dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn classify_prints_default_tree() {
    let temp = TempDir::new().unwrap();
    let operations = write_operations(temp.path());

    logbook(temp.path())
        .arg("classify")
        .arg(&operations)
        .assert()
        .success()
        .stdout(contains("Classification Report"))
        .stdout(contains("Income"))
        .stdout(contains("Expenses"))
        .stdout(contains("2024-04"))
        .stdout(contains("Skipped 1 operation(s) not in EUR"))
        .stdout(contains("Rejected").not());
}

#[test]
fn classify_with_transfers_keeps_legs_out() {
    let temp = TempDir::new().unwrap();
    let operations = write_operations(temp.path());

    logbook(temp.path())
        .args(["classify", "--transfers"])
        .arg(&operations)
        .assert()
        .success()
        .stdout(contains("Excluded transfer legs: 2"))
        .stdout(contains("Rejected").not());
}

#[test]
fn classify_exports_sliced_json() {
    let temp = TempDir::new().unwrap();
    let operations = write_operations(temp.path());
    let output = temp.path().join("out").join("report.json");

    logbook(temp.path())
        .args(["classify", "--from", "2024-04-01", "--output"])
        .arg(&output)
        .arg(&operations)
        .assert()
        .success()
        .stdout(contains("exported"));

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["rows"][0]["path"], "All");
    assert_eq!(report["rows"][0]["count"], 1);
    assert!(report["rejected"].as_array().unwrap().is_empty());
}

#[test]
fn classify_with_rules_file() {
    let temp = TempDir::new().unwrap();
    let operations = write_operations(temp.path());
    let rules = temp.path().join("rules.yaml");
    fs::write(
        &rules,
        r#"
description: Household
subcriteria:
  - description: Groceries
    rule:
      condition:
        any:
          - description: "*market*"
          - description: bakery
  - description: By budget
    rule:
      substitution: budget
"#,
    )
    .unwrap();

    logbook(temp.path())
        .args(["classify", "--rules"])
        .arg(&rules)
        .arg(&operations)
        .assert()
        .success()
        .stdout(contains("Household"))
        .stdout(contains("Groceries"))
        .stdout(contains("-92.00 EUR"));
}

#[test]
fn transfers_detects_exact_pair() {
    let temp = TempDir::new().unwrap();
    let operations = write_operations(temp.path());

    logbook(temp.path())
        .arg("transfers")
        .arg(&operations)
        .assert()
        .success()
        .stdout(contains("To savings"))
        .stdout(contains("Transfers: 1 (1 exact, 0 likely)"))
        .stdout(contains("Unmatched operations: 4"));
}

#[test]
fn init_then_config() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");

    logbook(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete!"));
    assert!(data_dir.join("config.json").exists());
    assert!(data_dir.join("rules.yaml").exists());
    assert!(data_dir.join("transfers.yaml").exists());

    logbook(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Default currency:     EUR"))
        .stdout(contains("not found").not());
}

#[test]
fn missing_operations_file_fails() {
    let temp = TempDir::new().unwrap();

    logbook(temp.path())
        .args(["transfers", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(contains("File not found"));
}
