use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use shiftforge_test::roster::EMPLOYEES_JSON;
use shiftforge_test::rules::RULES_JSON;
use tempfile::TempDir;

/// Writes the fixture records into a fresh directory.
fn create_cli_test_environment() -> (TempDir, PathBuf, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let employees = temp_dir.path().join("employees.json");
    let rules = temp_dir.path().join("rules.json");
    fs::write(&employees, EMPLOYEES_JSON).expect("Failed to write employees");
    fs::write(&rules, RULES_JSON).expect("Failed to write rules");
    (temp_dir, employees, rules)
}

/// Command with quiet, colorless output for assertions.
fn shiftforge_cmd() -> Command {
    let mut cmd = Command::cargo_bin("shiftforge").expect("Failed to find shiftforge binary");
    cmd.args(["--quiet", "--no-color"]);
    cmd
}

fn plan_week(employees: &Path, rules: &Path) -> Command {
    let mut cmd = shiftforge_cmd();
    cmd.args([
        "plan",
        "2025-03-10",
        "2025-03-16",
        "--employees",
        employees.to_str().unwrap(),
        "--rules",
        rules.to_str().unwrap(),
    ]);
    cmd
}

#[test]
fn test_cli_plan_writes_csv_to_stdout() {
    let (_dir, employees, rules) = create_cli_test_environment();

    plan_week(&employees, &rules)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(",,,,,,,,10.03.25,"))
        .stdout(predicate::str::contains("Id,Surname,GivenName,Department,Coverage"))
        .stdout(predicate::str::contains("001,Berger,Anna,Politik,x,56,56.00,0.00"))
        .stdout(predicate::str::contains("003,Wolf,Mira,Kultur,,40,"));
}

#[test]
fn test_cli_plan_writes_output_file() {
    let (dir, employees, rules) = create_cli_test_environment();
    let output = dir.path().join("results").join("output.csv");

    plan_week(&employees, &rules)
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 2 + 3);
    assert!(written.contains("16.03.25"));
}

#[test]
fn test_cli_plan_table_format() {
    let (_dir, employees, rules) = create_cli_test_environment();

    plan_week(&employees, &rules)
        .args(["--format", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mon 10.03"))
        .stdout(predicate::str::contains("Berger Anna"));
}

#[test]
fn test_cli_plan_json_format() {
    let (_dir, employees, rules) = create_cli_test_environment();

    let assert = plan_week(&employees, &rules)
        .args(["--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["rows"].as_array().unwrap().len(), 3);
    assert_eq!(value["days"][6], "2025-03-16");
}

#[test]
fn test_cli_plan_greedy_strategy() {
    let (_dir, employees, rules) = create_cli_test_environment();

    plan_week(&employees, &rules)
        .args(["--strategy", "greedy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:00,17:00"));
}

#[test]
fn test_cli_end_before_start_fails() {
    let (_dir, employees, rules) = create_cli_test_environment();

    shiftforge_cmd()
        .args([
            "plan",
            "2025-03-16",
            "2025-03-10",
            "--employees",
            employees.to_str().unwrap(),
            "--rules",
            rules.to_str().unwrap(),
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("precedes start date"));
}

#[test]
fn test_cli_invalid_date_fails() {
    let (_dir, employees, rules) = create_cli_test_environment();

    shiftforge_cmd()
        .args([
            "plan",
            "10.03.2025",
            "2025-03-16",
            "--employees",
            employees.to_str().unwrap(),
            "--rules",
            rules.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date '10.03.2025'"));
}

#[test]
fn test_cli_infeasible_exit_code() {
    let (dir, _employees, rules) = create_cli_test_environment();
    let employees = dir.path().join("early.json");
    fs::write(
        &employees,
        r#"[{"id": "1", "roles": ["cvd"], "weeklyHours": 56, "flags": {"earlyOnly": true}}]"#,
    )
    .unwrap();

    plan_week(&employees, &rules)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No schedule possible"));
}

#[test]
fn test_cli_strict_rest_transitions_need_rest_rules() {
    let (_dir, employees, rules) = create_cli_test_environment();

    // Wolf rests on weekends, and the rules list no transition into rest.
    plan_week(&employees, &rules)
        .args(["--rest-transitions", "strict"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No schedule possible"));

    plan_week(&employees, &rules)
        .args(["--rest-transitions", "lenient"])
        .assert()
        .success();
}

#[test]
fn test_cli_rejects_unknown_rest_transitions() {
    let (_dir, employees, rules) = create_cli_test_environment();

    plan_week(&employees, &rules)
        .args(["--rest-transitions", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown rest transition mode"));
}

#[test]
fn test_cli_timeout_exit_code() {
    let (_dir, employees, rules) = create_cli_test_environment();

    plan_week(&employees, &rules)
        .args(["--time-limit", "0"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("gave up"));
}

#[test]
fn test_cli_missing_employees_file() {
    let (dir, _employees, rules) = create_cli_test_environment();
    let missing = dir.path().join("nobody.json");

    plan_week(&missing, &rules)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read employees"));
}

#[test]
fn test_cli_missing_rules_file_is_not_an_error() {
    let (dir, employees, _rules) = create_cli_test_environment();
    let config = dir.path().join("planner.toml");
    fs::write(&config, "coverage = []\n").unwrap();
    let missing = dir.path().join("no-rules.json");

    // Without rules no shift may follow another: at most four shifts a week.
    let employees_json = r#"[{"id": "1", "weeklyHours": 32}]"#;
    fs::write(&employees, employees_json).unwrap();

    plan_week(&employees, &missing)
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1,,,,,32,32.00,0.00"));
}

#[test]
fn test_cli_config_file_is_applied() {
    let (dir, employees, rules) = create_cli_test_environment();
    let config = dir.path().join("planner.yaml");
    fs::write(&config, "strategy: greedy\ngreedy:\n  start: 10\n").unwrap();

    plan_week(&employees, &rules)
        .args(["--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:00,18:00"));
}

#[test]
fn test_cli_rejects_unknown_strategy() {
    let (_dir, employees, rules) = create_cli_test_environment();

    plan_week(&employees, &rules)
        .args(["--strategy", "random"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown strategy"));
}
