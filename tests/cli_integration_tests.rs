//! CLI Integration Tests
//!
//! Tests the CLI binary directly using assert_cmd to exercise main.rs code paths.

// Skip CLI tests during coverage builds
#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;

const SALES: &str = "{region: [EMEA, US, EMEA], year: [2023, 2024, 2024], amount: [100, 250, 300]}";

fn sheetcalc() -> Command {
    let mut cmd = Command::cargo_bin("sheetcalc").unwrap();
    cmd.env_remove("SHEETCALC_BASIS")
        .env_remove("SHEETCALC_HOLIDAYS")
        .env_remove("SHEETCALC_WEEKDAY_MODE")
        .env_remove("SHEETCALC_LOG");
    cmd
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    sheetcalc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sheetcalc"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    sheetcalc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sheetcalc"));
}

#[test]
fn test_yearfrac_help_lists_bases() {
    sheetcalc()
        .args(["yearfrac", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("act/360"));
}

// ═══════════════════════════════════════════════════════════════════════════
// DATE COMMANDS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_serial() {
    sheetcalc()
        .args(["serial", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("45292"));
}

#[test]
fn test_from_serial_integer_and_fraction() {
    sheetcalc()
        .args(["from-serial", "45292"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01"));

    sheetcalc()
        .args(["from-serial", "45292.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01 12:00:00"));
}

#[test]
fn test_edate_negative_months() {
    sheetcalc()
        .args(["edate", "2023-12-31", "-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-11-30"));
}

#[test]
fn test_eomonth() {
    sheetcalc()
        .args(["eomonth", "2024-01-15", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-02-29"));
}

#[test]
fn test_days360_european_flag() {
    sheetcalc()
        .args(["days360", "2024-01-31", "2024-03-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("60"));

    sheetcalc()
        .args(["days360", "2024-01-31", "2024-03-31", "--european"])
        .assert()
        .success()
        .stdout(predicate::str::contains("61"));
}

#[test]
fn test_yearfrac_default_basis() {
    sheetcalc()
        .args(["yearfrac", "2024-01-31", "2024-02-29"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.080556"));
}

#[test]
fn test_yearfrac_basis_from_env() {
    sheetcalc()
        .env("SHEETCALC_BASIS", "act/360")
        .args(["yearfrac", "2024-01-01", "2024-01-19"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.05"));
}

#[test]
fn test_yearfrac_unknown_basis_fails() {
    sheetcalc()
        .args(["yearfrac", "2024-01-01", "2024-06-30", "--basis", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_workday_with_holidays() {
    sheetcalc()
        .args(["workday", "2024-01-05", "1", "--holidays", "2024-01-08"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-09"));
}

#[test]
fn test_networkdays_holidays_from_env() {
    sheetcalc()
        .env("SHEETCALC_HOLIDAYS", "2024-01-01")
        .args(["networkdays", "2024-01-01", "2024-01-12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9"));
}

#[test]
fn test_weekday_modes() {
    sheetcalc()
        .args(["weekday", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));

    sheetcalc()
        .args(["weekday", "2024-01-01", "--mode", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_weekday_unknown_mode_fails() {
    sheetcalc()
        .args(["weekday", "2024-01-01", "--mode", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown return type 4"));
}

#[test]
fn test_invalid_date_fails() {
    sheetcalc()
        .args(["serial", "2024-13-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

// ═══════════════════════════════════════════════════════════════════════════
// AGGREGATE COMMAND
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_aggregate_sum_with_criteria() {
    sheetcalc()
        .args(["aggregate", "sum", "amount", "--table", SALES, "region", "EMEA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUMIFS(amount)"))
        .stdout(predicate::str::contains("400"));
}

#[test]
fn test_aggregate_typed_number_criterion() {
    sheetcalc()
        .args([
            "aggregate", "sum", "amount", "--table", SALES, "region", "EMEA", "year", "2024",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("300"));
}

#[test]
fn test_aggregate_odd_criteria_fails() {
    sheetcalc()
        .args(["aggregate", "sum", "amount", "--table", SALES, "region"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("odd number of criteria"));
}

#[test]
fn test_aggregate_matches_regex() {
    sheetcalc()
        .args([
            "aggregate", "count", "amount", "--table", SALES, "--matches", "region=^E",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("COUNTIFS(amount)"))
        .stdout(predicate::str::contains("2"));
}

#[test]
fn test_aggregate_empty_selection_json() {
    sheetcalc()
        .args([
            "--json", "aggregate", "average", "amount", "--table", SALES, "region", "APAC",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"function\": \"AVERAGEIFS\""))
        .stdout(predicate::str::contains("\"result\": null"));
}

#[test]
fn test_aggregate_bad_table_fails() {
    sheetcalc()
        .args(["aggregate", "sum", "amount", "--table", "{amount: [1, x]}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected Number"));
}

// ═══════════════════════════════════════════════════════════════════════════
// JSON OUTPUT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_serial_json() {
    sheetcalc()
        .args(["serial", "2024-01-01", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"serial\": 45292"))
        .stdout(predicate::str::contains("\"date\": \"2024-01-01\""));
}
