//! Integration tests for the titra binary.
//!
//! These tests verify end-to-end behavior including:
//! - Calculation output and validation
//! - History recording, listing and clearing
//! - CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("titra"))
}

/// A basic acid-base calculation: 0.1 M titrant, 25 mL, 50 mL sample
fn basic_calc(data_dir: &Path) -> Command {
    let mut cmd = cli();
    cmd.arg("calc")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--titrant", "NaOH", "--analyte", "HCl"])
        .args(["--concentration", "0.1"])
        .args(["--volume", "25", "--sample-volume", "50"]);
    cmd
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Titration concentration and purity calculator",
        ));
}

#[test]
fn test_calc_prints_concentration() {
    let temp_dir = setup_test_dir();

    basic_calc(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Calculation Results for HCl"))
        .stdout(predicate::str::contains("0.05 mol/L"))
        .stdout(predicate::str::contains("Saved to history"));
}

#[test]
fn test_calc_json_output() {
    let temp_dir = setup_test_dir();

    let output = basic_calc(temp_dir.path())
        .arg("--json")
        .arg("--no-save")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let result: Value = serde_json::from_slice(&output).expect("valid JSON");
    let molarity = result["analyte_concentration_mol_l"].as_f64().unwrap();
    assert!((molarity - 0.05).abs() < 1e-12);
    assert!(result.get("analyte_purity").is_none());
}

#[test]
fn test_calc_mass_and_purity() {
    let temp_dir = setup_test_dir();

    let output = cli()
        .arg("calc")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["--analyte", "Acetic Acid", "--concentration", "0.1"])
        .args(["--volume", "10", "--sample-volume", "50"])
        .args(["--mass", "--molar-mass", "60.05", "--sample-mass", "2"])
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let result: Value = serde_json::from_slice(&output).unwrap();
    let purity = result["analyte_purity"].as_f64().unwrap();
    let mass = result["analyte_mass_in_sample"].as_f64().unwrap();
    assert!((purity - 3.0025).abs() < 1e-9);
    assert!((mass - 0.06005).abs() < 1e-12);
}

#[test]
fn test_calc_normality() {
    let temp_dir = setup_test_dir();

    let output = cli()
        .arg("calc")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["--concentration", "0.1", "--unit", "normality", "--n-factor", "2"])
        .args(["--volume", "20", "--sample-volume", "25"])
        .args(["--json", "--no-save"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let result: Value = serde_json::from_slice(&output).unwrap();
    let moles = result["moles_of_titrant"].as_f64().unwrap();
    let equivalents = result["equivalents_of_titrant"].as_f64().unwrap();
    assert!((moles - 0.001).abs() < 1e-12);
    assert!((equivalents - 0.002).abs() < 1e-12);
}

#[test]
fn test_normality_without_n_factor_rejected() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("calc")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["--concentration", "0.1", "--unit", "normality"])
        .args(["--volume", "20", "--sample-volume", "25"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("n-factor"));

    assert!(!temp_dir.path().join("history.jsonl").exists());
}

#[test]
fn test_zero_stoichiometry_rejected() {
    let temp_dir = setup_test_dir();

    basic_calc(temp_dir.path())
        .args(["--titrant-stoich", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("titrant stoichiometry"));
}

#[test]
fn test_validation_problems_reported_once() {
    let temp_dir = setup_test_dir();

    let output = basic_calc(temp_dir.path())
        .args(["--titrant-stoich", "0", "--analyte-stoich", "0"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();

    let stderr = String::from_utf8_lossy(&output);
    assert_eq!(stderr.matches("titrant stoichiometry").count(), 1, "{}", stderr);
    assert_eq!(stderr.matches("analyte stoichiometry").count(), 1, "{}", stderr);
    assert!(stderr.contains("2 problem(s) with titration input"));
}

#[test]
fn test_blank_larger_than_volume_warns() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("calc")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .args(["--concentration", "0.1", "--volume", "5", "--blank", "10"])
        .args(["--sample-volume", "50", "--no-save"])
        .assert()
        .success()
        .stderr(predicate::str::contains("blank volume exceeds titration volume"));
}

#[test]
fn test_no_save_does_not_record() {
    let temp_dir = setup_test_dir();

    basic_calc(temp_dir.path())
        .arg("--no-save")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to history").not());

    assert!(!temp_dir.path().join("history.jsonl").exists());
}

#[test]
fn test_history_lists_newest_first() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for analyte in ["first", "second", "third"] {
        cli()
            .arg("calc")
            .arg("--data-dir")
            .arg(data_dir)
            .args(["--analyte", analyte, "--concentration", "0.1"])
            .args(["--volume", "25", "--sample-volume", "50"])
            .assert()
            .success();
    }

    let output = cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let records: Vec<Value> = serde_json::from_slice(&output).unwrap();
    let names: Vec<_> = records
        .iter()
        .map(|r| r["input"]["analyte_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["third", "second", "first"]);

    let ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert!(ids[0] > ids[1] && ids[1] > ids[2]);

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .args(["--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("third"))
        .stdout(predicate::str::contains("first").not());
}

#[test]
fn test_empty_history() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No calculations yet."));
}

#[test]
fn test_clear_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    basic_calc(data_dir).assert().success();
    basic_calc(data_dir).assert().success();

    cli()
        .arg("clear")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 calculations"));

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No calculations yet."));
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    for _ in 0..3 {
        basic_calc(data_dir).assert().success();
    }

    let csv_path = data_dir.join("export/history.csv");
    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--out")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 calculations"));

    let csv_content = fs::read_to_string(&csv_path).expect("Failed to read CSV");
    assert!(csv_content.starts_with("id,created_at,titration_type"));
    assert_eq!(csv_content.lines().count(), 4);
}

#[test]
fn test_history_disabled_in_config() {
    let temp_dir = setup_test_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[history]\nenabled = false\n").unwrap();

    basic_calc(temp_dir.path())
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    assert!(!temp_dir.path().join("history.jsonl").exists());
}

#[test]
fn test_types_lists_labels() {
    cli()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("Redox"))
        .stdout(predicate::str::contains("Oxidizing Agent"))
        .stdout(predicate::str::contains("Precipitating Agent (Titrant)"));
}

#[test]
fn test_invalid_type_rejected() {
    let temp_dir = setup_test_dir();

    basic_calc(temp_dir.path())
        .args(["--type", "gravimetric"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown titration type"));
}
