//! ---
//! ems_section: "15-testing-qa-runbook"
//! ems_subsection: "integration-tests"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Command-line tests for the simulation runner."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::tempdir;

fn h2simctl(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("h2simctl").unwrap();
    cmd.current_dir(workdir)
        .env_remove("H2SIM_CONFIG")
        .env("H2SIM_LOG", "warn");
    cmd
}

#[test]
fn version_flag_prints_package() {
    let dir = tempdir().unwrap();
    let output = h2simctl(dir.path()).arg("-V").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("h2simctl "), "{stdout}");
    assert!(stdout.contains("(msrv 1.82)"), "{stdout}");
}

#[test]
fn defaults_print_kwh_parameters_as_toml() {
    let dir = tempdir().unwrap();
    let output = h2simctl(dir.path())
        .args(["defaults", "--unit", "kwh"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("h2_lhv = 33.33"), "{stdout}");
    assert!(stdout.contains("capex = 16000000.0"), "{stdout}");
}

#[test]
fn demo_writes_reports_and_prints_json_summary() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let output = h2simctl(dir.path())
        .args(["demo", "--json", "--output"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["months"], 12);
    for file in ["monthly_results.json", "annual_summary.json", "monthly_results.csv"] {
        assert!(out.join(file).is_file(), "missing {file}");
    }
}

#[test]
fn run_reads_csv_profile_and_prints_table() {
    let dir = tempdir().unwrap();
    let profile = dir.path().join("plant.csv");
    let mut text = String::from("month,solar_mwh,demand_mwh\n");
    for month in ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"] {
        text.push_str(&format!("{month},80,80\n"));
    }
    fs::write(&profile, text).unwrap();

    let output = h2simctl(dir.path())
        .args(["run", "--profile"])
        .arg(&profile)
        .args(["--output", "reports"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("import_mwh"));
    assert!(stdout.lines().any(|line| line.starts_with("Dec")));
    assert!(dir.path().join("reports").join("monthly_results.csv").is_file());
}

#[test]
fn run_rejects_short_profile() {
    let dir = tempdir().unwrap();
    let profile = dir.path().join("short.csv");
    fs::write(&profile, "month,solar_mwh,demand_mwh\nJan,80,80\n").unwrap();

    let output = h2simctl(dir.path())
        .args(["run", "--profile"])
        .arg(&profile)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exactly 12 months"), "{stderr}");
}
