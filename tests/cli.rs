use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

use precip_trends::loader::{future_file, historical_file};
use precip_trends::models::Region;

fn write_fixtures(dir: &Path) {
    for region in Region::ALL {
        fs::write(
            dir.join(historical_file(region)),
            "year,pr\n2000,2.0e-5\n2005,2.5e-5\n2012,2.2e-5\n",
        )
        .unwrap();
        fs::write(
            dir.join(future_file(region)),
            "year,low_emissions_pr,high_emissions_pr\n2020,3.0e-5,4.0e-5\n2030,3.1e-5,4.1e-5\n",
        )
        .unwrap();
    }
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("precip"));
}

#[test]
fn render_writes_an_svg() {
    let data = tempdir().unwrap();
    write_fixtures(data.path());
    let out = data.path().join("chart.svg");

    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args([
        "--data",
        data.path().to_str().unwrap(),
        "render",
        "--region",
        "northeast",
        "--out",
        out.to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Wrote chart"));
    assert!(out.exists());
}

#[test]
fn render_rejects_unknown_regions() {
    let data = tempdir().unwrap();
    write_fixtures(data.path());
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args([
        "--data",
        data.path().to_str().unwrap(),
        "render",
        "--region",
        "atlantis",
        "--out",
        "x.svg",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown region"));
}

#[test]
fn summary_prints_every_series() {
    let data = tempdir().unwrap();
    write_fixtures(data.path());
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["--data", data.path().to_str().unwrap(), "summary"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("northeast • historical"))
        .stdout(predicate::str::contains("northwest • high"));
}

#[test]
fn summary_saves_csv() {
    let data = tempdir().unwrap();
    write_fixtures(data.path());
    let out = data.path().join("summary.csv");
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args([
        "--data",
        data.path().to_str().unwrap(),
        "summary",
        "--out",
        out.to_str().unwrap(),
    ]);
    cmd.assert().success();
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("region,scenario,count"));
    // 4 regions × 3 scenarios plus the header.
    assert_eq!(text.lines().count(), 13);
}

#[test]
fn impact_marks_estimates_as_illustrative() {
    let data = tempdir().unwrap();
    write_fixtures(data.path());
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args([
        "--data",
        data.path().to_str().unwrap(),
        "impact",
        "--region",
        "midwest",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Illustrative"))
        .stdout(predicate::str::contains("Midwest"));
}

#[test]
fn missing_data_dir_fails_cleanly() {
    let mut cmd = Command::cargo_bin("precip").unwrap();
    cmd.args(["--data", "/nonexistent/dir", "summary"]);
    cmd.assert().failure();
}
