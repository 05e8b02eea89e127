use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .canonicalize()
        .expect("fixtures directory present")
}

fn fitting(name: &str) -> PathBuf {
    fixtures().join("fittings").join(name)
}

fn pilots() -> PathBuf {
    fixtures().join("pilots.json")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("fitcheck-cli");
    cmd.env("RUST_LOG", "error")
        .env("NO_COLOR", "1")
        .env_remove("FITCHECK_MAX_PREREQ_DEPTH")
        .arg("--catalog-dir")
        .arg(fixtures().join("catalog"));
    cmd
}

#[test]
fn parse_prints_slots_by_category() {
    cli()
        .arg("parse")
        .arg(fitting("rifter_drones.eft"))
        .assert()
        .success()
        .stdout(contains("[Rifter, Drone Tackle]"))
        .stdout(contains("low slots (1):"))
        .stdout(contains("high slots (1):"))
        .stdout(contains("125mm Gatling AutoCannon II (2873)"))
        .stdout(contains("Hobgoblin II x5"));
}

#[test]
fn parse_json_uses_flat_slot_keys() {
    let output = cli()
        .args(["--format", "json", "parse"])
        .arg(fitting("tengu_shield.eft"))
        .output()
        .expect("run parse");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["shipname"], "Tengu");
    assert_eq!(json["fitname"], "Shield Tengu");
    assert_eq!(json["MedSlot1"]["id"], 3841);
    assert_eq!(json["SubSlot3"]["name"], "Tengu Propulsion - Fuel Catalyst");
    assert_eq!(json["dronebay"]["2456"]["qty"], 2);
    assert!(json.get("LoSlot0").is_none());
}

#[test]
fn skills_lists_transitive_requirements() {
    cli()
        .arg("skills")
        .arg(fitting("rifter_tackle.eft"))
        .assert()
        .success()
        .stdout(contains("Required skills (10):"))
        .stdout(contains("Astronautics Rigging"))
        .stdout(contains("Mechanics"));
}

#[test]
fn skills_ship_only_lists_hull_skills() {
    let output = cli()
        .args(["--format", "json", "skills", "--ship-only"])
        .arg(fitting("rifter_tackle.eft"))
        .output()
        .expect("run skills");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(
        json,
        serde_json::json!([
            {"typeId": 3327, "typeName": "Spaceship Command", "level": 1},
            {"typeId": 3329, "typeName": "Minmatar Frigate", "level": 1}
        ])
    );
}

#[test]
fn shallow_depth_cap_fails_resolution() {
    cli()
        .args(["--max-depth", "1", "skills"])
        .arg(fitting("rifter_tackle.eft"))
        .assert()
        .failure()
        .stderr(contains("exceeds maximum depth of 1"));
}

#[test]
fn zero_depth_cap_is_rejected() {
    cli()
        .args(["--max-depth", "0", "skills"])
        .arg(fitting("rifter_tackle.eft"))
        .assert()
        .failure()
        .stderr(contains("--max-depth"))
        .stderr(contains("PrerequisiteDepthExceeded").not());
}

#[test]
fn sheet_reports_missing_skills_per_pilot() {
    cli()
        .arg("sheet")
        .arg(fitting("rifter_tackle.eft"))
        .arg("--pilots")
        .arg(pilots())
        .assert()
        .success()
        .stdout(contains("Ada Veteran (90000001) ready"))
        .stdout(contains("Bo Frigate (90000002) ready"))
        .stdout(contains("Cy Novice (90000003) missing 7"))
        .stdout(contains("  Mechanics 2/3"));
}

#[test]
fn report_prints_totals_per_fit() {
    cli()
        .args(["report", "--name", "Frigates", "--pilots"])
        .arg(pilots())
        .arg(fitting("rifter_tackle.eft"))
        .arg(fitting("rifter_drones.eft"))
        .arg(fitting("tengu_shield.eft"))
        .assert()
        .success()
        .stdout(contains("Totals (3 pilots):"))
        .stdout(contains("  Tackle: ship 3, fit 2"))
        .stdout(contains("  Drone Tackle: ship 3, fit 1"))
        .stdout(contains("  Shield Tengu: ship 1, fit 1"));
}

#[test]
fn report_json_matches_presentation_shape() {
    let output = cli()
        .args(["--format", "json", "report", "--pilots"])
        .arg(pilots())
        .arg(fitting("rifter_tackle.eft"))
        .arg(fitting("tengu_shield.eft"))
        .output()
        .expect("run report");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["fittings"], serde_json::json!(["Tackle", "Shield Tengu"]));
    assert_eq!(json["chars"]["Cy Novice"]["Tackle"]["ship"], true);
    assert_eq!(json["chars"]["Cy Novice"]["Tackle"]["fit"], false);
    assert_eq!(json["totals"]["Shield Tengu"]["ship"], 1);
    assert_eq!(json["totals"]["chars"], 3);
}

#[test]
fn unknown_drone_suggests_close_name() {
    let temp = tempdir().expect("create temp dir");
    let path = temp.path().join("typo.eft");
    let text = fs::read_to_string(fitting("rifter_tackle.eft"))
        .expect("fixture present")
        .trim_end()
        .to_string()
        + "\n\nHobgoblim II x3\n";
    fs::write(&path, text).expect("write fitting");

    cli()
        .arg("parse")
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("unknown drone \"Hobgoblim II\""))
        .stderr(contains("Did you mean 'Hobgoblin II'"));
}

#[test]
fn missing_catalog_directory_is_reported() {
    let temp = tempdir().expect("create temp dir");
    let mut cmd = cargo_bin_cmd!("fitcheck-cli");
    cmd.env("RUST_LOG", "error")
        .arg("--catalog-dir")
        .arg(temp.path().join("nowhere"))
        .arg("parse")
        .arg(fitting("rifter_tackle.eft"))
        .assert()
        .failure()
        .stderr(contains("failed to load item catalog"));
}

#[test]
fn report_requires_fitting_files() {
    cli()
        .args(["report", "--pilots"])
        .arg(pilots())
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}
