#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use fitcheck_lib::{Pilot, StaticCatalog};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture_catalog() -> StaticCatalog {
    StaticCatalog::from_dir(&fixtures_dir().join("catalog")).expect("fixture catalog loads")
}

pub fn fitting_text(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join("fittings").join(name)).expect("fixture fitting present")
}

pub fn fixture_pilots() -> Vec<Pilot> {
    let raw = fs::read_to_string(fixtures_dir().join("pilots.json")).expect("pilots fixture");
    serde_json::from_str(&raw).expect("pilots fixture parses")
}
