mod common;

use std::fs;

use fitcheck_lib::catalog::{AttributeKind, ItemCatalog, TYPES_FILE};
use fitcheck_lib::{Error, StaticCatalog};
use tempfile::tempdir;

use common::{fixture_catalog, fixtures_dir};

#[test]
fn loads_fixture_directory() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.len(), 29);
    assert_eq!(
        catalog.source_path(),
        Some(fixtures_dir().join("catalog").as_path())
    );

    let tengu = catalog
        .lookup_item_by_name("TENGU")
        .expect("lookup")
        .expect("tengu present");
    let slots = catalog
        .attribute(tengu.type_id, AttributeKind::SubsystemSlots)
        .expect("lookup")
        .map(|v| v.as_f64());
    assert_eq!(slots, Some(4.0));
}

#[test]
fn missing_attribute_file_is_reported() {
    let dir = tempdir().expect("create temp dir");
    fs::copy(
        fixtures_dir().join("catalog").join(TYPES_FILE),
        dir.path().join(TYPES_FILE),
    )
    .expect("copy types");

    let err = StaticCatalog::from_dir(dir.path()).expect_err("attributes missing");
    match err {
        Error::CatalogFileNotFound { path } => {
            assert!(path.ends_with("type_attributes.csv"))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
