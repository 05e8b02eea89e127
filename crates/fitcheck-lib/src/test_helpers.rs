// Test-only helpers for `fitcheck-lib` unit tests
use crate::catalog::StaticCatalog;

const TYPES_CSV: &str = include_str!("../../../docs/fixtures/catalog/types.csv");
const TYPE_ATTRIBUTES_CSV: &str =
    include_str!("../../../docs/fixtures/catalog/type_attributes.csv");

/// The shared fixture catalog (Rifter and Tengu hulls, their modules, drones and skills).
pub fn fixture_catalog() -> StaticCatalog {
    StaticCatalog::from_readers(TYPES_CSV.as_bytes(), TYPE_ATTRIBUTES_CSV.as_bytes())
        .expect("fixture catalog loads")
}
