//! Fitcheck library entry points.
//!
//! This crate parses EFT fitting text into typed slot assignments, resolves
//! the transitive skill requirements of hulls, modules and drones through an
//! [`ItemCatalog`], and aggregates those requirements against pilots' trained
//! skills into a doctrine readiness matrix. Higher-level consumers (the CLI,
//! web front ends) should only depend on the functions exported here instead
//! of reimplementing behavior.

#![deny(warnings)]

pub mod catalog;
pub mod config;
pub mod doctrine;
pub mod error;
pub mod fitting;
pub mod hull;
pub mod readiness;
pub mod sheet;
pub mod skills;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use catalog::{AttributeKind, AttributeValue, ItemCatalog, ItemRef, StaticCatalog, TypeId};
pub use config::FitcheckConfig;
pub use doctrine::{resolve_doctrine, run_doctrine_report, Doctrine, FittingRecord};
pub use error::{CatalogError, Error, ParseError, ResolveError, Result};
pub use fitting::{parse_fitting, parse_header, FittingParser, ParsedFitting, SlotCategory, SlotKey};
pub use hull::HullRules;
pub use readiness::{
    aggregate, FitRequirements, FitTotals, Pilot, PilotSkillProfile, ReadinessEntry,
    ReadinessMatrix, ReadinessReport,
};
pub use sheet::{build_skill_sheet, SkillSheet};
pub use skills::{skill_listing, FitSkills, SkillListing, SkillRequirementSet, SkillResolver};
