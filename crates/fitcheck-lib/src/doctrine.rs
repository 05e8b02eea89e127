//! Doctrines: named groups of stored fittings, and the readiness report run over them.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::ItemCatalog;
use crate::config::FitcheckConfig;
use crate::error::{Error, ParseError, ResolveError, Result};
use crate::fitting::{parse_header, FittingParser};
use crate::readiness::{aggregate, FitId, FitRequirements, Pilot, ReadinessReport};
use crate::skills::{FitSkills, SkillResolver};

/// A fitting as stored: raw EFT text plus the names taken from its header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittingRecord {
    pub id: FitId,
    pub ship_type: String,
    pub fit_name: String,
    pub eft: String,
}

impl FittingRecord {
    /// Build a record from EFT text, taking ship type and fit name from the header line.
    pub fn from_eft(id: FitId, eft: impl Into<String>) -> std::result::Result<Self, ParseError> {
        let eft = eft.into();
        let header = eft
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();
        let (ship_type, fit_name) = parse_header(header)?;
        Ok(Self {
            id,
            ship_type,
            fit_name,
            eft,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctrine {
    pub name: String,
    pub fittings: Vec<FittingRecord>,
}

/// Parse and resolve every fitting of `doctrine`.
///
/// Ship skills come from the stored `ship_type` hull alone; fit skills add
/// every module and drone parsed from the EFT text. Failures name the
/// fitting that caused them.
pub fn resolve_doctrine<C: ItemCatalog + ?Sized>(
    doctrine: &Doctrine,
    catalog: &C,
    config: &FitcheckConfig,
) -> Result<Vec<FitRequirements>> {
    let parser = FittingParser::new(catalog).with_hull_rules(config.hull_rules());
    let resolver = SkillResolver::new(catalog).with_max_depth(config.max_prerequisite_depth);

    doctrine
        .fittings
        .iter()
        .map(|record| {
            let parsed = parser
                .parse(&record.eft)
                .map_err(|source| Error::InvalidFitting {
                    fitting: record.fit_name.clone(),
                    source,
                })?;
            let unresolved = |source: ResolveError| Error::UnresolvedFitting {
                fitting: record.fit_name.clone(),
                source,
            };

            if !parsed.ship_name.eq_ignore_ascii_case(&record.ship_type) {
                debug!(
                    fitting = %record.fit_name,
                    ship_type = %record.ship_type,
                    header = %parsed.ship_name,
                    "stored ship type differs from the EFT header"
                );
            }
            let hull = catalog
                .lookup_item_by_name(&record.ship_type)
                .map_err(|source| ResolveError::CatalogLookupFailed {
                    item: record.ship_type.clone(),
                    source,
                })
                .and_then(|found| {
                    found.ok_or_else(|| ResolveError::UnknownShip {
                        name: record.ship_type.clone(),
                    })
                })
                .map_err(&unresolved)?;

            let ship_skills = resolver.resolve_item(&hull).map_err(&unresolved)?;
            let mut fit_skills = ship_skills.clone();
            fit_skills.merge(&resolver.resolve(parsed.items()).map_err(&unresolved)?);
            let skills = FitSkills {
                ship_skills,
                fit_skills,
            };
            Ok(FitRequirements {
                id: record.id,
                name: record.fit_name.clone(),
                skills,
            })
        })
        .collect()
}

/// Readiness of `pilots` against every fitting in `doctrine`.
pub fn run_doctrine_report<C: ItemCatalog + ?Sized>(
    doctrine: &Doctrine,
    pilots: &[Pilot],
    catalog: &C,
    config: &FitcheckConfig,
) -> Result<ReadinessReport> {
    let fits = resolve_doctrine(doctrine, catalog, config)?;
    let matrix = aggregate(pilots, &fits);
    info!(
        doctrine = %doctrine.name,
        fittings = fits.len(),
        pilots = pilots.len(),
        "doctrine report complete"
    );
    Ok(ReadinessReport::from_matrix(&matrix, pilots, &fits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::fixture_catalog;

    #[test]
    fn record_takes_names_from_header() {
        let record = FittingRecord::from_eft(3, "\n[Rifter, Tackle]\nDamage Control II\n")
            .expect("valid header");
        assert_eq!(record.ship_type, "Rifter");
        assert_eq!(record.fit_name, "Tackle");
        assert_eq!(record.id, 3);
    }

    #[test]
    fn record_rejects_missing_header() {
        let err = FittingRecord::from_eft(1, "Damage Control II").expect_err("no header");
        assert!(matches!(err, ParseError::BadHeader { .. }));
    }

    #[test]
    fn failures_name_the_fitting() {
        let catalog = fixture_catalog();
        let doctrine = Doctrine {
            name: "Broken".to_string(),
            fittings: vec![FittingRecord {
                id: 1,
                ship_type: "Rifter".to_string(),
                fit_name: "Half".to_string(),
                eft: "[Rifter, Half]\n\nDamage Control II\n".to_string(),
            }],
        };
        let err = resolve_doctrine(&doctrine, &catalog, &FitcheckConfig::default())
            .expect_err("truncated");
        assert!(err.to_string().contains("\"Half\""));
        assert!(matches!(
            err,
            Error::InvalidFitting {
                source: ParseError::TruncatedFitting { found: 1 },
                ..
            }
        ));
    }

    #[test]
    fn ship_skills_follow_stored_ship_type() {
        let catalog = fixture_catalog();
        let doctrine = Doctrine {
            name: "Relabelled".to_string(),
            fittings: vec![FittingRecord {
                id: 1,
                ship_type: "Tengu".to_string(),
                fit_name: "Tackle".to_string(),
                eft: "[Rifter, Tackle]\n\nDamage Control II\n\nWarp Scrambler II\n\n125mm Gatling AutoCannon II\n\nSmall Auxiliary Thrusters I\n".to_string(),
            }],
        };
        let fits = resolve_doctrine(&doctrine, &catalog, &FitcheckConfig::default())
            .expect("resolves");
        let skills = &fits[0].skills;

        assert!(skills.ship_skills.contains(30651));
        assert!(!skills.ship_skills.contains(3329));
        assert!(skills.fit_skills.contains(30651));
        assert_eq!(skills.fit_skills.level(3435), Some(4));
        assert!(!skills.fit_skills.contains(3329));
    }

    #[test]
    fn unknown_stored_ship_type_names_the_fitting() {
        let catalog = fixture_catalog();
        let doctrine = Doctrine {
            name: "Ghost".to_string(),
            fittings: vec![FittingRecord {
                id: 1,
                ship_type: "Flying Dutchman".to_string(),
                fit_name: "Haunt".to_string(),
                eft: "[Rifter, Haunt]\n\nDamage Control II\n\nWarp Scrambler II\n\n125mm Gatling AutoCannon II\n\nSmall Auxiliary Thrusters I\n".to_string(),
            }],
        };
        let err = resolve_doctrine(&doctrine, &catalog, &FitcheckConfig::default())
            .expect_err("unknown hull");
        match err {
            Error::UnresolvedFitting {
                fitting,
                source: ResolveError::UnknownShip { name },
            } => {
                assert_eq!(fitting, "Haunt");
                assert_eq!(name, "Flying Dutchman");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
