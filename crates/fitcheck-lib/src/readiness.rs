//! Doctrine readiness matrix.
//!
//! Cross-references each pilot's trained skills against each fit's ship and
//! full-fit requirements. A skill missing from a pilot's profile counts as
//! level 0, so the matrix is always complete.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::TypeId;
use crate::skills::{FitSkills, SkillRequirementSet};

/// Character identifier.
pub type PilotId = i64;

/// Stored fitting identifier.
pub type FitId = i64;

/// Trained level per skill for one pilot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PilotSkillProfile {
    levels: BTreeMap<TypeId, u8>,
}

impl PilotSkillProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, skill_id: TypeId, level: u8) {
        self.levels.insert(skill_id, level);
    }

    /// Trained level of `skill_id`; untrained skills are level 0.
    pub fn trained_level(&self, skill_id: TypeId) -> u8 {
        self.levels.get(&skill_id).copied().unwrap_or(0)
    }

    /// Whether every requirement in `required` is met.
    pub fn satisfies(&self, required: &SkillRequirementSet) -> bool {
        required
            .iter()
            .all(|(skill_id, level)| self.trained_level(skill_id) >= level)
    }

    /// Trained skills ordered by skill id.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, u8)> + '_ {
        self.levels.iter().map(|(&id, &level)| (id, level))
    }
}

impl FromIterator<(TypeId, u8)> for PilotSkillProfile {
    fn from_iter<I: IntoIterator<Item = (TypeId, u8)>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

/// A pilot as supplied by the character data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: PilotId,
    pub name: String,
    #[serde(default)]
    pub skills: PilotSkillProfile,
}

/// A fit ready for aggregation: its identity plus its resolved skills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitRequirements {
    pub id: FitId,
    pub name: String,
    pub skills: FitSkills,
}

/// Outcome for one pilot and one fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadinessEntry {
    pub pilot_id: PilotId,
    pub fit_id: FitId,
    pub can_fly_ship: bool,
    pub can_fly_fit: bool,
}

/// Per-fit counts of qualified pilots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FitTotals {
    pub fit_id: FitId,
    pub ship_capable_count: usize,
    pub fit_capable_count: usize,
}

/// Complete pilot × fit grid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadinessMatrix {
    /// One entry per (pilot, fit), pilots in input order, fits in input order.
    pub entries: Vec<ReadinessEntry>,
    pub totals: BTreeMap<FitId, FitTotals>,
}

impl ReadinessMatrix {
    pub fn entry(&self, pilot_id: PilotId, fit_id: FitId) -> Option<&ReadinessEntry> {
        self.entries
            .iter()
            .find(|e| e.pilot_id == pilot_id && e.fit_id == fit_id)
    }
}

/// Build the readiness grid for every pilot against every fit.
pub fn aggregate(pilots: &[Pilot], fits: &[FitRequirements]) -> ReadinessMatrix {
    let mut totals: BTreeMap<FitId, FitTotals> = fits
        .iter()
        .map(|fit| {
            (
                fit.id,
                FitTotals {
                    fit_id: fit.id,
                    ..FitTotals::default()
                },
            )
        })
        .collect();

    let mut entries = Vec::with_capacity(pilots.len() * fits.len());
    for pilot in pilots {
        for fit in fits {
            let entry = ReadinessEntry {
                pilot_id: pilot.id,
                fit_id: fit.id,
                can_fly_ship: pilot.skills.satisfies(&fit.skills.ship_skills),
                can_fly_fit: pilot.skills.satisfies(&fit.skills.fit_skills),
            };
            if let Some(total) = totals.get_mut(&fit.id) {
                total.ship_capable_count += usize::from(entry.can_fly_ship);
                total.fit_capable_count += usize::from(entry.can_fly_fit);
            }
            entries.push(entry);
        }
    }

    debug!(
        pilots = pilots.len(),
        fits = fits.len(),
        "aggregated readiness matrix"
    );
    ReadinessMatrix { entries, totals }
}

const TOTALS_PILOT_KEY: &str = "chars";

/// Ship/fit flags or counts, keyed by name in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ShipFit<T> {
    pub ship: T,
    pub fit: T,
}

/// Report totals: one entry per fit name, plus the pilot count under `chars`.
///
/// Fits sharing a name share one entry holding their summed counts. A fit
/// literally named `chars` cannot be told apart from the pilot count once
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    #[serde(flatten)]
    pub fits: BTreeMap<String, ShipFit<usize>>,
    pub chars: usize,
}

/// Name-keyed rendering of a [`ReadinessMatrix`] for presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    pub fittings: Vec<String>,
    pub chars: BTreeMap<String, BTreeMap<String, ShipFit<bool>>>,
    pub totals: ReportTotals,
}

impl ReadinessReport {
    pub fn from_matrix(
        matrix: &ReadinessMatrix,
        pilots: &[Pilot],
        fits: &[FitRequirements],
    ) -> Self {
        let pilot_names: BTreeMap<PilotId, &str> =
            pilots.iter().map(|p| (p.id, p.name.as_str())).collect();
        let fit_names: BTreeMap<FitId, &str> =
            fits.iter().map(|f| (f.id, f.name.as_str())).collect();

        let mut chars: BTreeMap<String, BTreeMap<String, ShipFit<bool>>> = BTreeMap::new();
        for entry in &matrix.entries {
            let (Some(pilot), Some(fit)) = (
                pilot_names.get(&entry.pilot_id),
                fit_names.get(&entry.fit_id),
            ) else {
                continue;
            };
            chars.entry(pilot.to_string()).or_default().insert(
                fit.to_string(),
                ShipFit {
                    ship: entry.can_fly_ship,
                    fit: entry.can_fly_fit,
                },
            );
        }

        let mut fit_totals: BTreeMap<String, ShipFit<usize>> = BTreeMap::new();
        for total in matrix.totals.values() {
            let Some(name) = fit_names.get(&total.fit_id) else {
                continue;
            };
            if *name == TOTALS_PILOT_KEY {
                warn!(
                    fit_id = total.fit_id,
                    "fit named {TOTALS_PILOT_KEY:?} collides with the pilot count in report totals"
                );
            }
            let entry = fit_totals.entry(name.to_string()).or_default();
            entry.ship += total.ship_capable_count;
            entry.fit += total.fit_capable_count;
        }

        Self {
            fittings: fits.iter().map(|f| f.name.clone()).collect(),
            chars,
            totals: ReportTotals {
                fits: fit_totals,
                chars: pilots.len(),
            },
        }
    }
}
