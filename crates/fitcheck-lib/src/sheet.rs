//! Per-fit training sheet: every pilot's level and rank for each skill.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{AttributeKind, ItemCatalog, TypeId};
use crate::error::CatalogError;
use crate::readiness::{Pilot, PilotId};
use crate::skills::{skill_listing, SkillListing, SkillRequirementSet};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainedSkill {
    pub level: u8,
    /// Training time multiplier; `None` when the catalog has no rank.
    pub rank: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSkills {
    pub id: PilotId,
    pub name: String,
    pub skill: BTreeMap<TypeId, TrainedSkill>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSheet {
    pub skills: Vec<SkillListing>,
    pub characters: BTreeMap<PilotId, CharacterSkills>,
}

/// Build the sheet for `required` across `pilots`.
///
/// Required skills a pilot has not trained are filled in at level 0.
pub fn build_skill_sheet<C: ItemCatalog + ?Sized>(
    required: &SkillRequirementSet,
    pilots: &[Pilot],
    catalog: &C,
) -> Result<SkillSheet, CatalogError> {
    let mut ranks: BTreeMap<TypeId, Option<f64>> = BTreeMap::new();
    let mut rank_of = |skill_id: TypeId| -> Result<Option<f64>, CatalogError> {
        if let Some(rank) = ranks.get(&skill_id) {
            return Ok(*rank);
        }
        let rank = catalog
            .attribute(skill_id, AttributeKind::SkillRank)?
            .map(|value| value.as_f64());
        ranks.insert(skill_id, rank);
        Ok(rank)
    };

    let mut characters = BTreeMap::new();
    for pilot in pilots {
        let mut skill = BTreeMap::new();
        for (skill_id, level) in pilot.skills.iter() {
            skill.insert(
                skill_id,
                TrainedSkill {
                    level,
                    rank: rank_of(skill_id)?,
                },
            );
        }
        for (skill_id, _) in required.iter() {
            if !skill.contains_key(&skill_id) {
                skill.insert(
                    skill_id,
                    TrainedSkill {
                        level: 0,
                        rank: rank_of(skill_id)?,
                    },
                );
            }
        }
        characters.insert(
            pilot.id,
            CharacterSkills {
                id: pilot.id,
                name: pilot.name.clone(),
                skill,
            },
        );
    }

    Ok(SkillSheet {
        skills: skill_listing(required, catalog)?,
        characters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::fixture_catalog;

    #[test]
    fn fills_untrained_required_skills_with_level_zero() {
        let catalog = fixture_catalog();
        let required: SkillRequirementSet = [(3329, 1), (3327, 1)].into_iter().collect();
        let pilots = [Pilot {
            id: 42,
            name: "Ann".to_string(),
            skills: [(3327, 4), (3300, 2)].into_iter().collect(),
        }];

        let sheet = build_skill_sheet(&required, &pilots, &catalog).expect("builds");
        let ann = &sheet.characters[&42];

        assert_eq!(ann.skill[&3327].level, 4);
        assert_eq!(ann.skill[&3327].rank, Some(1.0));
        assert_eq!(ann.skill[&3329].level, 0);
        assert_eq!(ann.skill[&3329].rank, Some(2.0));
        assert_eq!(ann.skill[&3300].level, 2);
        assert_eq!(sheet.skills.len(), 2);
        assert_eq!(sheet.skills[0].type_name, "Spaceship Command");
    }

    #[test]
    fn serializes_with_nested_maps() {
        let catalog = fixture_catalog();
        let required: SkillRequirementSet = [(3327, 1)].into_iter().collect();
        let pilots = [Pilot {
            id: 1,
            name: "Ann".to_string(),
            skills: Default::default(),
        }];
        let sheet = build_skill_sheet(&required, &pilots, &catalog).expect("builds");
        let json = serde_json::to_value(&sheet).expect("serializes");
        assert_eq!(json["characters"]["1"]["name"], "Ann");
        assert_eq!(json["characters"]["1"]["skill"]["3327"]["level"], 0);
        assert_eq!(json["skills"][0]["typeId"], 3327);
    }
}
