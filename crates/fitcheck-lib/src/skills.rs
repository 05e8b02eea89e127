//! Skill requirement resolution.
//!
//! Every item names up to six prerequisite skills with a minimum level. Those
//! skills are items too and carry prerequisites of their own, so the full
//! requirement for an item is the transitive closure of that relation, keeping
//! the highest level demanded for each skill.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, trace};

use crate::catalog::{AttributeKind, ItemCatalog, ItemRef, TypeId, REQUIRED_SKILL_SLOTS};
use crate::config::DEFAULT_MAX_PREREQUISITE_DEPTH;
use crate::error::{CatalogError, ResolveError};
use crate::fitting::ParsedFitting;

/// Highest level a skill can be trained to.
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Skill id to the highest minimum level demanded for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillRequirementSet {
    levels: BTreeMap<TypeId, u8>,
}

impl SkillRequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a requirement, keeping the higher level if the skill is already present.
    pub fn record(&mut self, skill_id: TypeId, level: u8) {
        let level = level.min(MAX_SKILL_LEVEL);
        self.levels
            .entry(skill_id)
            .and_modify(|current| *current = (*current).max(level))
            .or_insert(level);
    }

    /// Fold every requirement of `other` into this set.
    pub fn merge(&mut self, other: &SkillRequirementSet) {
        for (&skill_id, &level) in &other.levels {
            self.record(skill_id, level);
        }
    }

    pub fn level(&self, skill_id: TypeId) -> Option<u8> {
        self.levels.get(&skill_id).copied()
    }

    pub fn contains(&self, skill_id: TypeId) -> bool {
        self.levels.contains_key(&skill_id)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Requirements ordered by skill id.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, u8)> + '_ {
        self.levels.iter().map(|(&id, &level)| (id, level))
    }
}

impl FromIterator<(TypeId, u8)> for SkillRequirementSet {
    fn from_iter<I: IntoIterator<Item = (TypeId, u8)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (skill_id, level) in iter {
            set.record(skill_id, level);
        }
        set
    }
}

/// Skill requirements of a fitting, split by what they gate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FitSkills {
    /// Closure of the bare hull.
    pub ship_skills: SkillRequirementSet,
    /// Closure of the hull, every module and every drone type. Always a
    /// superset of `ship_skills`.
    pub fit_skills: SkillRequirementSet,
}

/// Display row for a single required skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillListing {
    pub type_id: TypeId,
    pub type_name: String,
    pub level: u8,
}

/// Pending prerequisites of one item on the active expansion path.
struct Frame {
    type_id: TypeId,
    prerequisites: Vec<(TypeId, u8)>,
    next: usize,
}

/// Computes prerequisite closures against a catalog.
///
/// The resolver holds no accumulated state; each call builds and returns its
/// own [`SkillRequirementSet`].
pub struct SkillResolver<'c, C: ?Sized> {
    catalog: &'c C,
    max_depth: usize,
}

impl<'c, C: ItemCatalog + ?Sized> SkillResolver<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self {
            catalog,
            max_depth: DEFAULT_MAX_PREREQUISITE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Closure of a single item.
    pub fn resolve_item(&self, item: &ItemRef) -> Result<SkillRequirementSet, ResolveError> {
        self.resolve(std::slice::from_ref(item))
    }

    /// Closure over all `items`, max level wins per skill.
    pub fn resolve<'i, I>(&self, items: I) -> Result<SkillRequirementSet, ResolveError>
    where
        I: IntoIterator<Item = &'i ItemRef>,
    {
        let mut required = SkillRequirementSet::new();
        let mut expanded = HashSet::new();
        for item in items {
            self.expand(item.type_id, &mut required, &mut expanded)?;
        }
        Ok(required)
    }

    /// Ship and full-fit closures for a parsed fitting.
    pub fn resolve_fitting(&self, fit: &ParsedFitting) -> Result<FitSkills, ResolveError> {
        let ship = self
            .catalog
            .lookup_item_by_name(&fit.ship_name)
            .map_err(|source| ResolveError::CatalogLookupFailed {
                item: fit.ship_name.clone(),
                source,
            })?
            .ok_or_else(|| ResolveError::UnknownShip {
                name: fit.ship_name.clone(),
            })?;

        let ship_skills = self.resolve_item(&ship)?;
        let mut fit_skills = ship_skills.clone();
        fit_skills.merge(&self.resolve(fit.items())?);

        debug!(
            ship = %fit.ship_name,
            fit = %fit.fit_name,
            ship_skills = ship_skills.len(),
            fit_skills = fit_skills.len(),
            "resolved fitting skills"
        );
        Ok(FitSkills {
            ship_skills,
            fit_skills,
        })
    }

    /// Depth-first walk from `root` using an explicit stack.
    ///
    /// Skills on the active path are never re-entered, which keeps cyclic
    /// data finite. Skills whose subtree has been fully walked are not walked
    /// again; their contributions are already in `required` and do not depend
    /// on how they were reached.
    fn expand(
        &self,
        root: TypeId,
        required: &mut SkillRequirementSet,
        expanded: &mut HashSet<TypeId>,
    ) -> Result<(), ResolveError> {
        if expanded.contains(&root) {
            return Ok(());
        }

        let mut on_path: HashSet<TypeId> = HashSet::from([root]);
        let mut stack = vec![Frame {
            type_id: root,
            prerequisites: self.prerequisites(root)?,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(&(skill_id, level)) = frame.prerequisites.get(frame.next) else {
                let done = frame.type_id;
                stack.pop();
                on_path.remove(&done);
                expanded.insert(done);
                continue;
            };
            frame.next += 1;
            required.record(skill_id, level);

            if on_path.contains(&skill_id) {
                trace!(skill_id, "prerequisite already on the active path");
                continue;
            }
            if expanded.contains(&skill_id) {
                continue;
            }
            if stack.len() >= self.max_depth {
                return Err(ResolveError::PrerequisiteDepthExceeded {
                    type_id: root,
                    max_depth: self.max_depth,
                });
            }

            on_path.insert(skill_id);
            stack.push(Frame {
                type_id: skill_id,
                prerequisites: self.prerequisites(skill_id)?,
                next: 0,
            });
        }

        Ok(())
    }

    /// Direct (skill, level) prerequisites of `type_id`, in slot order.
    fn prerequisites(&self, type_id: TypeId) -> Result<Vec<(TypeId, u8)>, ResolveError> {
        let lookup_failed = |source: CatalogError| ResolveError::CatalogLookupFailed {
            item: format!("type {type_id}"),
            source,
        };

        let mut prerequisites = Vec::new();
        for slot in 0..REQUIRED_SKILL_SLOTS {
            let skill = self
                .catalog
                .attribute(type_id, AttributeKind::RequiredSkill(slot))
                .map_err(lookup_failed)?
                .and_then(|value| value.as_type_id());
            let Some(skill_id) = skill else {
                continue;
            };
            let level = self
                .catalog
                .attribute(type_id, AttributeKind::RequiredSkillLevel(slot))
                .map_err(lookup_failed)?
                .map(|value| value.as_f64().round().clamp(0.0, f64::from(MAX_SKILL_LEVEL)) as u8)
                .unwrap_or(0);
            prerequisites.push((skill_id, level));
        }
        Ok(prerequisites)
    }
}

/// Attach catalog names to a requirement set, ordered by skill id.
///
/// Skills the catalog cannot name are listed as `#<id>`.
pub fn skill_listing<C: ItemCatalog + ?Sized>(
    required: &SkillRequirementSet,
    catalog: &C,
) -> Result<Vec<SkillListing>, CatalogError> {
    required
        .iter()
        .map(|(type_id, level)| {
            let type_name = catalog
                .lookup_item_by_id(type_id)?
                .map(|item| item.name)
                .unwrap_or_else(|| format!("#{type_id}"));
            Ok(SkillListing {
                type_id,
                type_name,
                level,
            })
        })
        .collect()
}
