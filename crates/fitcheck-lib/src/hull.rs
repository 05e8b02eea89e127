//! Hull-specific layout rules.
//!
//! Strategic cruisers carry an extra sub-system section in EFT text, placed
//! between the rigs and the drone bay. Which hulls do so is configuration,
//! backed by the catalog's sub-system slot attribute for hulls that the
//! configured list does not name.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::{AttributeKind, CatalogResult, ItemCatalog};

/// Hulls that ship with sub-system slots out of the box.
pub const DEFAULT_SUBSYSTEM_HULLS: [&str; 4] = ["Tengu", "Loki", "Legion", "Proteus"];

/// Set of hull names whose fittings include a sub-system section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HullRules {
    subsystem_hulls: BTreeSet<String>,
}

impl Default for HullRules {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSYSTEM_HULLS)
    }
}

impl HullRules {
    pub fn new<I, S>(subsystem_hulls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            subsystem_hulls: subsystem_hulls
                .into_iter()
                .map(|name| normalize(name.as_ref()))
                .collect(),
        }
    }

    /// Rules that rely on the catalog alone.
    pub fn catalog_only() -> Self {
        Self {
            subsystem_hulls: BTreeSet::new(),
        }
    }

    /// Whether `ship_name` is in the configured list.
    pub fn is_listed(&self, ship_name: &str) -> bool {
        self.subsystem_hulls.contains(&normalize(ship_name))
    }

    /// Whether fittings for `ship_name` carry a sub-system section.
    ///
    /// Listed hulls answer without touching the catalog. Anything else is a
    /// sub-system hull when the catalog reports a positive slot count.
    pub fn has_sub_slots<C: ItemCatalog + ?Sized>(
        &self,
        ship_name: &str,
        catalog: &C,
    ) -> CatalogResult<bool> {
        if self.is_listed(ship_name) {
            return Ok(true);
        }
        let Some(ship) = catalog.lookup_item_by_name(ship_name)? else {
            return Ok(false);
        };
        let slots = catalog
            .attribute(ship.type_id, AttributeKind::SubsystemSlots)?
            .map(|value| value.as_f64())
            .unwrap_or(0.0);
        if slots > 0.0 {
            debug!(ship = %ship.name, slots, "catalog reports sub-system slots");
        }
        Ok(slots > 0.0)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
