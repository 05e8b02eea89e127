//! Item catalog gateway.
//!
//! The core never owns static game data. Everything it needs (item names,
//! prerequisite skills, skill ranks) is read through the [`ItemCatalog`]
//! trait. [`StaticCatalog`] is an in-memory implementation loaded from CSV
//! exports shaped like the static data export's `invTypes` and
//! `dgmTypeAttributes` tables.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CatalogError, Error, Result};

/// Numeric identifier for an item type (ships, modules, drones and skills alike).
pub type TypeId = i64;

/// Numeric identifier for a dogma attribute.
pub type AttributeId = i64;

/// Result alias for gateway calls.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// File name of the type table inside a catalog directory.
pub const TYPES_FILE: &str = "types.csv";

/// File name of the type attribute table inside a catalog directory.
pub const TYPE_ATTRIBUTES_FILE: &str = "type_attributes.csv";

/// Attribute holding a skill's training time multiplier.
pub const SKILL_RANK_ATTRIBUTE: AttributeId = 275;

/// Attribute holding the number of sub-system slots on a hull.
pub const SUBSYSTEM_SLOTS_ATTRIBUTE: AttributeId = 1367;

/// (required skill, required level) attribute pairs, in slot order.
pub const REQUIRED_SKILL_ATTRIBUTES: [(AttributeId, AttributeId); 6] = [
    (182, 277),
    (183, 278),
    (184, 279),
    (1285, 1286),
    (1289, 1287),
    (1290, 1288),
];

/// Number of prerequisite slots an item can carry.
pub const REQUIRED_SKILL_SLOTS: usize = REQUIRED_SKILL_ATTRIBUTES.len();

/// A catalog item resolved from a name or identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemRef {
    pub type_id: TypeId,
    pub name: String,
}

impl ItemRef {
    pub fn new(type_id: TypeId, name: impl Into<String>) -> Self {
        Self {
            type_id,
            name: name.into(),
        }
    }
}

/// Attribute families the core asks the catalog about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    SkillRank,
    SubsystemSlots,
    /// Skill type id demanded by prerequisite slot `n` (zero based).
    RequiredSkill(usize),
    /// Minimum level paired with [`AttributeKind::RequiredSkill`] slot `n`.
    RequiredSkillLevel(usize),
}

impl AttributeKind {
    /// Dogma attribute id backing this kind, if the slot exists.
    pub fn attribute_id(self) -> Option<AttributeId> {
        match self {
            AttributeKind::SkillRank => Some(SKILL_RANK_ATTRIBUTE),
            AttributeKind::SubsystemSlots => Some(SUBSYSTEM_SLOTS_ATTRIBUTE),
            AttributeKind::RequiredSkill(slot) => {
                REQUIRED_SKILL_ATTRIBUTES.get(slot).map(|(skill, _)| *skill)
            }
            AttributeKind::RequiredSkillLevel(slot) => {
                REQUIRED_SKILL_ATTRIBUTES.get(slot).map(|(_, level)| *level)
            }
        }
    }
}

/// Raw attribute value. The static data stores integers and floats in
/// separate columns; both collapse to a float here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeValue(pub f64);

impl AttributeValue {
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Interpret the value as a type id reference. Fractional or
    /// non-positive values are not valid references.
    pub fn as_type_id(self) -> Option<TypeId> {
        let value = self.0;
        if value.is_finite() && value > 0.0 && value.fract() == 0.0 {
            Some(value as TypeId)
        } else {
            None
        }
    }
}

/// Read-only lookup service over static item data.
///
/// `Ok(None)` means "not in the catalog". `Err` means the backend could not
/// answer; callers must never treat it as a miss.
pub trait ItemCatalog {
    fn lookup_item_by_name(&self, name: &str) -> CatalogResult<Option<ItemRef>>;

    fn lookup_item_by_id(&self, type_id: TypeId) -> CatalogResult<Option<ItemRef>>;

    fn attribute(
        &self,
        type_id: TypeId,
        kind: AttributeKind,
    ) -> CatalogResult<Option<AttributeValue>>;

    /// Names close to `name`, best match first. Used only to enrich errors.
    fn similar_names(&self, _name: &str, _limit: usize) -> Vec<String> {
        Vec::new()
    }
}

impl<C: ItemCatalog + ?Sized> ItemCatalog for &C {
    fn lookup_item_by_name(&self, name: &str) -> CatalogResult<Option<ItemRef>> {
        (**self).lookup_item_by_name(name)
    }

    fn lookup_item_by_id(&self, type_id: TypeId) -> CatalogResult<Option<ItemRef>> {
        (**self).lookup_item_by_id(type_id)
    }

    fn attribute(
        &self,
        type_id: TypeId,
        kind: AttributeKind,
    ) -> CatalogResult<Option<AttributeValue>> {
        (**self).attribute(type_id, kind)
    }

    fn similar_names(&self, name: &str, limit: usize) -> Vec<String> {
        (**self).similar_names(name, limit)
    }
}

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// In-memory catalog loaded from CSV files or built programmatically.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: HashMap<TypeId, String>,
    name_to_id: HashMap<String, TypeId>,
    attributes: HashMap<(TypeId, AttributeId), f64>,
    source: Option<PathBuf>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `types.csv` and `type_attributes.csv` from a directory.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let types_path = dir.join(TYPES_FILE);
        let attributes_path = dir.join(TYPE_ATTRIBUTES_FILE);
        for path in [&types_path, &attributes_path] {
            if !path.exists() {
                return Err(Error::CatalogFileNotFound { path: path.clone() });
            }
        }

        let mut catalog = Self::from_readers(
            fs::File::open(&types_path)?,
            fs::File::open(&attributes_path)?,
        )?;
        catalog.source = Some(dir.to_path_buf());
        debug!(
            items = catalog.len(),
            attributes = catalog.attributes.len(),
            dir = %dir.display(),
            "loaded static catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog from a type table reader and an attribute table reader.
    pub fn from_readers<T: Read, A: Read>(types: T, attributes: A) -> Result<Self> {
        let mut catalog = Self::new();

        let mut types_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(types);
        let columns = resolve_columns(
            TYPES_FILE,
            &mut types_reader,
            &[
                ("type_id", &["typeid", "type_id", "id"]),
                ("name", &["typename", "type_name", "name"]),
            ],
        )?;
        for (row, record) in records(TYPES_FILE, &mut types_reader) {
            let record = record?;
            let type_id = parse_field::<TypeId>(TYPES_FILE, &record, &columns, "type_id", row)?;
            let name = field(&record, &columns, "name").unwrap_or_default();
            if name.is_empty() {
                return Err(Error::CatalogData {
                    message: format!("{TYPES_FILE} row {row}: type name must not be empty"),
                });
            }
            catalog.insert_item(type_id, name)?;
        }

        let mut attr_reader = ReaderBuilder::new()
            .trim(Trim::Fields)
            .from_reader(attributes);
        let columns = resolve_columns(
            TYPE_ATTRIBUTES_FILE,
            &mut attr_reader,
            &[
                ("type_id", &["typeid", "type_id"]),
                ("attribute_id", &["attributeid", "attribute_id"]),
                ("value_int", &["valueint", "value_int"]),
                ("value_float", &["valuefloat", "value_float", "value"]),
            ],
        )?;
        for (row, record) in records(TYPE_ATTRIBUTES_FILE, &mut attr_reader) {
            let record = record?;
            let type_id =
                parse_field::<TypeId>(TYPE_ATTRIBUTES_FILE, &record, &columns, "type_id", row)?;
            let attribute_id = parse_field::<AttributeId>(
                TYPE_ATTRIBUTES_FILE,
                &record,
                &columns,
                "attribute_id",
                row,
            )?;
            let value = match field(&record, &columns, "value_int").filter(|v| !v.is_empty()) {
                Some(_) => parse_field::<i64>(
                    TYPE_ATTRIBUTES_FILE,
                    &record,
                    &columns,
                    "value_int",
                    row,
                )? as f64,
                None => parse_field::<f64>(
                    TYPE_ATTRIBUTES_FILE,
                    &record,
                    &columns,
                    "value_float",
                    row,
                )?,
            };
            catalog.insert_attribute(type_id, attribute_id, value);
        }

        Ok(catalog)
    }

    /// Register an item. Type ids must be unique.
    ///
    /// Names are matched case-insensitively; when two items share a name,
    /// lookups by name keep resolving to the first one registered.
    pub fn insert_item(&mut self, type_id: TypeId, name: impl Into<String>) -> Result<()> {
        let name = name.into().trim().to_string();
        if self.items.contains_key(&type_id) {
            return Err(Error::CatalogData {
                message: format!("duplicate type id {type_id}"),
            });
        }
        let key = normalize_name(&name);
        match self.name_to_id.get(&key) {
            Some(first) => warn!(
                type_id,
                first = *first,
                name = %name,
                "duplicate type name; name lookups keep the first id"
            ),
            None => {
                self.name_to_id.insert(key, type_id);
            }
        }
        self.items.insert(type_id, name);
        Ok(())
    }

    /// Set a raw attribute value, replacing any previous value.
    pub fn insert_attribute(&mut self, type_id: TypeId, attribute_id: AttributeId, value: f64) {
        self.attributes.insert((type_id, attribute_id), value);
    }

    /// Record that `type_id` needs `skill_id` at `level` in prerequisite `slot`.
    pub fn insert_required_skill(
        &mut self,
        type_id: TypeId,
        slot: usize,
        skill_id: TypeId,
        level: u8,
    ) -> Result<()> {
        let (skill_attr, level_attr) =
            REQUIRED_SKILL_ATTRIBUTES
                .get(slot)
                .ok_or_else(|| Error::CatalogData {
                    message: format!(
                        "prerequisite slot {slot} out of range (max {})",
                        REQUIRED_SKILL_SLOTS - 1
                    ),
                })?;
        self.insert_attribute(type_id, *skill_attr, skill_id as f64);
        self.insert_attribute(type_id, *level_attr, f64::from(level));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sorted list of every item name in the catalog.
    pub fn item_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.items.values().cloned().collect();
        names.sort();
        names
    }

    /// Directory the catalog was loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl ItemCatalog for StaticCatalog {
    fn lookup_item_by_name(&self, name: &str) -> CatalogResult<Option<ItemRef>> {
        Ok(self
            .name_to_id
            .get(&normalize_name(name))
            .and_then(|id| self.items.get(id).map(|n| ItemRef::new(*id, n.clone()))))
    }

    fn lookup_item_by_id(&self, type_id: TypeId) -> CatalogResult<Option<ItemRef>> {
        Ok(self
            .items
            .get(&type_id)
            .map(|name| ItemRef::new(type_id, name.clone())))
    }

    fn attribute(
        &self,
        type_id: TypeId,
        kind: AttributeKind,
    ) -> CatalogResult<Option<AttributeValue>> {
        Ok(kind
            .attribute_id()
            .and_then(|attr| self.attributes.get(&(type_id, attr)))
            .map(|value| AttributeValue(*value)))
    }

    fn similar_names(&self, name: &str, limit: usize) -> Vec<String> {
        let wanted = normalize_name(name);
        let mut scored: Vec<(f64, &String)> = self
            .items
            .values()
            .map(|candidate| {
                (
                    strsim::jaro_winkler(&wanted, &normalize_name(candidate)),
                    candidate,
                )
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, n)| n.clone())
            .collect()
    }
}

/// Normalize an item name for case-insensitive lookup.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalize_header(s: &str) -> String {
    s.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Map canonical column names to header positions, failing on any missing column.
fn resolve_columns<R: Read>(
    file: &str,
    reader: &mut csv::Reader<R>,
    synonyms: &[(&'static str, &[&str])],
) -> Result<BTreeMap<&'static str, usize>> {
    let headers = reader
        .headers()
        .map_err(|err| Error::CatalogData {
            message: format!("failed to read {file} headers: {err}"),
        })?
        .clone();
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

    let mut index_map = BTreeMap::new();
    for (canon, alts) in synonyms {
        if let Some(i) = alts
            .iter()
            .find_map(|alt| normalized.iter().position(|h| h == &normalize_header(alt)))
        {
            index_map.insert(*canon, i);
        }
    }

    let missing: Vec<&str> = synonyms
        .iter()
        .map(|(canon, _)| *canon)
        .filter(|canon| !index_map.contains_key(canon))
        .collect();
    if !missing.is_empty() {
        return Err(Error::CatalogData {
            message: format!(
                "{file} missing required columns: {}. Available: {}",
                missing.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    Ok(index_map)
}

/// Iterate records with their 1-based line number (header is line 1).
fn records<'r, R: Read + 'r>(
    file: &'r str,
    reader: &'r mut csv::Reader<R>,
) -> impl Iterator<Item = (usize, Result<StringRecord>)> + 'r {
    reader.records().enumerate().map(move |(i, record)| {
        let row = i + 2;
        (
            row,
            record.map_err(|e| Error::CatalogData {
                message: format!("{file} row {row}: {e}"),
            }),
        )
    })
}

fn field(record: &StringRecord, columns: &BTreeMap<&str, usize>, name: &str) -> Option<String> {
    columns
        .get(name)
        .and_then(|&i| record.get(i))
        .map(|s| s.trim().to_string())
}

fn parse_field<T>(
    file: &str,
    record: &StringRecord,
    columns: &BTreeMap<&str, usize>,
    name: &str,
    row: usize,
) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    field(record, columns, name)
        .ok_or_else(|| Error::CatalogData {
            message: format!("{file} row {row}: missing {name}"),
        })?
        .parse::<T>()
        .map_err(|e| Error::CatalogData {
            message: format!("{file} row {row}: invalid {name}: {e}"),
        })
}
