//! EFT fitting text parser.
//!
//! EFT is the informal community export format for ship fittings:
//!
//! ```text
//! [Rifter, Tackle]
//!
//! Damage Control II
//!
//! [Empty Med slot]
//! Warp Scrambler II
//!
//! 125mm Gatling AutoCannon II
//!
//! Small Auxiliary Thrusters I
//!
//! Hobgoblin II x5
//! ```
//!
//! Sections are separated by blank lines and map positionally to low, mid,
//! high and rig slots, then (for strategic cruisers) sub-systems, then the
//! drone bay. Anything after the drone bay is ignored.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{ItemCatalog, ItemRef, TypeId};
use crate::error::{CatalogError, ParseError};
use crate::hull::HullRules;

static EMPTY_SLOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\[empty .+ slot\]$").expect("valid empty slot pattern"));

const OFFLINE_SUFFIX: &str = "/offline";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Hardpoint family of a fitted module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotCategory {
    Low,
    Mid,
    High,
    Rig,
    Sub,
}

impl SlotCategory {
    pub const ALL: [SlotCategory; 5] = [
        SlotCategory::Low,
        SlotCategory::Mid,
        SlotCategory::High,
        SlotCategory::Rig,
        SlotCategory::Sub,
    ];

    /// Key prefix used in the flattened JSON rendering (`LoSlot0`, `MedSlot1`, ...).
    pub fn key_prefix(self) -> &'static str {
        match self {
            SlotCategory::Low => "LoSlot",
            SlotCategory::Mid => "MedSlot",
            SlotCategory::High => "HiSlot",
            SlotCategory::Rig => "RigSlot",
            SlotCategory::Sub => "SubSlot",
        }
    }

    /// Human-readable label shown in logs and text renderings.
    pub fn label(self) -> &'static str {
        match self {
            SlotCategory::Low => "low",
            SlotCategory::Mid => "mid",
            SlotCategory::High => "high",
            SlotCategory::Rig => "rig",
            SlotCategory::Sub => "sub-system",
        }
    }
}

/// Position of a module within its slot category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub category: SlotCategory,
    pub index: usize,
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category.key_prefix(), self.index)
    }
}

/// One drone type and how many of it sit in the bay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroneStack {
    pub name: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
    #[serde(skip)]
    pub item: ItemRef,
}

/// Structured view of an EFT fitting.
///
/// Slot indices are zero based and contiguous per category, in text order.
/// Empty-slot placeholders and module names the catalog does not know never
/// consume an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFitting {
    pub ship_name: String,
    pub fit_name: String,
    pub slots: BTreeMap<SlotKey, ItemRef>,
    pub drone_bay: BTreeMap<TypeId, DroneStack>,
}

impl ParsedFitting {
    /// Modules fitted in `category`, in slot order.
    pub fn modules(&self, category: SlotCategory) -> impl Iterator<Item = &ItemRef> + '_ {
        self.slots
            .iter()
            .filter(move |(key, _)| key.category == category)
            .map(|(_, item)| item)
    }

    pub fn slot_count(&self, category: SlotCategory) -> usize {
        self.modules(category).count()
    }

    /// Every fitted module followed by every drone type in the bay.
    pub fn items(&self) -> impl Iterator<Item = &ItemRef> + '_ {
        self.slots
            .values()
            .chain(self.drone_bay.values().map(|stack| &stack.item))
    }
}

impl Serialize for ParsedFitting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct SlotEntry<'a> {
            id: TypeId,
            name: &'a str,
        }

        let mut map = serializer.serialize_map(Some(self.slots.len() + 3))?;
        map.serialize_entry("shipname", &self.ship_name)?;
        map.serialize_entry("fitname", &self.fit_name)?;
        for (key, item) in &self.slots {
            map.serialize_entry(
                &key.to_string(),
                &SlotEntry {
                    id: item.type_id,
                    name: &item.name,
                },
            )?;
        }
        map.serialize_entry("dronebay", &self.drone_bay)?;
        map.end()
    }
}

/// Split an EFT header line `[<ship>, <fit name>]` into its two names.
///
/// A leading byte order mark is ignored.
pub fn parse_header(line: &str) -> Result<(String, String), ParseError> {
    let bad_header = || ParseError::BadHeader {
        line: line.to_string(),
    };
    let inner = line
        .trim_start_matches(BYTE_ORDER_MARK)
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(bad_header)?;
    let (ship, fit) = inner.split_once(", ").ok_or_else(bad_header)?;
    let (ship, fit) = (ship.trim(), fit.trim());
    if ship.is_empty() || fit.is_empty() {
        return Err(bad_header());
    }
    Ok((ship.to_string(), fit.to_string()))
}

/// Parse `text` with the default hull rules.
pub fn parse_fitting<C: ItemCatalog + ?Sized>(
    text: &str,
    catalog: &C,
) -> Result<ParsedFitting, ParseError> {
    FittingParser::new(catalog).parse(text)
}

/// Run of non-blank lines, each tagged with its 1-based line number.
#[derive(Debug, Default)]
struct Paragraph<'t> {
    lines: Vec<(usize, &'t str)>,
}

fn split_paragraphs(text: &str) -> Vec<Paragraph<'_>> {
    let mut paragraphs = Vec::new();
    let mut current = Paragraph::default();
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    for (i, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            if !current.lines.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.lines.push((i + 1, line.trim()));
        }
    }
    if !current.lines.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

/// Parser bound to a catalog and a set of hull rules.
pub struct FittingParser<'c, C: ?Sized> {
    catalog: &'c C,
    hulls: HullRules,
}

impl<'c, C: ItemCatalog + ?Sized> FittingParser<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self {
            catalog,
            hulls: HullRules::default(),
        }
    }

    pub fn with_hull_rules(mut self, hulls: HullRules) -> Self {
        self.hulls = hulls;
        self
    }

    pub fn parse(&self, text: &str) -> Result<ParsedFitting, ParseError> {
        let mut paragraphs = split_paragraphs(text).into_iter();
        let header = paragraphs.next().ok_or_else(|| ParseError::BadHeader {
            line: String::new(),
        })?;
        let (header_no, header_line) = header.lines[0];
        let (ship_name, fit_name) = parse_header(header_line)?;

        let mut sections: Vec<Paragraph<'_>> = Vec::new();
        if header.lines.len() > 1 {
            sections.push(Paragraph {
                lines: header.lines[1..].to_vec(),
            });
        } else {
            debug!(ship = %ship_name, "low slots follow a blank line after the header");
        }
        sections.extend(paragraphs);

        if sections.len() < 4 {
            return Err(ParseError::TruncatedFitting {
                found: sections.len(),
            });
        }

        let has_sub_slots = self
            .hulls
            .has_sub_slots(&ship_name, self.catalog)
            .map_err(lookup_failed(&ship_name, header_no))?;
        let mut layout = vec![
            SlotCategory::Low,
            SlotCategory::Mid,
            SlotCategory::High,
            SlotCategory::Rig,
        ];
        if has_sub_slots {
            layout.push(SlotCategory::Sub);
        }
        let drone_index = layout.len();

        let mut slots = BTreeMap::new();
        for (category, section) in layout.iter().zip(&sections) {
            self.load_slots(*category, section, &mut slots)?;
        }

        let mut drone_bay = BTreeMap::new();
        if let Some(section) = sections.get(drone_index) {
            self.load_drones(section, &mut drone_bay)?;
        }
        if sections.len() > drone_index + 1 {
            debug!(
                ignored = sections.len() - drone_index - 1,
                "ignoring sections after the drone bay"
            );
        }

        Ok(ParsedFitting {
            ship_name,
            fit_name,
            slots,
            drone_bay,
        })
    }

    fn load_slots(
        &self,
        category: SlotCategory,
        section: &Paragraph<'_>,
        slots: &mut BTreeMap<SlotKey, ItemRef>,
    ) -> Result<(), ParseError> {
        let mut index = 0;
        for &(line_no, line) in &section.lines {
            let name = module_name(line);
            if EMPTY_SLOT.is_match(name) {
                continue;
            }
            let found = self
                .catalog
                .lookup_item_by_name(name)
                .map_err(lookup_failed(name, line_no))?;
            match found {
                Some(item) => {
                    slots.insert(SlotKey { category, index }, item);
                    index += 1;
                }
                None => warn!(
                    line = line_no,
                    slot = category.label(),
                    module = name,
                    "skipping module not found in catalog"
                ),
            }
        }
        Ok(())
    }

    fn load_drones(
        &self,
        section: &Paragraph<'_>,
        drone_bay: &mut BTreeMap<TypeId, DroneStack>,
    ) -> Result<(), ParseError> {
        for &(line_no, line) in &section.lines {
            let Some((name, quantity)) = line
                .rsplit_once(" x")
                .and_then(|(name, qty)| qty.trim().parse::<u32>().ok().map(|q| (name.trim(), q)))
            else {
                warn!(line = line_no, text = line, "skipping drone line without quantity");
                continue;
            };

            let item = self
                .catalog
                .lookup_item_by_name(name)
                .map_err(lookup_failed(name, line_no))?
                .ok_or_else(|| ParseError::UnknownDrone {
                    name: name.to_string(),
                    line: line_no,
                    suggestions: self.catalog.similar_names(name, 3),
                })?;

            match drone_bay.entry(item.type_id) {
                Entry::Occupied(mut stack) => {
                    let stack = stack.get_mut();
                    stack.quantity = stack.quantity.checked_add(quantity).ok_or_else(|| {
                        ParseError::DroneQuantityOverflow {
                            name: stack.name.clone(),
                            line: line_no,
                        }
                    })?;
                }
                Entry::Vacant(slot) => {
                    slot.insert(DroneStack {
                        name: item.name.clone(),
                        quantity,
                        item,
                    });
                }
            }
        }
        Ok(())
    }
}

fn lookup_failed(item: &str, line: usize) -> impl FnOnce(CatalogError) -> ParseError + '_ {
    move |source| ParseError::CatalogLookupFailed {
        item: item.to_string(),
        line,
        source,
    }
}

/// First comma-separated token of a module line, without an offline marker.
fn module_name(line: &str) -> &str {
    let name = line.split(',').next().unwrap_or(line).trim();
    match name.len().checked_sub(OFFLINE_SUFFIX.len()) {
        Some(cut)
            if name.is_char_boundary(cut)
                && name[cut..].eq_ignore_ascii_case(OFFLINE_SUFFIX) =>
        {
            name[..cut].trim_end()
        }
        _ => name,
    }
}
