//! Unit catalog: the read-only definitions an army is assembled from.
//!
//! The catalog is a snapshot taken from the gateway when an editing session starts.
//! Nothing in here mutates a definition after it is loaded.

use std::fmt;
use std::str::FromStr;

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

pub mod endpoints;

/// Troop category of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub enum UnitCategory {
    Infantry,
    Cavalry,
    Artillery,
    LightCavalry,
    HeavyCavalry,
    Dragoons,
    LightInfantry,
    HeavyInfantry,
}

impl UnitCategory {
    pub fn all() -> Vec<UnitCategory> {
        vec![
            UnitCategory::Infantry,
            UnitCategory::Cavalry,
            UnitCategory::Artillery,
            UnitCategory::LightCavalry,
            UnitCategory::HeavyCavalry,
            UnitCategory::Dragoons,
            UnitCategory::LightInfantry,
            UnitCategory::HeavyInfantry,
        ]
    }

    /// Label shown in the editor, e.g. "Light Cavalry".
    pub fn label(&self) -> &'static str {
        match self {
            UnitCategory::Infantry => "Infantry",
            UnitCategory::Cavalry => "Cavalry",
            UnitCategory::Artillery => "Artillery",
            UnitCategory::LightCavalry => "Light Cavalry",
            UnitCategory::HeavyCavalry => "Heavy Cavalry",
            UnitCategory::Dragoons => "Dragoons",
            UnitCategory::LightInfantry => "Light Infantry",
            UnitCategory::HeavyInfantry => "Heavy Infantry",
        }
    }
}

impl fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for UnitCategory {
    type Err = String;

    /// Accepts both the variant name and the editor label, ignoring case and spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        UnitCategory::all()
            .into_iter()
            .find(|c| normalize_label(c.label()) == wanted)
            .ok_or_else(|| format!("Unknown unit category '{s}'"))
    }
}

/// Footprint of a unit on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub enum SizeClass {
    Tiny,
    Small,
    Standard,
    Large,
    VeryLarge,
}

impl SizeClass {
    pub fn all() -> Vec<SizeClass> {
        vec![
            SizeClass::Tiny,
            SizeClass::Small,
            SizeClass::Standard,
            SizeClass::Large,
            SizeClass::VeryLarge,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Tiny => "Tiny",
            SizeClass::Small => "Small",
            SizeClass::Standard => "Standard",
            SizeClass::Large => "Large",
            SizeClass::VeryLarge => "Very Large",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SizeClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        SizeClass::all()
            .into_iter()
            .find(|c| normalize_label(c.label()) == wanted)
            .ok_or_else(|| format!("Unknown size class '{s}'"))
    }
}

fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A unit definition as published in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct UnitDefinition {
    pub id: String,
    pub name: String,
    pub category: UnitCategory,
    pub size: SizeClass,
    pub points_cost: u32,
    pub clash: i32,
    pub sustained_fire: i32,
    pub short_range_fire: i32,
    pub long_range_fire: i32,
    pub morale_save: i32,
    pub stamina: i32,
    pub special_rules: String,
    pub description: String,
}

/// Immutable lookup over the units fetched at session start.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    units: Vec<UnitDefinition>,
}

impl Catalog {
    pub fn new(units: Vec<UnitDefinition>) -> Self {
        Catalog { units }
    }

    pub fn get(&self, unit_id: &str) -> Option<&UnitDefinition> {
        self.units.iter().find(|u| u.id == unit_id)
    }

    pub fn units(&self) -> &[UnitDefinition] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
