//! Flat transport form of an army and the text codec for its unit list.
//!
//! The content store has no nested-list field, so the line items travel as one
//! JSON text property. Decoding that text is lenient: anything unreadable
//! becomes an empty list.

use std::collections::BTreeMap;

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use super::{ArmyComposition, ArmyLineItem};

pub const PROP_ARMY_NAME: &str = "armyName";
pub const PROP_FACTION: &str = "faction";
pub const PROP_PERIOD: &str = "period";
pub const PROP_TARGET_POINTS: &str = "targetPoints";
pub const PROP_ARMY_UNITS: &str = "armyUnits";

/// Army as exchanged over HTTP and handed to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ArmyRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub faction: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub target_points: u32,
    #[serde(default)]
    pub units: Vec<ArmyLineItem>,
}

pub fn to_record(army: &ArmyComposition) -> ArmyRecord {
    ArmyRecord {
        name: army.name.clone(),
        faction: army.faction.clone(),
        period: army.period.clone(),
        target_points: army.target_points,
        units: army.lines().to_vec(),
    }
}

pub fn from_record(record: ArmyRecord) -> ArmyComposition {
    ArmyComposition::from_parts(
        record.name,
        record.faction,
        record.period,
        record.target_points,
        record.units,
    )
}

/// Encode line items as the JSON array stored in the `armyUnits` property.
pub fn encode_units(lines: &[ArmyLineItem]) -> String {
    // Plain structs of strings and integers always serialize.
    serde_json::to_string(lines).unwrap_or_else(|_| "[]".to_string())
}

/// Decode the `armyUnits` text. Missing, blank or malformed input yields an empty list.
pub fn decode_units(text: Option<&str>) -> Vec<ArmyLineItem> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Vec::new(),
    };
    match serde_json::from_str::<Option<Vec<ArmyLineItem>>>(text) {
        Ok(lines) => lines.unwrap_or_default(),
        Err(e) => {
            log::warn!("Discarding unreadable army unit list ({} bytes): {}", text.len(), e);
            Vec::new()
        }
    }
}

/// Scalar properties written to an army content node.
pub fn to_properties(army: &ArmyComposition) -> BTreeMap<String, String> {
    BTreeMap::from([
        (PROP_ARMY_NAME.to_string(), army.name.clone()),
        (PROP_FACTION.to_string(), army.faction.clone()),
        (PROP_PERIOD.to_string(), army.period.clone()),
        (
            PROP_TARGET_POINTS.to_string(),
            army.target_points.to_string(),
        ),
        (PROP_ARMY_UNITS.to_string(), encode_units(army.lines())),
    ])
}

/// Rebuild an army from node properties. Missing text fields read as empty and a
/// missing or unparsable target reads as 0.
pub fn from_properties(properties: &BTreeMap<String, String>) -> ArmyComposition {
    let text = |key: &str| properties.get(key).cloned().unwrap_or_default();
    let target_points = properties
        .get(PROP_TARGET_POINTS)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(0);
    from_record(ArmyRecord {
        name: text(PROP_ARMY_NAME),
        faction: text(PROP_FACTION),
        period: text(PROP_PERIOD),
        target_points,
        units: decode_units(properties.get(PROP_ARMY_UNITS).map(String::as_str)),
    })
}
