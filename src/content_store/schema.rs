//! Declarative content-kind definitions.
//!
//! The store applies a `Schema` idempotently: a version it has already seen is
//! skipped, a newer one only adds kinds and properties that are missing.

use rocket::serde::{Deserialize, Serialize};

pub const KIND_HOME: &str = "blackPowderHome";
pub const KIND_UNIT: &str = "blackPowderUnit";
pub const KIND_ARMY: &str = "blackPowderArmy";
pub const KIND_UNIT_TYPE: &str = "unitType";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub enum PropertyEditor {
    TextString,
    TextArea,
    Numeric,
}

/// A property on a content kind. Mandatory properties must be non-blank when a
/// node is saved; `Numeric` ones must hold a whole number when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct PropertyDef {
    pub alias: String,
    pub name: String,
    pub editor: PropertyEditor,
    pub mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ContentKindDef {
    pub alias: String,
    pub name: String,
    pub allowed_at_root: bool,
    pub allowed_children: Vec<String>,
    pub properties: Vec<PropertyDef>,
}

impl ContentKindDef {
    pub fn has_property(&self, alias: &str) -> bool {
        self.properties.iter().any(|p| p.alias == alias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct Schema {
    pub version: u32,
    pub kinds: Vec<ContentKindDef>,
}

fn prop(alias: &str, name: &str, editor: PropertyEditor, mandatory: bool) -> PropertyDef {
    PropertyDef {
        alias: alias.to_string(),
        name: name.to_string(),
        editor,
        mandatory,
    }
}

fn kind(
    alias: &str,
    name: &str,
    allowed_at_root: bool,
    allowed_children: &[&str],
    properties: Vec<PropertyDef>,
) -> ContentKindDef {
    ContentKindDef {
        alias: alias.to_string(),
        name: name.to_string(),
        allowed_at_root,
        allowed_children: allowed_children.iter().map(|c| c.to_string()).collect(),
        properties,
    }
}

/// Current army-builder schema.
pub fn army_builder_schema() -> Schema {
    use PropertyEditor::*;
    Schema {
        version: 3,
        kinds: vec![
            kind(
                KIND_UNIT_TYPE,
                "Unit Type",
                false,
                &[],
                vec![
                    prop("typeName", "Unit Type", TextString, true),
                    prop("description", "Description", TextArea, false),
                ],
            ),
            kind(
                KIND_UNIT,
                "Black Powder Unit",
                false,
                &[],
                vec![
                    prop("unitName", "Unit Name", TextString, true),
                    prop("unitType", "Unit Type", TextString, true),
                    prop("unitSize", "Unit Size", TextString, true),
                    prop("pointsCost", "Points Cost", Numeric, true),
                    prop("description", "Description", TextArea, false),
                    prop("clash", "Clash", Numeric, true),
                    prop("sustainedFire", "Sustained Fire", Numeric, true),
                    prop("shortRangeFire", "Short Range Fire", Numeric, true),
                    prop("longRangeFire", "Long Range Fire", Numeric, true),
                    prop("moraleSave", "Morale Save", Numeric, true),
                    prop("stamina", "Stamina", Numeric, true),
                    prop("specialRules", "Special Rules", TextArea, false),
                ],
            ),
            kind(
                KIND_ARMY,
                "Black Powder Army",
                false,
                &[],
                vec![
                    prop("armyName", "Army Name", TextString, true),
                    prop("faction", "Faction", TextString, false),
                    prop("period", "Period", TextString, false),
                    prop("targetPoints", "Target Points", Numeric, true),
                    prop("armyUnits", "Army Units (JSON)", TextArea, false),
                ],
            ),
            kind(
                KIND_HOME,
                "Black Powder Home",
                true,
                &[KIND_UNIT_TYPE, KIND_UNIT, KIND_ARMY],
                vec![
                    prop("pageTitle", "Page Title", TextString, true),
                    prop("pageDescription", "Page Description", TextArea, false),
                ],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn army_kind_declares_every_army_property() {
        let schema = army_builder_schema();
        let army = schema
            .kinds
            .iter()
            .find(|k| k.alias == KIND_ARMY)
            .expect("army kind");
        for alias in ["armyName", "faction", "period", "targetPoints", "armyUnits"] {
            assert!(army.has_property(alias), "missing {alias}");
        }
        let mandatory: Vec<&str> = army
            .properties
            .iter()
            .filter(|p| p.mandatory)
            .map(|p| p.alias.as_str())
            .collect();
        assert_eq!(mandatory, ["armyName", "targetPoints"]);
    }

    #[test]
    fn home_allows_the_army_builder_kinds() {
        let schema = army_builder_schema();
        let home = schema
            .kinds
            .iter()
            .find(|k| k.alias == KIND_HOME)
            .expect("home kind");
        assert!(home.allowed_at_root);
        assert!(home.allowed_children.contains(&KIND_ARMY.to_string()));
        assert!(home.allowed_children.contains(&KIND_UNIT.to_string()));
    }
}
