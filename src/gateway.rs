//! Persistence gateway: the only boundary the army engine talks to for I/O.

use std::collections::BTreeMap;
use std::sync::Arc;

use rocket::futures::lock::Mutex;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::army::record::{from_properties, to_properties};
use crate::army::validation::{validate_for_save, warnings, ArmyWarning};
use crate::army::ArmyComposition;
use crate::catalog::{SizeClass, UnitCategory, UnitDefinition};
use crate::content_store::schema::{KIND_ARMY, KIND_HOME, KIND_UNIT};
use crate::content_store::{ContentNode, ContentStore, StoreError};
use crate::error::{ArmyError, Result};

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SavedArmy {
    pub id: String,
    pub message: String,
    pub warnings: Vec<ArmyWarning>,
}

pub trait ArmyGateway: Send {
    /// Published catalog units only.
    fn list_units(&self) -> Result<Vec<UnitDefinition>>;

    /// Validate and persist `army` as a new record. The composition is not modified.
    fn save_army(&mut self, army: &ArmyComposition) -> Result<SavedArmy>;

    /// Load a previously saved army; `NotFound` for unknown ids and non-army records.
    fn load_army(&self, id: &str) -> Result<ArmyComposition>;
}

/// Gateway shared between request handlers.
pub type SharedGateway = Arc<Mutex<Box<dyn ArmyGateway>>>;

pub fn shared(gateway: impl ArmyGateway + 'static) -> SharedGateway {
    Arc::new(Mutex::new(Box::new(gateway)))
}

/// Property values of a unit node, borrowed for writing.
#[derive(Debug, Clone)]
pub struct UnitFields<'a> {
    pub name: &'a str,
    pub category: UnitCategory,
    pub size: SizeClass,
    pub points_cost: u32,
    pub clash: i32,
    pub sustained_fire: i32,
    pub short_range_fire: i32,
    pub long_range_fire: i32,
    pub morale_save: i32,
    pub stamina: i32,
    pub special_rules: &'a str,
    pub description: &'a str,
}

pub fn unit_properties(unit: &UnitFields<'_>) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("unitName".to_string(), unit.name.to_string()),
        ("unitType".to_string(), unit.category.label().to_string()),
        ("unitSize".to_string(), unit.size.label().to_string()),
        ("pointsCost".to_string(), unit.points_cost.to_string()),
        ("clash".to_string(), unit.clash.to_string()),
        ("sustainedFire".to_string(), unit.sustained_fire.to_string()),
        ("shortRangeFire".to_string(), unit.short_range_fire.to_string()),
        ("longRangeFire".to_string(), unit.long_range_fire.to_string()),
        ("moraleSave".to_string(), unit.morale_save.to_string()),
        ("stamina".to_string(), unit.stamina.to_string()),
        ("specialRules".to_string(), unit.special_rules.to_string()),
        ("description".to_string(), unit.description.to_string()),
    ])
}

/// Read a unit definition out of a content node. Nodes whose category or size
/// cannot be recognised are skipped.
pub fn unit_from_node(node: &ContentNode) -> Option<UnitDefinition> {
    let text = |alias: &str| node.value(alias).unwrap_or_default().to_string();
    let int = |alias: &str| {
        node.value(alias)
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or(0)
    };
    let category = match node.value("unitType").unwrap_or_default().parse() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Skipping unit {}: {}", node.key, e);
            return None;
        }
    };
    let size = match node.value("unitSize").unwrap_or_default().parse() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Skipping unit {}: {}", node.key, e);
            return None;
        }
    };
    let name = match node.value("unitName") {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => node.name.clone(),
    };
    Some(UnitDefinition {
        id: node.key.clone(),
        name,
        category,
        size,
        points_cost: u32::try_from(int("pointsCost")).unwrap_or(0),
        clash: int("clash"),
        sustained_fire: int("sustainedFire"),
        short_range_fire: int("shortRangeFire"),
        long_range_fire: int("longRangeFire"),
        morale_save: int("moraleSave"),
        stamina: int("stamina"),
        special_rules: text("specialRules"),
        description: text("description"),
    })
}

/// `ArmyGateway` over the in-process content store.
#[derive(Debug)]
pub struct ContentStoreGateway {
    store: ContentStore,
}

impl ContentStoreGateway {
    pub fn new(store: ContentStore) -> Self {
        ContentStoreGateway { store }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ContentStore {
        &mut self.store
    }
}

impl ArmyGateway for ContentStoreGateway {
    fn list_units(&self) -> Result<Vec<UnitDefinition>> {
        if self.store.kind(KIND_UNIT).is_none() {
            return Err(ArmyError::NotFound("Unit content type".to_string()));
        }
        Ok(self
            .store
            .of_kind(KIND_UNIT)
            .filter(|n| n.published)
            .filter_map(unit_from_node)
            .collect())
    }

    fn save_army(&mut self, army: &ArmyComposition) -> Result<SavedArmy> {
        validate_for_save(army)?;
        if self.store.kind(KIND_ARMY).is_none() {
            return Err(ArmyError::NotFound("Army content type".to_string()));
        }
        let home = self
            .store
            .root_of_kind(KIND_HOME)
            .map(|n| n.key.clone())
            .ok_or_else(|| ArmyError::NotFound("Home page".to_string()))?;

        let mut node = self
            .store
            .create(&army.name, Some(home.as_str()), KIND_ARMY)
            .map_err(|e| ArmyError::Persistence(format!("Failed to create army: {e}")))?;
        node.properties = to_properties(army);
        let id = node.key.clone();

        let stored = self
            .store
            .save(node)
            .map_err(|e| ArmyError::Persistence(format!("Failed to save army: {e}")))
            .and_then(|()| {
                self.store
                    .publish(&id)
                    .map_err(|e| ArmyError::Persistence(format!("Failed to publish army: {e}")))
            });
        if let Err(e) = stored {
            // A failed save leaves no trace of the army behind
            self.store.remove(&id);
            return Err(e);
        }

        log::info!(
            "Saved army '{}' as {} ({} points, {} units)",
            army.name,
            id,
            army.total_points(),
            army.total_unit_count()
        );
        Ok(SavedArmy {
            id,
            message: "Army saved successfully".to_string(),
            warnings: warnings(army),
        })
    }

    fn load_army(&self, id: &str) -> Result<ArmyComposition> {
        match self.store.get(id) {
            Some(node) if node.kind == KIND_ARMY => Ok(from_properties(&node.properties)),
            Some(node) => {
                log::debug!("Node {} is a '{}', not an army", id, node.kind);
                Err(ArmyError::NotFound(format!("Army {id}")))
            }
            None => Err(ArmyError::NotFound(format!("Army {id}"))),
        }
    }
}

impl From<StoreError> for ArmyError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UnknownKind(kind) => ArmyError::NotFound(format!("Content type {kind}")),
            StoreError::NodeNotFound(key) => ArmyError::NotFound(format!("Content {key}")),
            other => ArmyError::Persistence(other.to_string()),
        }
    }
}
