//! The editing session: one catalog snapshot plus the army being built.
//!
//! A session is an ordinary value owned by whoever drives the editing. The HTTP
//! layer keeps exactly one in managed state.

use std::sync::Arc;

use rocket::futures::lock::Mutex;
use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;
use serde_json::Value;

use crate::army::record::{to_record, ArmyRecord};
use crate::army::validation::{warnings, ArmyWarning};
use crate::army::{ArmyComposition, BudgetStatus};
use crate::catalog::Catalog;
use crate::error::Result;
use crate::gateway::{ArmyGateway, SavedArmy};

pub mod endpoints;

pub type SharedSession = Arc<Mutex<ArmySession>>;

/// Editing actions, dispatched as JSON tagged by `action_type`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", tag = "action_type")]
pub enum ArmyAction {
    AddUnit {
        unit_id: String,
    },
    RemoveUnit {
        unit_id: String,
    },
    /// `quantity` may be a number or text; anything that is not an integer counts as 1.
    SetQuantity {
        unit_id: String,
        quantity: Value,
    },
    SetNotes {
        unit_id: String,
        notes: String,
    },
    SetDetails {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        faction: Option<String>,
        #[serde(default)]
        period: Option<String>,
        /// Number or text; 0 or anything unparsable means the default budget.
        #[serde(default)]
        target_points: Option<Value>,
    },
    Reset,
}

/// Raw editor text for a JSON field. Whole-valued floats read as integers.
pub fn input_text(value: &Value) -> String {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

/// Snapshot of the session for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct SessionView {
    pub army: ArmyRecord,
    pub budget: BudgetStatus,
    pub warnings: Vec<ArmyWarning>,
    pub catalog_units: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ArmySession {
    catalog: Catalog,
    army: ArmyComposition,
}

impl ArmySession {
    pub fn new(catalog: Catalog) -> Self {
        ArmySession {
            catalog,
            army: ArmyComposition::new(),
        }
    }

    /// Start a session with the gateway's current catalog.
    pub fn start(gateway: &dyn ArmyGateway) -> Result<Self> {
        Ok(Self::new(Catalog::new(gateway.list_units()?)))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn army(&self) -> &ArmyComposition {
        &self.army
    }

    /// Replace the catalog snapshot. Existing lines keep their copied name and cost.
    pub fn reload_catalog(&mut self, gateway: &dyn ArmyGateway) -> Result<()> {
        self.catalog = Catalog::new(gateway.list_units()?);
        log::info!("Catalog reloaded: {} units", self.catalog.len());
        Ok(())
    }

    pub fn apply(&mut self, action: ArmyAction) -> Result<()> {
        log::debug!("Applying {:?}", action);
        match action {
            ArmyAction::AddUnit { unit_id } => self.army.add_unit(&self.catalog, &unit_id),
            ArmyAction::RemoveUnit { unit_id } => {
                self.army.remove_unit(&unit_id);
                Ok(())
            }
            ArmyAction::SetQuantity { unit_id, quantity } => self
                .army
                .set_quantity_from_input(&unit_id, &input_text(&quantity)),
            ArmyAction::SetNotes { unit_id, notes } => self.army.set_notes(&unit_id, &notes),
            ArmyAction::SetDetails {
                name,
                faction,
                period,
                target_points,
            } => {
                self.army.set_details(name, faction, period, None);
                if let Some(points) = target_points {
                    self.army.set_target_points_from_input(&input_text(&points));
                }
                Ok(())
            }
            ArmyAction::Reset => {
                self.army.reset();
                Ok(())
            }
        }
    }

    /// Persist the current army. It stays in the session either way.
    pub fn save(&self, gateway: &mut dyn ArmyGateway) -> Result<SavedArmy> {
        gateway.save_army(&self.army)
    }

    /// Replace the current army with a saved one. On failure nothing changes.
    pub fn load(&mut self, gateway: &dyn ArmyGateway, id: &str) -> Result<()> {
        self.army = gateway.load_army(id)?;
        Ok(())
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            army: to_record(&self.army),
            budget: self.army.budget_status(),
            warnings: warnings(&self.army),
            catalog_units: self.catalog.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::unit;
    use crate::error::ArmyError;
    use serde_json::json;

    fn session() -> ArmySession {
        ArmySession::new(Catalog::new(vec![
            unit("u1", "Line Infantry", 100),
            unit("u2", "Cavalry", 150),
        ]))
    }

    fn add(unit_id: &str) -> ArmyAction {
        ArmyAction::AddUnit {
            unit_id: unit_id.to_string(),
        }
    }

    #[test]
    fn actions_drive_the_army() {
        let mut s = session();
        s.apply(add("u1")).expect("add");
        s.apply(add("u1")).expect("add");
        s.apply(add("u2")).expect("add");
        let view = s.view();
        assert_eq!(view.budget.total_points, 350);
        assert_eq!(view.budget.total_unit_count, 3);
        assert_eq!(view.army.units.len(), 2);

        s.apply(ArmyAction::SetQuantity {
            unit_id: "u2".into(),
            quantity: json!("0"),
        })
        .expect("set");
        assert_eq!(s.army().line("u2").map(|l| l.quantity), Some(1));

        s.apply(ArmyAction::Reset).expect("reset");
        assert!(s.army().is_empty());
    }

    #[test]
    fn failed_actions_report_errors() {
        let mut s = session();
        assert_eq!(
            s.apply(add("ghost")),
            Err(ArmyError::UnitNotFound("ghost".into()))
        );
        assert_eq!(
            s.apply(ArmyAction::SetNotes {
                unit_id: "u1".into(),
                notes: "x".into()
            }),
            Err(ArmyError::UnitNotInArmy("u1".into()))
        );
    }

    #[test]
    fn json_values_become_editor_text() {
        assert_eq!(input_text(&json!(4)), "4");
        assert_eq!(input_text(&json!(3.0)), "3");
        assert_eq!(input_text(&json!(2.5)), "2.5");
        assert_eq!(input_text(&json!(" 7 ")), " 7 ");
        assert_eq!(input_text(&json!(null)), "");
        assert_eq!(input_text(&json!(-3)), "-3");
    }

    #[test]
    fn quantity_input_is_clamped() {
        let mut s = session();
        s.apply(add("u1")).expect("add");
        for (raw, expected) in [
            (json!(4), 4),
            (json!(3.0), 3),
            (json!(2.5), 1),
            (json!("7"), 7),
            (json!("seven"), 1),
            (json!(-3), 1),
        ] {
            s.apply(ArmyAction::SetQuantity {
                unit_id: "u1".into(),
                quantity: raw.clone(),
            })
            .expect("set");
            assert_eq!(s.army().line("u1").map(|l| l.quantity), Some(expected), "{raw}");
        }
    }

    #[test]
    fn target_points_input_falls_back_to_default() {
        let mut s = session();
        let action: ArmyAction =
            serde_json::from_str(r#"{"action_type":"SetDetails","target_points":"1500"}"#)
                .expect("parse");
        s.apply(action).expect("details");
        assert_eq!(s.army().target_points, 1500);

        for raw in [json!("abc"), json!(0), json!(-20)] {
            s.apply(ArmyAction::SetDetails {
                name: None,
                faction: None,
                period: None,
                target_points: Some(raw),
            })
            .expect("details");
            assert_eq!(s.army().target_points, 1000);
            s.apply(ArmyAction::SetDetails {
                name: None,
                faction: None,
                period: None,
                target_points: Some(json!(750)),
            })
            .expect("details");
            assert_eq!(s.army().target_points, 750);
        }
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: ArmyAction =
            serde_json::from_str(r#"{"action_type":"SetDetails","name":"Blues"}"#)
                .expect("parse");
        assert_eq!(
            action,
            ArmyAction::SetDetails {
                name: Some("Blues".into()),
                faction: None,
                period: None,
                target_points: None
            }
        );
    }
}
