use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use super::ArmyComposition;
use crate::error::{ArmyError, Result};

/// Non-blocking notices about an army. None of these stop a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", tag = "warning")]
pub enum ArmyWarning {
    #[serde(rename_all = "camelCase")]
    OverBudget { total_points: u64, target_points: u32 },
    NoUnits,
    ZeroTarget,
}

/// Checks that block a save. Only the name is required.
pub fn validate_for_save(army: &ArmyComposition) -> Result<()> {
    if army.name.trim().is_empty() {
        return Err(ArmyError::invalid("name required"));
    }
    Ok(())
}

pub fn warnings(army: &ArmyComposition) -> Vec<ArmyWarning> {
    let mut out = Vec::new();
    if army.is_empty() {
        out.push(ArmyWarning::NoUnits);
    }
    if army.target_points == 0 {
        out.push(ArmyWarning::ZeroTarget);
    }
    if army.is_over_budget() {
        out.push(ArmyWarning::OverBudget {
            total_points: army.total_points(),
            target_points: army.target_points,
        });
    }
    out
}
