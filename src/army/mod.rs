//! Army composition engine.
//!
//! An `ArmyComposition` owns its line items exclusively. Every mutation goes
//! through the methods below; the totals are always derived, never stored.

use rocket::serde::{Deserialize, Serialize};
use rocket_okapi::JsonSchema;

use crate::catalog::Catalog;
use crate::error::{ArmyError, Result};

pub mod endpoints;
pub mod record;
pub mod validation;

/// Budget a freshly created or reset army starts with.
pub const DEFAULT_TARGET_POINTS: u32 = 1000;

/// One (unit, quantity, notes) entry. Name and cost are copied from the catalog
/// when the line is created and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ArmyLineItem {
    pub unit_id: String,
    pub name: String,
    pub quantity: u32,
    pub points_cost: u32,
    #[serde(default)]
    pub notes: String,
}

impl ArmyLineItem {
    /// Points contributed by this line.
    pub fn line_points(&self) -> u64 {
        u64::from(self.points_cost) * u64::from(self.quantity)
    }
}

/// A named, budgeted list of line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArmyComposition {
    pub name: String,
    pub faction: String,
    pub period: String,
    pub target_points: u32,
    lines: Vec<ArmyLineItem>,
}

impl Default for ArmyComposition {
    fn default() -> Self {
        Self::new()
    }
}

impl ArmyComposition {
    pub fn new() -> Self {
        ArmyComposition {
            name: String::new(),
            faction: String::new(),
            period: String::new(),
            target_points: DEFAULT_TARGET_POINTS,
            lines: Vec::new(),
        }
    }

    /// Rebuild a composition from already-validated parts (used when loading).
    /// Quantities of 0 are raised to 1 and repeated unit ids are merged.
    pub fn from_parts(
        name: String,
        faction: String,
        period: String,
        target_points: u32,
        lines: Vec<ArmyLineItem>,
    ) -> Self {
        let mut army = ArmyComposition {
            name,
            faction,
            period,
            target_points,
            lines: Vec::with_capacity(lines.len()),
        };
        for mut line in lines {
            line.quantity = line.quantity.max(1);
            match army.line_mut(&line.unit_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity)
                }
                None => army.lines.push(line),
            }
        }
        army
    }

    /// Line items in display order.
    pub fn lines(&self) -> &[ArmyLineItem] {
        &self.lines
    }

    pub fn line(&self, unit_id: &str) -> Option<&ArmyLineItem> {
        self.lines.iter().find(|l| l.unit_id == unit_id)
    }

    fn line_mut(&mut self, unit_id: &str) -> Option<&mut ArmyLineItem> {
        self.lines.iter_mut().find(|l| l.unit_id == unit_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one copy of a catalog unit: bump the existing line or append a new one.
    pub fn add_unit(&mut self, catalog: &Catalog, unit_id: &str) -> Result<()> {
        let unit = catalog
            .get(unit_id)
            .ok_or_else(|| ArmyError::UnitNotFound(unit_id.to_string()))?;
        if let Some(line) = self.line_mut(unit_id) {
            line.quantity = line.quantity.saturating_add(1);
            return Ok(());
        }
        self.lines.push(ArmyLineItem {
            unit_id: unit.id.clone(),
            name: unit.name.clone(),
            quantity: 1,
            points_cost: unit.points_cost,
            notes: String::new(),
        });
        Ok(())
    }

    /// Drop the line for `unit_id`. Absent lines are ignored.
    pub fn remove_unit(&mut self, unit_id: &str) {
        self.lines.retain(|l| l.unit_id != unit_id);
    }

    /// Set a line's quantity, clamping anything below 1 up to 1.
    pub fn set_quantity(&mut self, unit_id: &str, quantity: i64) -> Result<()> {
        let line = self
            .line_mut(unit_id)
            .ok_or_else(|| ArmyError::UnitNotInArmy(unit_id.to_string()))?;
        line.quantity = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        Ok(())
    }

    /// Same as `set_quantity` but takes raw editor input; text that is not an
    /// integer counts as 1.
    pub fn set_quantity_from_input(&mut self, unit_id: &str, input: &str) -> Result<()> {
        let quantity = input.trim().parse::<i64>().unwrap_or(1);
        self.set_quantity(unit_id, quantity)
    }

    pub fn set_notes(&mut self, unit_id: &str, notes: &str) -> Result<()> {
        let line = self
            .line_mut(unit_id)
            .ok_or_else(|| ArmyError::UnitNotInArmy(unit_id.to_string()))?;
        line.notes = notes.to_string();
        Ok(())
    }

    /// Update whichever header fields are given.
    pub fn set_details(
        &mut self,
        name: Option<String>,
        faction: Option<String>,
        period: Option<String>,
        target_points: Option<u32>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(faction) = faction {
            self.faction = faction;
        }
        if let Some(period) = period {
            self.period = period;
        }
        if let Some(target_points) = target_points {
            self.target_points = target_points;
        }
    }

    /// Target points from raw editor input; unparsable text falls back to the default.
    pub fn set_target_points_from_input(&mut self, input: &str) {
        self.target_points = match input.trim().parse::<u32>() {
            Ok(0) | Err(_) => DEFAULT_TARGET_POINTS,
            Ok(points) => points,
        };
    }

    pub fn total_points(&self) -> u64 {
        self.lines.iter().map(ArmyLineItem::line_points).sum()
    }

    pub fn total_unit_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// `total_points / target_points`; `None` when there is no budget to divide by.
    pub fn budget_utilization(&self) -> Option<f64> {
        if self.target_points == 0 {
            return None;
        }
        Some(self.total_points() as f64 / f64::from(self.target_points))
    }

    /// True once the ratio passes 1.0. With a zero budget any points count as over.
    pub fn is_over_budget(&self) -> bool {
        match self.budget_utilization() {
            Some(ratio) => ratio > 1.0,
            None => self.total_points() > 0,
        }
    }

    pub fn budget_status(&self) -> BudgetStatus {
        let total_points = self.total_points();
        BudgetStatus {
            total_points,
            target_points: self.target_points,
            total_unit_count: self.total_unit_count(),
            utilization: self.budget_utilization(),
            over_budget: self.is_over_budget(),
            remaining_points: i64::from(self.target_points)
                - i64::try_from(total_points).unwrap_or(i64::MAX),
        }
    }

    /// Back to an empty army with the default budget.
    pub fn reset(&mut self) {
        *self = ArmyComposition::new();
    }
}

/// Derived budget figures for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct BudgetStatus {
    pub total_points: u64,
    pub target_points: u32,
    pub total_unit_count: u64,
    pub utilization: Option<f64>,
    pub over_budget: bool,
    pub remaining_points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::unit;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            unit("u1", "Line Infantry", 100),
            unit("u2", "Cavalry", 150),
        ])
    }

    #[test]
    fn adding_twice_increments_one_line() {
        let catalog = catalog();
        let mut army = ArmyComposition::new();
        army.add_unit(&catalog, "u1").expect("add u1");
        army.add_unit(&catalog, "u1").expect("add u1 again");
        assert_eq!(army.lines().len(), 1);
        assert_eq!(army.lines()[0].quantity, 2);
    }

    #[test]
    fn totals_for_mixed_army() {
        let catalog = catalog();
        let mut army = ArmyComposition::new();
        army.add_unit(&catalog, "u1").expect("add");
        army.add_unit(&catalog, "u1").expect("add");
        army.add_unit(&catalog, "u2").expect("add");
        assert_eq!(army.total_unit_count(), 3);
        assert_eq!(army.total_points(), 350);
    }

    #[test]
    fn empty_army_totals_are_zero() {
        let army = ArmyComposition::new();
        assert_eq!(army.total_points(), 0);
        assert_eq!(army.total_unit_count(), 0);
        assert_eq!(army.budget_utilization(), Some(0.0));
        assert!(!army.is_over_budget());
    }

    #[test]
    fn unknown_unit_is_rejected_and_army_untouched() {
        let mut army = ArmyComposition::new();
        let err = army.add_unit(&catalog(), "nope").unwrap_err();
        assert_eq!(err, ArmyError::UnitNotFound("nope".to_string()));
        assert!(army.is_empty());
    }

    #[test]
    fn line_keeps_snapshot_after_catalog_changes() {
        let mut army = ArmyComposition::new();
        army.add_unit(&catalog(), "u1").expect("add");
        let repriced = Catalog::new(vec![unit("u1", "Renamed", 999)]);
        army.add_unit(&repriced, "u1").expect("add");
        let line = army.line("u1").expect("line");
        assert_eq!(line.name, "Line Infantry");
        assert_eq!(line.points_cost, 100);
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn remove_absent_unit_is_noop() {
        let mut army = ArmyComposition::new();
        army.add_unit(&catalog(), "u1").expect("add");
        army.remove_unit("u2");
        assert_eq!(army.lines().len(), 1);
        army.remove_unit("u1");
        assert!(army.is_empty());
        assert_eq!(army.total_unit_count(), 0);
    }

    #[test]
    fn set_quantity_clamps_to_one() {
        let mut army = ArmyComposition::new();
        army.add_unit(&catalog(), "u1").expect("add");
        army.set_quantity("u1", 0).expect("set");
        assert_eq!(army.line("u1").map(|l| l.quantity), Some(1));
        army.set_quantity("u1", -7).expect("set");
        assert_eq!(army.line("u1").map(|l| l.quantity), Some(1));
        army.set_quantity("u1", 4).expect("set");
        assert_eq!(army.total_points(), 400);
    }

    #[test]
    fn set_quantity_from_garbage_input_is_one() {
        let mut army = ArmyComposition::new();
        army.add_unit(&catalog(), "u1").expect("add");
        army.set_quantity_from_input("u1", "5").expect("set");
        assert_eq!(army.line("u1").map(|l| l.quantity), Some(5));
        army.set_quantity_from_input("u1", "lots").expect("set");
        assert_eq!(army.line("u1").map(|l| l.quantity), Some(1));
        army.set_quantity_from_input("u1", "2.5").expect("set");
        assert_eq!(army.line("u1").map(|l| l.quantity), Some(1));
    }

    #[test]
    fn set_quantity_on_missing_line_fails() {
        let mut army = ArmyComposition::new();
        assert_eq!(
            army.set_quantity("u1", 3),
            Err(ArmyError::UnitNotInArmy("u1".to_string()))
        );
        assert_eq!(
            army.set_notes("u1", "flank"),
            Err(ArmyError::UnitNotInArmy("u1".to_string()))
        );
    }

    #[test]
    fn utilization_and_over_budget() {
        let catalog = catalog();
        let mut army = ArmyComposition::new();
        army.add_unit(&catalog, "u1").expect("add");
        army.add_unit(&catalog, "u1").expect("add");
        army.add_unit(&catalog, "u2").expect("add");
        assert_eq!(army.target_points, 1000);
        let ratio = army.budget_utilization().expect("ratio");
        assert!((ratio - 0.35).abs() < 1e-9);
        assert!(!army.is_over_budget());

        // 350 + 7 * 100 = 1050
        army.set_quantity("u1", 9).expect("set");
        let ratio = army.budget_utilization().expect("ratio");
        assert!((ratio - 1.05).abs() < 1e-9);
        assert!(army.is_over_budget());
        assert_eq!(army.budget_status().remaining_points, -50);
    }

    #[test]
    fn zero_target_has_no_utilization() {
        let mut army = ArmyComposition::new();
        army.target_points = 0;
        assert_eq!(army.budget_utilization(), None);
        assert!(!army.is_over_budget());
        army.add_unit(&catalog(), "u1").expect("add");
        assert!(army.is_over_budget());
    }

    #[test]
    fn target_points_input_falls_back_to_default() {
        let mut army = ArmyComposition::new();
        army.set_target_points_from_input("1500");
        assert_eq!(army.target_points, 1500);
        army.set_target_points_from_input("abc");
        assert_eq!(army.target_points, DEFAULT_TARGET_POINTS);
    }

    #[test]
    fn reset_clears_everything() {
        let mut army = ArmyComposition::new();
        army.set_details(
            Some("Grande Armée".into()),
            Some("French".into()),
            Some("Napoleonic Wars".into()),
            Some(2000),
        );
        army.add_unit(&catalog(), "u2").expect("add");
        army.reset();
        assert_eq!(army, ArmyComposition::new());
        assert_eq!(army.target_points, DEFAULT_TARGET_POINTS);
    }

    #[test]
    fn from_parts_restores_line_invariants() {
        let line = |id: &str, quantity| ArmyLineItem {
            unit_id: id.to_string(),
            name: id.to_string(),
            quantity,
            points_cost: 10,
            notes: String::new(),
        };
        let army = ArmyComposition::from_parts(
            "a".into(),
            String::new(),
            String::new(),
            100,
            vec![line("x", 0), line("y", 2), line("x", 3)],
        );
        assert_eq!(army.lines().len(), 2);
        assert_eq!(army.line("x").map(|l| l.quantity), Some(4));
        assert_eq!(army.total_unit_count(), 6);
    }
}
