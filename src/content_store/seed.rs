//! Demo catalog installed into an empty store.

use super::schema::{KIND_HOME, KIND_UNIT};
use super::{ContentStore, StoreError};
use crate::catalog::{SizeClass, UnitCategory};
use crate::gateway::{unit_properties, UnitFields};

pub const HOME_NAME: &str = "Black Powder";

#[allow(clippy::too_many_arguments)]
fn seed_unit(
    name: &'static str,
    category: UnitCategory,
    size: SizeClass,
    points_cost: u32,
    stats: [i32; 6],
    special_rules: &'static str,
    description: &'static str,
) -> UnitFields<'static> {
    UnitFields {
        name,
        category,
        size,
        points_cost,
        clash: stats[0],
        sustained_fire: stats[1],
        short_range_fire: stats[2],
        long_range_fire: stats[3],
        morale_save: stats[4],
        stamina: stats[5],
        special_rules,
        description,
    }
}

fn published_units() -> Vec<UnitFields<'static>> {
    vec![
        seed_unit(
            "Line Infantry",
            UnitCategory::Infantry,
            SizeClass::Standard,
            100,
            [6, 3, 3, 3, 4, 3],
            "",
            "Formed battalion of musket-armed line troops.",
        ),
        seed_unit(
            "Light Infantry",
            UnitCategory::LightInfantry,
            SizeClass::Small,
            70,
            [4, 2, 2, 2, 4, 2],
            "Skirmish",
            "Open-order troops screening the line.",
        ),
        seed_unit(
            "Guard Grenadiers",
            UnitCategory::HeavyInfantry,
            SizeClass::Standard,
            160,
            [8, 3, 3, 3, 3, 4],
            "Elite 4+, Steady",
            "Veteran grenadiers held in reserve.",
        ),
        seed_unit(
            "Hussars",
            UnitCategory::LightCavalry,
            SizeClass::Standard,
            110,
            [6, 1, 1, 0, 5, 3],
            "Marauders",
            "Light horse for scouting and pursuit.",
        ),
        seed_unit(
            "Cuirassiers",
            UnitCategory::HeavyCavalry,
            SizeClass::Standard,
            150,
            [9, 0, 0, 0, 4, 3],
            "Heavy Cavalry D3",
            "Armoured shock cavalry.",
        ),
        seed_unit(
            "Dragoons",
            UnitCategory::Dragoons,
            SizeClass::Standard,
            120,
            [7, 1, 1, 0, 4, 3],
            "",
            "Mounted troops able to fight on foot.",
        ),
        seed_unit(
            "Foot Artillery",
            UnitCategory::Artillery,
            SizeClass::Small,
            90,
            [1, 0, 3, 2, 4, 2],
            "",
            "A battery of smoothbore field guns.",
        ),
        seed_unit(
            "Massed Battery",
            UnitCategory::Artillery,
            SizeClass::Large,
            140,
            [1, 0, 4, 3, 4, 2],
            "",
            "Several batteries massed under one commander.",
        ),
    ]
}

fn draft_units() -> Vec<UnitFields<'static>> {
    vec![seed_unit(
        "Rocket Troop",
        UnitCategory::Artillery,
        SizeClass::Tiny,
        40,
        [1, 0, 1, 2, 5, 1],
        "Rockets",
        "Unfinished draft, not yet published.",
    )]
}

/// Install the home node and the demo units unless units already exist.
/// Returns the number of units written.
pub fn install_demo_catalog(store: &mut ContentStore) -> Result<usize, StoreError> {
    let home = store.ensure_root(KIND_HOME, HOME_NAME)?;
    if store.of_kind(KIND_UNIT).next().is_some() {
        return Ok(0);
    }
    let mut written = 0;
    for (fields, publish) in published_units()
        .into_iter()
        .map(|f| (f, true))
        .chain(draft_units().into_iter().map(|f| (f, false)))
    {
        let mut node = store.create(fields.name, Some(home.as_str()), KIND_UNIT)?;
        node.properties = unit_properties(&fields);
        let key = node.key.clone();
        store.save(node)?;
        if publish {
            store.publish(&key)?;
        }
        written += 1;
    }
    // Drafts are never published, so write them out explicitly
    store.flush()?;
    log::info!("Installed {} demo catalog units", written);
    Ok(written)
}
