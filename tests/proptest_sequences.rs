// Property-based tests over random editing sequences and record round-trips
use army_builder::army::record::{decode_units, encode_units, from_record, to_record};
use army_builder::army::ArmyComposition;
use army_builder::catalog::{Catalog, SizeClass, UnitCategory, UnitDefinition};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Edit {
    Add(usize),
    Remove(usize),
    SetQuantity(usize, i64),
}

fn catalog() -> Catalog {
    Catalog::new(
        (0..6u32)
            .map(|i| UnitDefinition {
                id: format!("u{i}"),
                name: format!("Unit {i}"),
                category: UnitCategory::all()[i as usize % 8],
                size: SizeClass::all()[i as usize % 5],
                points_cost: 25 * (i + 1),
                clash: 5,
                sustained_fire: 3,
                short_range_fire: 3,
                long_range_fire: 2,
                morale_save: 4,
                stamina: 3,
                special_rules: String::new(),
                description: String::new(),
            })
            .collect(),
    )
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..6).prop_map(Edit::Add),
        (0usize..6).prop_map(Edit::Remove),
        ((0usize..6), -5i64..20).prop_map(|(u, q)| Edit::SetQuantity(u, q)),
    ]
}

proptest! {
    #[test]
    fn proptest_totals_match_a_simple_model(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let catalog = catalog();
        let mut army = ArmyComposition::new();
        let mut model: BTreeMap<String, u64> = BTreeMap::new();
        for edit in &edits {
            match edit {
                Edit::Add(u) => {
                    let id = format!("u{u}");
                    army.add_unit(&catalog, &id).expect("add");
                    *model.entry(id).or_insert(0) += 1;
                }
                Edit::Remove(u) => {
                    let id = format!("u{u}");
                    army.remove_unit(&id);
                    model.remove(&id);
                }
                Edit::SetQuantity(u, q) => {
                    let id = format!("u{u}");
                    let result = army.set_quantity(&id, *q);
                    match model.get_mut(&id) {
                        Some(count) => {
                            prop_assert!(result.is_ok());
                            *count = (*q).max(1) as u64;
                        }
                        None => prop_assert!(result.is_err()),
                    }
                }
            }
        }
        let expected_count: u64 = model.values().sum();
        let expected_points: u64 = model
            .iter()
            .map(|(id, n)| u64::from(catalog.get(id).expect("unit").points_cost) * n)
            .sum();
        prop_assert_eq!(army.total_unit_count(), expected_count);
        prop_assert_eq!(army.total_points(), expected_points);
        prop_assert_eq!(army.lines().len(), model.len());
        prop_assert!(army.lines().iter().all(|l| l.quantity >= 1));
    }

    #[test]
    fn proptest_record_round_trip(
        adds in prop::collection::vec(0usize..6, 1..20),
        name in "[A-Za-z ]{1,30}",
        faction in "[A-Za-z]{0,12}",
        target in 0u32..5000,
        notes in "[a-z ]{0,20}",
    ) {
        let catalog = catalog();
        let mut army = ArmyComposition::new();
        army.set_details(Some(name), Some(faction), Some("Napoleonic Wars".to_string()), Some(target));
        for u in &adds {
            army.add_unit(&catalog, &format!("u{u}")).expect("add");
        }
        let first = army.lines()[0].unit_id.clone();
        army.set_notes(&first, &notes).expect("notes");

        let restored = from_record(to_record(&army));
        prop_assert_eq!(&restored, &army);

        let decoded = decode_units(Some(&encode_units(army.lines())));
        prop_assert_eq!(decoded.as_slice(), army.lines());
    }

    #[test]
    fn proptest_garbage_unit_text_decodes_empty(text in "[^\\[]{0,40}") {
        prop_assert!(decode_units(Some(&text)).is_empty());
    }
}
