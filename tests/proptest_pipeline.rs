//! Property-based tests for the quote pipeline.
//!
//! Random drafts and nesting settings are pushed through every stage and the
//! structural invariants checked on the output.

use cratecost::costing::{round_up, CostEngine};
use cratecost::engineering::{ProfileOverrides, RuleEngine};
use cratecost::nesting::{expand_units, nest, BoxType};
use cratecost::settings::default_settings;
use cratecost::{CrateDraft, CrateSettings, Item, Pipeline};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

fn arb_item() -> impl Strategy<Value = Item> {
    (
        1.0..300.0f64,
        1.0..300.0f64,
        1.0..80.0f64,
        0.0..200.0f64,
        1..=5u8,
        1..=5u32,
    )
        .prop_map(|(l, w, h, kg, fragility, qty)| Item::new(l, w, h, kg, fragility, qty))
}

fn arb_draft() -> impl Strategy<Value = CrateDraft> {
    (
        prop_oneof![
            Just("Local"),
            Just("Export ISPM-15"),
            Just("Maquinaria"),
            Just("Obra de arte"),
        ],
        proptest::collection::vec(arb_item(), 0..8),
    )
        .prop_map(|(service, items)| CrateDraft::new(service, items))
}

fn arb_settings() -> impl Strategy<Value = CrateSettings> {
    (5.0..60.0f64, 1..=8u32, 0.0..30.0f64, any::<bool>(), 1..=5u32).prop_map(
        |(max_depth, max_items, tolerance, rotation, step)| {
            let mut settings = default_settings();
            settings.nesting.max_depth_for_nesting_cm = max_depth;
            settings.nesting.max_items_per_box = max_items;
            settings.nesting.similarity_tolerance_pct = tolerance;
            settings.nesting.allow_rotation_default = rotation;
            settings.pricing.rounding.step_units = step;
            settings
        },
    )
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Every unit lands in exactly one box.
    #[test]
    fn prop_units_conserved(draft in arb_draft(), settings in arb_settings()) {
        let boxes = nest(&draft, &settings);
        let total: usize = boxes.iter().map(|b| b.item_count()).sum();
        prop_assert_eq!(total as u64, draft.unit_count());
        prop_assert_eq!(expand_units(&draft).len() as u64, draft.unit_count());
    }

    /// Units deeper than the nesting limit never share a crate.
    #[test]
    fn prop_deep_units_ship_alone(draft in arb_draft(), settings in arb_settings()) {
        let max_depth = settings.nesting.max_depth_for_nesting_cm;
        for b in nest(&draft, &settings) {
            if b.units.iter().any(|u| u.depth_cm > max_depth) {
                prop_assert_eq!(b.box_type, BoxType::Individual);
                prop_assert_eq!(b.item_count(), 1);
            }
        }
    }

    #[test]
    fn prop_group_size_bounded(draft in arb_draft(), settings in arb_settings()) {
        let max_items = settings.nesting.max_items_per_box as usize;
        for b in nest(&draft, &settings) {
            prop_assert!(b.item_count() <= max_items);
            prop_assert_eq!(b.box_type == BoxType::Consolidated, b.item_count() > 1);
        }
    }

    /// Rounded quantities cover the waste-adjusted raw quantity in whole steps.
    #[test]
    fn prop_rounding_covers_raw(draft in arb_draft(), settings in arb_settings()) {
        let quote = Pipeline::new(&settings).run(&draft).unwrap();
        let step = settings.pricing.rounding.step_units;
        let waste = &settings.pricing.waste_pct_by_material;

        for b in &quote.boxes {
            let raw = &b.engineered.bom_raw;
            let rounded = &b.bom_rounded;
            for (needed, got) in [
                (raw.plywood_sheets * (1.0 + waste.plywood), rounded.plywood_sheets),
                (raw.lumber_sticks * (1.0 + waste.lumber), rounded.lumber_sticks),
                (raw.foam_sheets * (1.0 + waste.foam), rounded.foam_sheets),
                (raw.cardboard_sheets, rounded.cardboard_sheets),
            ] {
                prop_assert!(f64::from(got) >= needed - 1e-9);
                prop_assert_eq!(got % step, 0);
            }
        }
    }

    #[test]
    fn prop_round_up_is_step_multiple(quantity in 0.0..10_000.0f64, step in 0..=12u32) {
        let rounded = round_up(quantity, step);
        let step = step.max(1);
        prop_assert_eq!(rounded % step, 0);
        prop_assert!(f64::from(rounded) >= quantity - 1e-9);
        prop_assert!(f64::from(rounded) < quantity + f64::from(step));
    }

    #[test]
    fn prop_sell_price_applies_markup(draft in arb_draft(), settings in arb_settings()) {
        let quote = Pipeline::new(&settings).run(&draft).unwrap();
        for b in &quote.boxes {
            let markup = settings.pricing.markup_pct_by_profile.get(b.engineered.profile);
            prop_assert!((b.sell_price - b.total_cost * (1.0 + markup)).abs() < 1e-6);
        }
    }

    /// Re-running engineering and costing on the same nesting output changes nothing.
    #[test]
    fn prop_engineering_and_costing_idempotent(draft in arb_draft(), settings in arb_settings()) {
        let boxes = nest(&draft, &settings);
        let rules = RuleEngine::new(&settings);
        let costs = CostEngine::new(&settings);

        let first = rules.engineer(&draft, &boxes, &ProfileOverrides::new());
        let second = rules.engineer(&draft, &boxes, &ProfileOverrides::new());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(costs.cost(&first.boxes), costs.cost(&second.boxes));
    }
}
