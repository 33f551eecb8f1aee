//! Tests for the ingredient costing pipeline
//!
//! Purchase terms (cost, quantity, unit) drive a derived per-usage-unit
//! cost. These tests cover the derivation rules, the family guards, and
//! the display formatting applied at the API boundary.

use proptest::prelude::*;

use shared::costing::{derive_usage_cost, format_usage_cost};
use shared::models::Ingredient;
use shared::units::{convert_and_format, same_family, Unit};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate positive purchase costs with two-decimal precision
fn purchase_cost_strategy() -> impl Strategy<Value = f64> {
    (1u32..1_000_000).prop_map(|n| n as f64 / 100.0)
}

/// Generate positive purchase quantities
fn purchase_quantity_strategy() -> impl Strategy<Value = f64> {
    (1u32..100_000).prop_map(|n| n as f64 / 10.0)
}

/// Generate a same-family unit pair
fn same_family_pair_strategy() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop_oneof![
        prop::sample::select(vec![("kg", "kg"), ("kg", "g"), ("g", "kg"), ("g", "g")]),
        prop::sample::select(vec![("L", "L"), ("L", "ml"), ("ml", "L"), ("ml", "ml")]),
    ]
}

/// Generate a cross-family unit pair
fn cross_family_pair_strategy() -> impl Strategy<Value = (&'static str, &'static str)> {
    prop::sample::select(vec![
        ("kg", "L"),
        ("kg", "ml"),
        ("g", "L"),
        ("g", "ml"),
        ("L", "kg"),
        ("L", "g"),
        ("ml", "kg"),
        ("ml", "g"),
    ])
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A well-formed purchase always derives a finite positive usage cost
    #[test]
    fn test_derived_cost_is_finite_and_positive(
        cost in purchase_cost_strategy(),
        quantity in purchase_quantity_strategy(),
        (purchase, usage) in same_family_pair_strategy(),
    ) {
        let derived = derive_usage_cost(cost, quantity, purchase, usage);
        prop_assert!(derived.is_some());
        let derived = derived.unwrap();
        prop_assert!(derived.is_finite());
        prop_assert!(derived > 0.0);
    }

    /// Doubling the purchase cost doubles the derived cost exactly
    #[test]
    fn test_derived_cost_linear_in_price(
        cost in purchase_cost_strategy(),
        quantity in purchase_quantity_strategy(),
        (purchase, usage) in same_family_pair_strategy(),
    ) {
        let single = derive_usage_cost(cost, quantity, purchase, usage).unwrap();
        let double = derive_usage_cost(cost * 2.0, quantity, purchase, usage).unwrap();
        prop_assert_eq!(double, single * 2.0);
    }

    /// Pricing in the minor unit costs a thousandth of the major unit
    #[test]
    fn test_minor_unit_is_a_thousandth(
        cost in purchase_cost_strategy(),
        quantity in purchase_quantity_strategy(),
    ) {
        let per_kg = derive_usage_cost(cost, quantity, "kg", "kg").unwrap();
        let per_g = derive_usage_cost(cost, quantity, "kg", "g").unwrap();
        prop_assert_eq!(per_g, per_kg / 1000.0);

        let per_l = derive_usage_cost(cost, quantity, "L", "L").unwrap();
        let per_ml = derive_usage_cost(cost, quantity, "L", "ml").unwrap();
        prop_assert_eq!(per_ml, per_l / 1000.0);
    }

    /// Cross-family pairings never derive a cost
    #[test]
    fn test_cross_family_never_derives(
        cost in purchase_cost_strategy(),
        quantity in purchase_quantity_strategy(),
        (purchase, usage) in cross_family_pair_strategy(),
    ) {
        prop_assert!(!same_family(purchase, usage));
        prop_assert_eq!(derive_usage_cost(cost, quantity, purchase, usage), None);
    }

    /// Non-positive purchase terms never derive a cost
    #[test]
    fn test_non_positive_terms_never_derive(
        bad in -1_000_000.0f64..=0.0,
        good in purchase_quantity_strategy(),
        (purchase, usage) in same_family_pair_strategy(),
    ) {
        prop_assert_eq!(derive_usage_cost(bad, good, purchase, usage), None);
        prop_assert_eq!(derive_usage_cost(good, bad, purchase, usage), None);
    }

    /// Pricing the whole purchase back out recovers the purchase cost
    #[test]
    fn test_derivation_consistent_with_purchase(
        cost in purchase_cost_strategy(),
        quantity in purchase_quantity_strategy(),
    ) {
        let per_g = derive_usage_cost(cost, quantity, "kg", "g").unwrap();
        let recovered = per_g * quantity * 1000.0;
        prop_assert!((recovered - cost).abs() <= cost * 1e-12);
    }
}

// ============================================================================
// Unit Tests: Worked Pricing Examples
// ============================================================================

mod worked_examples {
    use super::*;

    #[test]
    fn flour_bag_priced_per_gram() {
        // 10 kg bag for 20.00, recipes measure grams
        let per_g = derive_usage_cost(20.0, 10.0, "kg", "g").unwrap();
        assert_eq!(per_g, 0.002);
        assert_eq!(format_usage_cost(per_g), "0.002");
    }

    #[test]
    fn stock_priced_per_milliliter() {
        // 2.5 L carton for 12.50
        let per_ml = derive_usage_cost(12.5, 2.5, "L", "ml").unwrap();
        assert_eq!(per_ml, 0.005);
        assert_eq!(format_usage_cost(per_ml), "0.005");
    }

    #[test]
    fn oil_priced_with_legacy_liter_alias() {
        // Older records store "liters"; pricing per ml still works
        let per_ml = derive_usage_cost(45.0, 5.0, "liters", "ml").unwrap();
        assert_eq!(per_ml, 0.009);
    }

    #[test]
    fn same_unit_purchase_divides_straight() {
        let per_kg = derive_usage_cost(36.0, 12.0, "kg", "kg").unwrap();
        assert_eq!(per_kg, 3.0);
    }

    #[test]
    fn minor_to_major_purchase_scales_up() {
        // 750 g jar for 6.00, priced per kg
        let per_kg = derive_usage_cost(6.0, 750.0, "g", "kg").unwrap();
        assert_eq!(per_kg, 8.0);
    }

    #[test]
    fn half_filled_form_stays_blank() {
        assert_eq!(derive_usage_cost(0.0, 10.0, "kg", "g"), None);
        assert_eq!(derive_usage_cost(20.0, 0.0, "kg", "g"), None);
        assert_eq!(derive_usage_cost(20.0, 10.0, "", "g"), None);
    }
}

// ============================================================================
// Unit Tests: Ingredient Model
// ============================================================================

mod ingredient_model {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn ingredient(purchase_unit: Unit, usage_unit: Unit) -> Ingredient {
        Ingredient {
            id: Uuid::new_v4(),
            supplier_id: None,
            name: "Test ingredient".to_string(),
            purchase_unit,
            purchase_quantity: 4.0,
            purchase_cost: 10.0,
            usage_unit,
            usage_cost: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn derived_cost_from_model_fields() {
        let item = ingredient(Unit::Kilogram, Unit::Gram);
        assert_eq!(item.derived_usage_cost(), Some(0.0025));
    }

    #[test]
    fn model_refuses_cross_family_pairing() {
        let item = ingredient(Unit::Kilogram, Unit::Milliliter);
        assert_eq!(item.derived_usage_cost(), None);
    }
}

// ============================================================================
// Unit Tests: Display Formatting
// ============================================================================

mod display_formatting {
    use super::*;

    #[test]
    fn usage_cost_renders_three_decimals() {
        assert_eq!(format_usage_cost(0.005), "0.005");
        assert_eq!(format_usage_cost(2.0), "2.000");
        assert_eq!(format_usage_cost(1.125), "1.125");
    }

    #[test]
    fn conversions_render_with_requested_precision() {
        assert_eq!(convert_and_format(0.75, "kg", "g", 1).unwrap(), "750.0");
        assert_eq!(convert_and_format(330.0, "ml", "L", 2).unwrap(), "0.33");
    }

    #[test]
    fn formatting_propagates_conversion_failures() {
        assert!(convert_and_format(1.0, "kg", "ml", 2).is_err());
    }
}
