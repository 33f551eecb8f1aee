//! Form state for the costing screens
//!
//! Each form is a single state record whose derived fields are recomputed
//! from the source fields on every change, so a read-only field is either
//! current or blank, never stale. The records serialize to JSON for the
//! WASM boundary.

use serde::{Deserialize, Serialize};

use crate::costing::{
    derive_usage_cost, format_usage_cost, order_total, reprice_lines, scaled_cost, CostLine,
};
use crate::units::{normalize_unit_alias, unit_type};

/// State behind the ingredient create/edit form.
///
/// The usage cost is never user-entered; it goes blank whenever the other
/// fields are insufficient to derive it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IngredientCostForm {
    pub purchase_unit: Option<String>,
    pub purchase_quantity: Option<f64>,
    pub purchase_cost: Option<f64>,
    pub usage_unit: Option<String>,
    pub usage_cost: Option<f64>,
}

impl IngredientCostForm {
    /// Build form state from a stored record, normalizing the legacy
    /// `"liters"` alias and deriving the usage cost fresh
    pub fn load(
        purchase_unit: &str,
        purchase_quantity: f64,
        purchase_cost: f64,
        usage_unit: &str,
    ) -> Self {
        let mut form = Self {
            purchase_unit: Some(normalize_unit_alias(purchase_unit).to_string()),
            purchase_quantity: Some(purchase_quantity),
            purchase_cost: Some(purchase_cost),
            usage_unit: Some(normalize_unit_alias(usage_unit).to_string()),
            usage_cost: None,
        };
        form.recompute();
        form
    }

    /// Change the purchase unit. Moving to a different measurement family
    /// resets the usage unit and usage cost so the selections are never
    /// left inconsistent.
    pub fn set_purchase_unit(&mut self, unit: &str) {
        let unit = normalize_unit_alias(unit).to_string();
        if let Some(usage) = self.usage_unit.as_deref() {
            if unit_type(usage) != unit_type(&unit) {
                self.usage_unit = None;
            }
        }
        self.purchase_unit = if unit.is_empty() { None } else { Some(unit) };
        self.recompute();
    }

    pub fn set_purchase_quantity(&mut self, quantity: Option<f64>) {
        self.purchase_quantity = quantity;
        self.recompute();
    }

    pub fn set_purchase_cost(&mut self, cost: Option<f64>) {
        self.purchase_cost = cost;
        self.recompute();
    }

    pub fn set_usage_unit(&mut self, unit: &str) {
        let unit = normalize_unit_alias(unit);
        self.usage_unit = if unit.is_empty() {
            None
        } else {
            Some(unit.to_string())
        };
        self.recompute();
    }

    /// Usage units selectable for the current purchase unit's family
    pub fn usage_unit_options(&self) -> &'static [&'static str] {
        match self.purchase_unit.as_deref() {
            Some(unit) => unit_type(unit).units(),
            None => &[],
        }
    }

    /// True when both units are selected but belong to different families.
    /// Surfaced as a blocking validation message in the UI.
    pub fn cross_family_conflict(&self) -> bool {
        match (self.purchase_unit.as_deref(), self.usage_unit.as_deref()) {
            (Some(purchase), Some(usage)) => {
                let purchase_family = unit_type(purchase);
                let usage_family = unit_type(usage);
                purchase_family.is_known()
                    && usage_family.is_known()
                    && purchase_family != usage_family
            }
            _ => false,
        }
    }

    pub fn formatted_usage_cost(&self) -> Option<String> {
        self.usage_cost.map(format_usage_cost)
    }

    fn recompute(&mut self) {
        self.usage_cost = match (
            self.purchase_cost,
            self.purchase_quantity,
            self.purchase_unit.as_deref(),
            self.usage_unit.as_deref(),
        ) {
            (Some(cost), Some(quantity), Some(purchase), Some(usage)) => {
                derive_usage_cost(cost, quantity, purchase, usage)
            }
            _ => None,
        };
    }
}

/// Cost sheet for a single recipe: each line's total derives from its own
/// quantity, the grand total from the aggregator with no shared multiplier
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecipeCostSheet {
    pub lines: Vec<CostLine>,
}

impl RecipeCostSheet {
    pub fn new(lines: Vec<CostLine>) -> Self {
        let mut sheet = Self { lines };
        sheet.price_lines();
        sheet
    }

    /// Recompute every line total from its unit cost and quantity
    pub fn price_lines(&mut self) {
        for line in self.lines.iter_mut() {
            if let Some(unit_cost) = line.unit_cost {
                if unit_cost.is_finite() {
                    line.total_cost = Some(scaled_cost(unit_cost, line.quantity));
                }
            }
        }
    }

    pub fn set_line_quantity(&mut self, index: usize, quantity: Option<f64>) {
        if let Some(line) = self.lines.get_mut(index) {
            line.quantity = quantity;
        }
        self.price_lines();
    }

    pub fn grand_total(&self) -> f64 {
        order_total(&self.lines, None)
    }
}

/// Cost sheet for a class: every line shares the student headcount as its
/// multiplier, and changing the headcount reprices all lines eagerly
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassCostSheet {
    pub lines: Vec<CostLine>,
    pub student_count: Option<f64>,
}

impl ClassCostSheet {
    pub fn new(lines: Vec<CostLine>, student_count: Option<f64>) -> Self {
        let mut sheet = Self {
            lines,
            student_count,
        };
        sheet.reprice();
        sheet
    }

    pub fn set_student_count(&mut self, count: Option<f64>) {
        self.student_count = count;
        self.reprice();
    }

    pub fn grand_total(&self) -> f64 {
        order_total(&self.lines, self.student_count)
    }

    fn reprice(&mut self) {
        reprice_lines(&mut self.lines, self.student_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    // ========================================================================
    // Ingredient Form Tests
    // ========================================================================

    #[test]
    fn test_usage_cost_recomputed_on_every_change() {
        let mut form = IngredientCostForm::default();
        assert_eq!(form.usage_cost, None);

        form.set_purchase_unit("kg");
        form.set_purchase_quantity(Some(5.0));
        form.set_purchase_cost(Some(10.0));
        assert_eq!(form.usage_cost, None); // usage unit still missing

        form.set_usage_unit("g");
        assert_eq!(form.usage_cost, Some(0.002));
        assert_eq!(form.formatted_usage_cost().as_deref(), Some("0.002"));

        form.set_purchase_cost(Some(20.0));
        assert_eq!(form.usage_cost, Some(0.004));
    }

    #[test]
    fn test_usage_cost_blank_not_stale() {
        let mut form = IngredientCostForm::load("kg", 5.0, 10.0, "g");
        assert_eq!(form.usage_cost, Some(0.002));

        // Clearing an input blanks the derived field instead of keeping
        // the previous value
        form.set_purchase_quantity(None);
        assert_eq!(form.usage_cost, None);

        form.set_purchase_quantity(Some(0.0));
        assert_eq!(form.usage_cost, None);
    }

    #[test]
    fn test_family_change_resets_usage_unit_and_cost() {
        let mut form = IngredientCostForm::load("kg", 5.0, 10.0, "g");
        assert_eq!(form.usage_cost, Some(0.002));

        form.set_purchase_unit("L");
        assert_eq!(form.usage_unit, None);
        assert_eq!(form.usage_cost, None);
        assert_eq!(form.usage_unit_options(), &["L", "ml"]);
    }

    #[test]
    fn test_same_family_change_keeps_usage_unit() {
        let mut form = IngredientCostForm::load("kg", 5.0, 10.0, "g");
        form.set_purchase_unit("g");
        assert_eq!(form.usage_unit.as_deref(), Some("g"));
        assert_eq!(form.usage_cost, Some(2.0));
    }

    #[test]
    fn test_load_normalizes_liters_alias() {
        let form = IngredientCostForm::load("liters", 2.0, 10.0, "ml");
        assert_eq!(form.purchase_unit.as_deref(), Some("L"));
        assert_eq!(form.usage_cost, Some(0.005));
    }

    #[test]
    fn test_cross_family_conflict_flag() {
        let mut form = IngredientCostForm::load("kg", 5.0, 10.0, "g");
        assert!(!form.cross_family_conflict());

        // Conflicting selection loaded from an older record
        form.usage_unit = Some("ml".to_string());
        form.recompute();
        assert!(form.cross_family_conflict());
        assert_eq!(form.usage_cost, None);
    }

    #[test]
    fn test_usage_unit_options_follow_family() {
        let mut form = IngredientCostForm::default();
        assert!(form.usage_unit_options().is_empty());
        form.set_purchase_unit("ml");
        assert_eq!(form.usage_unit_options(), &["L", "ml"]);
        form.set_purchase_unit("g");
        assert_eq!(form.usage_unit_options(), &["kg", "g"]);
    }

    // ========================================================================
    // Recipe Sheet Tests
    // ========================================================================

    #[test]
    fn test_recipe_sheet_prices_lines_by_quantity() {
        let mut sheet = RecipeCostSheet::new(vec![
            CostLine {
                reference: Uuid::new_v4(),
                quantity: Some(200.0),
                unit_cost: Some(0.002),
                total_cost: None,
            },
            CostLine {
                reference: Uuid::new_v4(),
                quantity: Some(3.0),
                unit_cost: Some(1.5),
                total_cost: None,
            },
        ]);
        assert_eq!(sheet.lines[0].total_cost, Some(0.4));
        assert_eq!(sheet.lines[1].total_cost, Some(4.5));
        assert_eq!(sheet.grand_total(), 4.9);

        sheet.set_line_quantity(1, Some(4.0));
        assert_eq!(sheet.lines[1].total_cost, Some(6.0));
        assert_eq!(sheet.grand_total(), 6.4);
    }

    #[test]
    fn test_recipe_sheet_line_without_quantity_uses_unit_cost() {
        let sheet = RecipeCostSheet::new(vec![CostLine::from_unit_cost(Uuid::new_v4(), 2.5)]);
        assert_eq!(sheet.lines[0].total_cost, Some(2.5));
        assert_eq!(sheet.grand_total(), 2.5);
    }

    // ========================================================================
    // Class Sheet Tests
    // ========================================================================

    #[test]
    fn test_class_sheet_reprices_on_headcount_change() {
        let mut sheet = ClassCostSheet::new(
            vec![
                CostLine::from_unit_cost(Uuid::new_v4(), 5.0),
                CostLine::from_total(Uuid::new_v4(), 12.0),
                CostLine::from_unit_cost(Uuid::new_v4(), 3.0),
            ],
            Some(2.0),
        );
        assert_eq!(sheet.grand_total(), 28.0);
        assert_eq!(sheet.lines[0].total_cost, Some(10.0));

        sheet.set_student_count(Some(4.0));
        assert_eq!(sheet.lines[0].total_cost, Some(20.0));
        assert_eq!(sheet.lines[1].total_cost, Some(12.0));
        assert_eq!(sheet.lines[2].total_cost, Some(12.0));
        assert_eq!(sheet.grand_total(), 44.0);
    }

    #[test]
    fn test_class_sheet_without_headcount_falls_back() {
        let sheet = ClassCostSheet::new(
            vec![CostLine::from_unit_cost(Uuid::new_v4(), 5.0)],
            None,
        );
        assert_eq!(sheet.grand_total(), 5.0);
        assert_eq!(sheet.lines[0].total_cost, Some(5.0));
    }
}
