//! Cost derivation and roll-ups for ingredients, recipes, and classes
//!
//! All arithmetic is plain f64; finiteness is checked wherever a value may
//! come from a half-filled form or an older record, and rounding happens
//! only in the explicit formatting helpers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::units::{convert, normalize_unit_alias, same_family};

/// Decimal places used when presenting a derived usage cost.
pub const USAGE_COST_DECIMALS: usize = 3;

/// Derive the cost of exactly one usage unit from the purchase terms.
///
/// `None` is the recoverable "not yet computable" state: a missing or
/// non-positive cost or quantity, or a usage unit in a different family
/// than the purchase unit, leaves the dependent field blank rather than
/// raising an error. The legacy `"liters"` alias is accepted on both unit
/// arguments.
pub fn derive_usage_cost(
    purchase_cost: f64,
    purchase_quantity: f64,
    purchase_unit: &str,
    usage_unit: &str,
) -> Option<f64> {
    if !purchase_cost.is_finite() || purchase_cost <= 0.0 {
        return None;
    }
    if !purchase_quantity.is_finite() || purchase_quantity <= 0.0 {
        return None;
    }

    let purchase_unit = normalize_unit_alias(purchase_unit);
    let usage_unit = normalize_unit_alias(usage_unit);
    if !same_family(purchase_unit, usage_unit) {
        return None;
    }

    let cost_per_purchase_unit = purchase_cost / purchase_quantity;
    // How many usage units make up one purchase unit
    let factor = convert(1.0, purchase_unit, usage_unit).ok()?.value;
    if !factor.is_finite() || factor <= 0.0 {
        return None;
    }

    Some(cost_per_purchase_unit / factor)
}

/// Render a usage cost for display, full precision stays with the caller
pub fn format_usage_cost(cost: f64) -> String {
    format!("{:.*}", USAGE_COST_DECIMALS, cost)
}

/// One costed line of a recipe or class sheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostLine {
    /// Ingredient or recipe this line refers to
    pub reference: Uuid,
    /// Per-line quantity where the sheet kind has one (recipe ingredients)
    pub quantity: Option<f64>,
    pub unit_cost: Option<f64>,
    pub total_cost: Option<f64>,
}

impl CostLine {
    pub fn from_unit_cost(reference: Uuid, unit_cost: f64) -> Self {
        Self {
            reference,
            quantity: None,
            unit_cost: Some(unit_cost),
            total_cost: None,
        }
    }

    pub fn from_total(reference: Uuid, total_cost: f64) -> Self {
        Self {
            reference,
            quantity: None,
            unit_cost: None,
            total_cost: Some(total_cost),
        }
    }
}

/// Scale a unit cost by a multiplier, falling back to the unscaled cost
/// when the multiplier is absent, non-finite, or non-positive
pub fn scaled_cost(unit_cost: f64, multiplier: Option<f64>) -> f64 {
    match multiplier {
        Some(m) if m.is_finite() && m > 0.0 => unit_cost * m,
        _ => unit_cost,
    }
}

/// What a single line adds to the grand total.
///
/// A finite precomputed total passes through unscaled; otherwise a finite
/// unit cost is scaled by the shared multiplier; anything else contributes
/// zero so one malformed line never poisons the sheet. A legitimate zero
/// cost is a real contribution, not a skip.
pub fn line_contribution(line: &CostLine, multiplier: Option<f64>) -> f64 {
    if let Some(total) = line.total_cost {
        if total.is_finite() {
            return total;
        }
    }
    if let Some(unit_cost) = line.unit_cost {
        if unit_cost.is_finite() {
            return scaled_cost(unit_cost, multiplier);
        }
    }
    0.0
}

/// Grand total over a collection of lines sharing one multiplier
pub fn order_total(lines: &[CostLine], multiplier: Option<f64>) -> f64 {
    lines
        .iter()
        .map(|line| line_contribution(line, multiplier))
        .sum()
}

/// Recompute the derived total of every line that carries a unit cost.
///
/// Runs whenever the shared multiplier changes so the per-line totals a
/// sheet displays stay consistent with its grand total. Lines that carry
/// only a precomputed total are left untouched.
pub fn reprice_lines(lines: &mut [CostLine], multiplier: Option<f64>) {
    for line in lines.iter_mut() {
        if let Some(unit_cost) = line.unit_cost {
            if unit_cost.is_finite() {
                line.total_cost = Some(scaled_cost(unit_cost, multiplier));
            }
        }
    }
}
