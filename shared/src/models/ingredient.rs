//! Ingredient models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::costing::derive_usage_cost;
use crate::units::Unit;

/// A purchasable ingredient with derived usage-unit pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub name: String,
    pub purchase_unit: Unit,
    /// Amount of `purchase_unit` one purchase buys
    pub purchase_quantity: f64,
    /// Currency paid for one purchase quantity
    pub purchase_cost: f64,
    /// Unit recipes measure this ingredient in, same family as the
    /// purchase unit
    pub usage_unit: Unit,
    /// Derived cost of one usage unit; never user-entered, recomputed
    /// whenever the purchase terms change
    pub usage_cost: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Recompute the usage cost from the current purchase terms
    pub fn derived_usage_cost(&self) -> Option<f64> {
        derive_usage_cost(
            self.purchase_cost,
            self.purchase_quantity,
            self.purchase_unit.code(),
            self.usage_unit.code(),
        )
    }
}
