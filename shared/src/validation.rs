//! Validation utilities for the Hospitality School Management Platform
//!
//! Boundary checks applied to form and API input before records are
//! written. Unit and costing semantics live in [`crate::units`] and
//! [`crate::costing`]; these helpers only decide whether input is
//! acceptable at all.

use crate::units::{normalize_unit_alias, same_family, unit_type};

// ============================================================================
// Costing Validations
// ============================================================================

/// Validate that a unit code is one of the supported codes, accepting the
/// legacy `"liters"` alias
pub fn validate_unit_code(unit: &str) -> Result<(), &'static str> {
    if unit_type(normalize_unit_alias(unit)).is_known() {
        Ok(())
    } else {
        Err("Unit must be one of kg, g, L, ml")
    }
}

/// Validate that purchase and usage units belong to the same family
pub fn validate_unit_pairing(purchase_unit: &str, usage_unit: &str) -> Result<(), &'static str> {
    validate_unit_code(purchase_unit)?;
    validate_unit_code(usage_unit)?;
    if same_family(
        normalize_unit_alias(purchase_unit),
        normalize_unit_alias(usage_unit),
    ) {
        Ok(())
    } else {
        Err("Purchase and usage units must share a measurement family")
    }
}

/// Validate a purchase quantity (must be a positive, finite number)
pub fn validate_purchase_quantity(quantity: f64) -> Result<(), &'static str> {
    if !quantity.is_finite() {
        return Err("Purchase quantity must be a number");
    }
    if quantity <= 0.0 {
        return Err("Purchase quantity must be greater than zero");
    }
    Ok(())
}

/// Validate a purchase cost (must be a positive, finite amount)
pub fn validate_purchase_cost(cost: f64) -> Result<(), &'static str> {
    if !cost.is_finite() {
        return Err("Purchase cost must be a number");
    }
    if cost <= 0.0 {
        return Err("Purchase cost must be greater than zero");
    }
    Ok(())
}

/// Validate a recipe line quantity (non-negative, finite)
pub fn validate_line_quantity(quantity: f64) -> Result<(), &'static str> {
    if !quantity.is_finite() {
        return Err("Quantity must be a number");
    }
    if quantity < 0.0 {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate a class student headcount
pub fn validate_student_count(count: i32) -> Result<(), &'static str> {
    if count <= 0 {
        return Err("Student count must be greater than zero");
    }
    if count > 500 {
        return Err("Student count exceeds the supported maximum");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate a display name (person, supplier, recipe, class)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.len() > 120 {
        return Err("Name must be at most 120 characters");
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Costing Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_unit_code_valid() {
        assert!(validate_unit_code("kg").is_ok());
        assert!(validate_unit_code("g").is_ok());
        assert!(validate_unit_code("L").is_ok());
        assert!(validate_unit_code("ml").is_ok());
        assert!(validate_unit_code("liters").is_ok()); // legacy alias
    }

    #[test]
    fn test_validate_unit_code_invalid() {
        assert!(validate_unit_code("lbs").is_err());
        assert!(validate_unit_code("oz").is_err());
        assert!(validate_unit_code("").is_err());
        assert!(validate_unit_code("KG").is_err()); // codes are case-sensitive
    }

    #[test]
    fn test_validate_unit_pairing_same_family() {
        assert!(validate_unit_pairing("kg", "g").is_ok());
        assert!(validate_unit_pairing("g", "kg").is_ok());
        assert!(validate_unit_pairing("L", "ml").is_ok());
        assert!(validate_unit_pairing("liters", "ml").is_ok());
        assert!(validate_unit_pairing("kg", "kg").is_ok());
    }

    #[test]
    fn test_validate_unit_pairing_cross_family() {
        assert!(validate_unit_pairing("kg", "ml").is_err());
        assert!(validate_unit_pairing("L", "g").is_err());
        assert!(validate_unit_pairing("liters", "kg").is_err());
    }

    #[test]
    fn test_validate_purchase_quantity() {
        assert!(validate_purchase_quantity(5.0).is_ok());
        assert!(validate_purchase_quantity(0.001).is_ok());
        assert!(validate_purchase_quantity(0.0).is_err());
        assert!(validate_purchase_quantity(-1.0).is_err());
        assert!(validate_purchase_quantity(f64::NAN).is_err());
        assert!(validate_purchase_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_purchase_cost() {
        assert!(validate_purchase_cost(10.0).is_ok());
        assert!(validate_purchase_cost(0.0).is_err());
        assert!(validate_purchase_cost(-10.0).is_err());
        assert!(validate_purchase_cost(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_line_quantity_allows_zero() {
        assert!(validate_line_quantity(0.0).is_ok());
        assert!(validate_line_quantity(250.0).is_ok());
        assert!(validate_line_quantity(-0.5).is_err());
        assert!(validate_line_quantity(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_student_count() {
        assert!(validate_student_count(1).is_ok());
        assert!(validate_student_count(24).is_ok());
        assert!(validate_student_count(500).is_ok());
        assert!(validate_student_count(0).is_err());
        assert!(validate_student_count(-3).is_err());
        assert!(validate_student_count(501).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Pastry Basics").is_ok());
        assert!(validate_name("  trimmed  ").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@school.ac.uk").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("short").is_err());
    }
}
