//! Measurement units and conversions for ingredient costing
//!
//! Two families are supported, weight (kg/g) and volume (L/ml), both with a
//! 1:1000 major:minor ratio. Classification works on raw strings because unit
//! tags arrive from form selects and older stored records; typed code should
//! go through [`Unit`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight family unit codes, major unit first.
pub const WEIGHT_UNITS: &[&str] = &["kg", "g"];

/// Volume family unit codes, major unit first.
pub const VOLUME_UNITS: &[&str] = &["L", "ml"];

/// Display alias used by older stored values for `"L"`.
pub const LEGACY_LITER_ALIAS: &str = "liters";

/// Minor units per major unit, identical for both families.
const FAMILY_RATIO: f64 = 1000.0;

/// Measurement family of a unit string
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Weight,
    Volume,
    Unknown,
}

impl UnitType {
    pub fn is_known(self) -> bool {
        self != UnitType::Unknown
    }

    /// Unit codes belonging to this family, empty for `Unknown`
    pub fn units(self) -> &'static [&'static str] {
        match self {
            UnitType::Weight => WEIGHT_UNITS,
            UnitType::Volume => VOLUME_UNITS,
            UnitType::Unknown => &[],
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitType::Weight => write!(f, "weight"),
            UnitType::Volume => write!(f, "volume"),
            UnitType::Unknown => write!(f, "unknown"),
        }
    }
}

/// A measurement unit accepted by the costing engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "L", alias = "liters")]
    Liter,
    #[serde(rename = "ml")]
    Milliliter,
}

impl Unit {
    /// Parse a unit code, accepting the legacy `"liters"` alias
    pub fn parse(code: &str) -> Option<Unit> {
        match normalize_unit_alias(code) {
            "kg" => Some(Unit::Kilogram),
            "g" => Some(Unit::Gram),
            "L" => Some(Unit::Liter),
            "ml" => Some(Unit::Milliliter),
            _ => None,
        }
    }

    /// Canonical wire/storage code (`"L"`, never the alias)
    pub fn code(self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Liter => "L",
            Unit::Milliliter => "ml",
        }
    }

    pub fn unit_type(self) -> UnitType {
        match self {
            Unit::Kilogram | Unit::Gram => UnitType::Weight,
            Unit::Liter | Unit::Milliliter => UnitType::Volume,
        }
    }

    /// True for the major unit of each family (kg, L)
    pub fn is_major(self) -> bool {
        matches!(self, Unit::Kilogram | Unit::Liter)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Map the legacy `"liters"` alias to `"L"`, leaving every other string untouched.
///
/// The classifier below is deliberately alias-blind; callers sitting at a
/// form or storage boundary route input through this first so the
/// compatibility mapping stays in one visible place.
pub fn normalize_unit_alias(unit: &str) -> &str {
    if unit == LEGACY_LITER_ALIAS {
        "L"
    } else {
        unit
    }
}

/// True iff the code is one of the weight units (kg, g)
pub fn is_weight_unit(unit: &str) -> bool {
    WEIGHT_UNITS.contains(&unit)
}

/// True iff the code is one of the volume units (L, ml)
pub fn is_volume_unit(unit: &str) -> bool {
    VOLUME_UNITS.contains(&unit)
}

/// Classify a raw unit code. Every input has a defined classification;
/// unrecognized codes are `Unknown`, never an error.
pub fn unit_type(unit: &str) -> UnitType {
    if is_weight_unit(unit) {
        UnitType::Weight
    } else if is_volume_unit(unit) {
        UnitType::Volume
    } else {
        UnitType::Unknown
    }
}

/// True iff both codes classify to the same known family
pub fn same_family(a: &str, b: &str) -> bool {
    let family = unit_type(a);
    family.is_known() && family == unit_type(b)
}

/// Unit codes selectable for a family label (`"weight"` or `"volume"`),
/// empty slice for anything else
pub fn available_units(family: &str) -> &'static [&'static str] {
    match family {
        "weight" => WEIGHT_UNITS,
        "volume" => VOLUME_UNITS,
        _ => &[],
    }
}

/// Conversion failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    /// Negative magnitudes are rejected before any arithmetic
    #[error("cannot convert a negative value: {0}")]
    NegativeValue(f64),
    /// A family-specific converter received a unit outside its family
    #[error("unit '{unit}' is not a {family} unit")]
    UnsupportedUnit { unit: String, family: UnitType },
    /// Weight and volume never interconvert
    #[error("cannot convert from '{from}' to '{to}': units belong to different measurement families")]
    CrossFamily { from: String, to: String },
}

/// Outcome of a conversion, keeping the original pair for traceability
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversion {
    pub value: f64,
    pub unit: String,
    pub original_value: f64,
    pub original_unit: String,
}

impl Conversion {
    fn identity(value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
            original_value: value,
            original_unit: unit.to_string(),
        }
    }
}

fn unsupported(unit: &str, family: UnitType) -> ConversionError {
    ConversionError::UnsupportedUnit {
        unit: unit.to_string(),
        family,
    }
}

/// Convert between the weight units. Identity for `from == to`, kg→g
/// multiplies by 1000, g→kg divides by 1000.
pub fn convert_weight(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    if value < 0.0 {
        return Err(ConversionError::NegativeValue(value));
    }
    if !is_weight_unit(from) {
        return Err(unsupported(from, UnitType::Weight));
    }
    if !is_weight_unit(to) {
        return Err(unsupported(to, UnitType::Weight));
    }
    if from == to {
        return Ok(value);
    }
    Ok(match from {
        "kg" => value * FAMILY_RATIO,
        _ => value / FAMILY_RATIO,
    })
}

/// Convert between the volume units, same ratio and error conditions as
/// [`convert_weight`]
pub fn convert_volume(value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
    if value < 0.0 {
        return Err(ConversionError::NegativeValue(value));
    }
    if !is_volume_unit(from) {
        return Err(unsupported(from, UnitType::Volume));
    }
    if !is_volume_unit(to) {
        return Err(unsupported(to, UnitType::Volume));
    }
    if from == to {
        return Ok(value);
    }
    Ok(match from {
        "L" => value * FAMILY_RATIO,
        _ => value / FAMILY_RATIO,
    })
}

/// Universal conversion entry point.
///
/// `from == to` is an identity and does not inspect the unit family, so the
/// tag itself is not validated on that path. Any other pairing classifies
/// both units and delegates to the family converter; a weight/volume mix,
/// or any unrecognized tag, is a hard [`ConversionError::CrossFamily`]
/// failure rather than a best-effort guess. Callers at a form or storage
/// boundary are expected to run [`normalize_unit_alias`] first.
pub fn convert(value: f64, from: &str, to: &str) -> Result<Conversion, ConversionError> {
    if from == to {
        return Ok(Conversion::identity(value, from));
    }

    let converted = match (unit_type(from), unit_type(to)) {
        (UnitType::Weight, UnitType::Weight) => convert_weight(value, from, to)?,
        (UnitType::Volume, UnitType::Volume) => convert_volume(value, from, to)?,
        _ => {
            return Err(ConversionError::CrossFamily {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    };

    Ok(Conversion {
        value: converted,
        unit: to.to_string(),
        original_value: value,
        original_unit: from.to_string(),
    })
}

/// Convert and render with exactly `decimals` fractional digits, zero-padded
///
/// # Examples
///
/// ```
/// use shared::units::convert_and_format;
/// assert_eq!(convert_and_format(1.5, "kg", "g", 2).unwrap(), "1500.00");
/// ```
pub fn convert_and_format(
    value: f64,
    from: &str,
    to: &str,
    decimals: usize,
) -> Result<String, ConversionError> {
    let conversion = convert(value, from, to)?;
    Ok(format!("{:.*}", decimals, conversion.value))
}
