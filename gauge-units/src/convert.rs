//! The conversion engine
//!
//! `convert` is the entry point for as-you-type input: every rejection
//! (bad numeral, unknown category or unit) yields an empty string. Callers
//! that want to know why use `try_convert`.

use tracing::{debug, trace};
use gauge_core::parse_numeral;
use crate::{Category, ConversionError, ConversionUnit, UNITS};
use crate::format::format_result;

/// Convert `value` between two units of a category, formatted for display.
///
/// Returns an empty string when the numeral does not parse, when the
/// category or either unit is unknown, or when the result overflows.
pub fn convert(value: &str, from_unit: &str, to_unit: &str, category: &str) -> String {
    match try_convert(value, from_unit, to_unit, category) {
        Ok(result) => format_result(result),
        Err(e) => {
            debug!(value, from_unit, to_unit, category, error = %e, "conversion rejected");
            String::new()
        }
    }
}

/// Convert `value` between two units of a category.
pub fn try_convert(
    value: &str,
    from_unit: &str,
    to_unit: &str,
    category: &str,
) -> Result<f64, ConversionError> {
    let value = parse_numeral(value)?;
    let table = UNITS.by_key(category)?;
    let from = table.unit(from_unit)?;
    let to = table.unit(to_unit)?;

    let result = convert_value(value, from, to);
    if !result.is_finite() {
        return Err(ConversionError::NonFiniteResult);
    }

    trace!(value, from = from.name, to = to.name, result, "converted");
    Ok(result)
}

/// Numeric core: route `value` through the category's base unit.
///
/// Converting a unit to itself returns the input untouched.
pub fn convert_value(value: f64, from: &ConversionUnit, to: &ConversionUnit) -> f64 {
    if from.name == to.name {
        return value;
    }
    to.from_base(from.to_base(value))
}

/// Convert within a known category by unit name or symbol.
pub fn convert_in(
    category: Category,
    value: f64,
    from_unit: &str,
    to_unit: &str,
) -> Result<f64, ConversionError> {
    let table = UNITS.get(category);
    let from = table.unit(from_unit)?;
    let to = table.unit(to_unit)?;
    Ok(convert_value(value, from, to))
}
