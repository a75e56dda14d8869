//! Unit representation with conversion scales

use std::fmt;
use thiserror::Error;
use gauge_core::{GaugeError, NumberError};
use crate::Category;

/// How a unit relates to its category's base unit
#[derive(Debug, Clone, Copy)]
pub enum Scale {
    /// value_base = value * factor
    Linear { factor: f64 },
    /// Offset scales routed through Celsius (temperature only)
    Affine {
        to_celsius: fn(f64) -> f64,
        from_celsius: fn(f64) -> f64,
    },
}

/// A unit of measurement within one category
#[derive(Debug, Clone, Copy)]
pub struct ConversionUnit {
    /// Display name, also the primary lookup key (e.g., "Kilometer")
    pub name: &'static str,
    /// Short symbol (e.g., "km")
    pub symbol: &'static str,
    pub scale: Scale,
}

impl ConversionUnit {
    /// Create a unit with proportional conversion
    pub const fn linear(name: &'static str, symbol: &'static str, factor: f64) -> Self {
        ConversionUnit { name, symbol, scale: Scale::Linear { factor } }
    }

    /// Create a unit with an offset conversion through Celsius
    pub const fn affine(
        name: &'static str,
        symbol: &'static str,
        to_celsius: fn(f64) -> f64,
        from_celsius: fn(f64) -> f64,
    ) -> Self {
        ConversionUnit { name, symbol, scale: Scale::Affine { to_celsius, from_celsius } }
    }

    /// Multiplicative factor, `None` for affine units
    pub fn factor(&self) -> Option<f64> {
        match self.scale {
            Scale::Linear { factor } => Some(factor),
            Scale::Affine { .. } => None,
        }
    }

    pub fn is_affine(&self) -> bool {
        matches!(self.scale, Scale::Affine { .. })
    }

    /// "linear" or "affine"
    pub fn kind(&self) -> &'static str {
        match self.scale {
            Scale::Linear { .. } => "linear",
            Scale::Affine { .. } => "affine",
        }
    }

    /// Whether this is the category's reference unit
    pub fn is_base(&self) -> bool {
        match self.scale {
            Scale::Linear { factor } => factor == 1.0,
            Scale::Affine { to_celsius, .. } => to_celsius(0.0) == 0.0 && to_celsius(1.0) == 1.0,
        }
    }

    /// Convert a value in this unit to the category's base unit
    pub fn to_base(&self, value: f64) -> f64 {
        match self.scale {
            Scale::Linear { factor } => value * factor,
            Scale::Affine { to_celsius, .. } => to_celsius(value),
        }
    }

    /// Convert a value in the category's base unit to this unit
    pub fn from_base(&self, value: f64) -> f64 {
        match self.scale {
            Scale::Linear { factor } => value / factor,
            Scale::Affine { from_celsius, .. } => from_celsius(value),
        }
    }

    /// Whether `key` names this unit, by display name or symbol
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.symbol == key
    }
}

impl fmt::Display for ConversionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}

/// Errors that can occur during unit conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("invalid number: {0}")]
    InvalidNumber(#[from] NumberError),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown unit '{unit}' in category {category}")]
    UnknownUnit { category: Category, unit: String },

    #[error("result is not finite")]
    NonFiniteResult,
}

impl From<ConversionError> for GaugeError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::InvalidNumber(e) => e.into(),
            ConversionError::UnknownCategory(name) => {
                GaugeError::unknown_category(&name, &Category::keys())
            }
            ConversionError::UnknownUnit { category, unit } => {
                GaugeError::unknown_unit(category.key(), &unit)
            }
            ConversionError::NonFiniteResult => GaugeError::domain_error("conversion result is not finite"),
        }
    }
}
