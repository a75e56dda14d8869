//! Measurement categories
//!
//! Every unit belongs to exactly one category, and conversions never cross
//! category boundaries.

use std::fmt;
use std::str::FromStr;
use crate::ConversionError;

/// The ten measurement categories known to the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Length,
    Weight,
    Temperature,
    Volume,
    Area,
    Time,
    Speed,
    Data,
    Energy,
    Pressure,
}

impl Category {
    /// All categories in display order
    pub const ALL: [Category; 10] = [
        Category::Length,
        Category::Weight,
        Category::Temperature,
        Category::Volume,
        Category::Area,
        Category::Time,
        Category::Speed,
        Category::Data,
        Category::Energy,
        Category::Pressure,
    ];

    /// Machine key, e.g. "length"
    pub fn key(&self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Weight => "weight",
            Category::Temperature => "temperature",
            Category::Volume => "volume",
            Category::Area => "area",
            Category::Time => "time",
            Category::Speed => "speed",
            Category::Data => "data",
            Category::Energy => "energy",
            Category::Pressure => "pressure",
        }
    }

    /// Display name, e.g. "Weight/Mass"
    pub fn name(&self) -> &'static str {
        match self {
            Category::Length => "Length",
            Category::Weight => "Weight/Mass",
            Category::Temperature => "Temperature",
            Category::Volume => "Volume",
            Category::Area => "Area",
            Category::Time => "Time",
            Category::Speed => "Speed",
            Category::Data => "Digital Storage",
            Category::Energy => "Energy",
            Category::Pressure => "Pressure",
        }
    }

    /// Name of the reference unit all factors are relative to
    pub fn base_unit(&self) -> &'static str {
        match self {
            Category::Length => "meter",
            Category::Weight => "kilogram",
            Category::Temperature => "celsius",
            Category::Volume => "liter",
            Category::Area => "square meter",
            Category::Time => "second",
            Category::Speed => "meter per second",
            Category::Data => "byte",
            Category::Energy => "joule",
            Category::Pressure => "pascal",
        }
    }

    /// Look up a category by key (case-insensitive, whitespace ignored)
    pub fn from_key(key: &str) -> Option<Category> {
        let key = key.trim();
        Category::ALL.into_iter().find(|c| c.key().eq_ignore_ascii_case(key))
    }

    /// All category keys in display order
    pub fn keys() -> Vec<&'static str> {
        Category::ALL.iter().map(|c| c.key()).collect()
    }

    /// Whether conversions need the affine (offset) path
    pub fn is_affine(&self) -> bool {
        matches!(self, Category::Temperature)
    }
}

impl FromStr for Category {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_key(s).ok_or_else(|| ConversionError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
