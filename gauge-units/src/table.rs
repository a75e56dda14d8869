//! Unit definitions - ten categories, each relative to one base unit

use std::sync::LazyLock;
use crate::{Category, ConversionError, ConversionUnit};

/// Global unit table, built on first use and read-only afterwards
pub static UNITS: LazyLock<UnitTable> = LazyLock::new(UnitTable::new);

/// All units of one category, in display order
#[derive(Debug, Clone)]
pub struct ConversionCategory {
    pub category: Category,
    /// Display name (e.g., "Weight/Mass")
    pub name: &'static str,
    /// Reference unit name (e.g., "kilogram")
    pub base_unit: &'static str,
    pub units: Vec<ConversionUnit>,
}

impl ConversionCategory {
    fn new(category: Category, units: Vec<ConversionUnit>) -> Self {
        ConversionCategory {
            category,
            name: category.name(),
            base_unit: category.base_unit(),
            units,
        }
    }

    /// Find a unit by display name, falling back to its symbol
    pub fn find(&self, key: &str) -> Option<&ConversionUnit> {
        let key = key.trim();
        self.units.iter()
            .find(|u| u.name == key)
            .or_else(|| self.units.iter().find(|u| u.symbol == key))
    }

    /// Like `find`, with a typed error for unknown units
    pub fn unit(&self, key: &str) -> Result<&ConversionUnit, ConversionError> {
        self.find(key).ok_or_else(|| ConversionError::UnknownUnit {
            category: self.category,
            unit: key.to_string(),
        })
    }

    pub fn base(&self) -> Option<&ConversionUnit> {
        self.units.iter().find(|u| u.is_base())
    }
}

/// Registry of all categories and their units
pub struct UnitTable {
    categories: Vec<ConversionCategory>,
}

impl UnitTable {
    pub fn new() -> Self {
        let categories = Category::ALL.into_iter()
            .map(|category| ConversionCategory::new(category, units_for(category)))
            .collect();
        UnitTable { categories }
    }

    /// Get a category's units
    pub fn get(&self, category: Category) -> &ConversionCategory {
        // Built from Category::ALL, so every variant has an entry at its index.
        &self.categories[category as usize]
    }

    /// Get a category by key, e.g. "length"
    pub fn by_key(&self, key: &str) -> Result<&ConversionCategory, ConversionError> {
        let category: Category = key.parse()?;
        Ok(self.get(category))
    }

    /// Find a unit within a category by name or symbol
    pub fn find(&self, category: Category, key: &str) -> Option<&ConversionUnit> {
        self.get(category).find(key)
    }

    pub fn categories(&self) -> &[ConversionCategory] {
        &self.categories
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::new()
    }
}

fn units_for(category: Category) -> Vec<ConversionUnit> {
    match category {
        Category::Length => length_units(),
        Category::Weight => weight_units(),
        Category::Temperature => temperature_units(),
        Category::Volume => volume_units(),
        Category::Area => area_units(),
        Category::Time => time_units(),
        Category::Speed => speed_units(),
        Category::Data => data_units(),
        Category::Energy => energy_units(),
        Category::Pressure => pressure_units(),
    }
}

fn length_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::linear("Kilometer", "km", 1000.0),
        ConversionUnit::linear("Meter", "m", 1.0),
        ConversionUnit::linear("Centimeter", "cm", 0.01),
        ConversionUnit::linear("Millimeter", "mm", 0.001),
        ConversionUnit::linear("Micrometer", "μm", 0.000001),
        ConversionUnit::linear("Nanometer", "nm", 0.000000001),
        ConversionUnit::linear("Mile", "mi", 1609.344),
        ConversionUnit::linear("Yard", "yd", 0.9144),
        ConversionUnit::linear("Foot", "ft", 0.3048),
        ConversionUnit::linear("Inch", "in", 0.0254),
        ConversionUnit::linear("Light Year", "ly", 9.461e15),
        ConversionUnit::linear("Astronomical Unit", "AU", 1.496e11),
    ]
}

fn weight_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::linear("Metric Ton", "t", 1000.0),
        ConversionUnit::linear("Kilogram", "kg", 1.0),
        ConversionUnit::linear("Gram", "g", 0.001),
        ConversionUnit::linear("Milligram", "mg", 0.000001),
        ConversionUnit::linear("Microgram", "μg", 0.000000001),
        ConversionUnit::linear("Pound", "lb", 0.453592),
        ConversionUnit::linear("Ounce", "oz", 0.0283495),
        ConversionUnit::linear("Stone", "st", 6.35029),
        ConversionUnit::linear("US Ton", "ton (US)", 907.185),
        ConversionUnit::linear("Imperial Ton", "ton (UK)", 1016.05),
    ]
}

// Temperature scales, each expressed against Celsius

fn identity(c: f64) -> f64 {
    c
}

fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

fn kelvin_to_celsius(k: f64) -> f64 {
    k - 273.15
}

fn celsius_to_kelvin(c: f64) -> f64 {
    c + 273.15
}

fn rankine_to_celsius(r: f64) -> f64 {
    (r - 491.67) * 5.0 / 9.0
}

fn celsius_to_rankine(c: f64) -> f64 {
    (c + 273.15) * 9.0 / 5.0
}

fn temperature_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::affine("Celsius", "°C", identity, identity),
        ConversionUnit::affine("Fahrenheit", "°F", fahrenheit_to_celsius, celsius_to_fahrenheit),
        ConversionUnit::affine("Kelvin", "K", kelvin_to_celsius, celsius_to_kelvin),
        ConversionUnit::affine("Rankine", "°R", rankine_to_celsius, celsius_to_rankine),
    ]
}

fn volume_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::linear("Cubic Meter", "m³", 1000.0),
        ConversionUnit::linear("Liter", "L", 1.0),
        ConversionUnit::linear("Milliliter", "mL", 0.001),
        ConversionUnit::linear("Cubic Centimeter", "cm³", 0.001),
        ConversionUnit::linear("US Gallon", "gal (US)", 3.78541),
        ConversionUnit::linear("US Quart", "qt (US)", 0.946353),
        ConversionUnit::linear("US Pint", "pt (US)", 0.473176),
        ConversionUnit::linear("US Cup", "cup", 0.236588),
        ConversionUnit::linear("US Fluid Ounce", "fl oz", 0.0295735),
        ConversionUnit::linear("US Tablespoon", "tbsp", 0.0147868),
        ConversionUnit::linear("US Teaspoon", "tsp", 0.00492892),
        ConversionUnit::linear("Imperial Gallon", "gal (UK)", 4.54609),
        ConversionUnit::linear("Imperial Quart", "qt (UK)", 1.13652),
        ConversionUnit::linear("Imperial Pint", "pt (UK)", 0.568261),
    ]
}

fn area_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::linear("Square Kilometer", "km²", 1000000.0),
        ConversionUnit::linear("Hectare", "ha", 10000.0),
        ConversionUnit::linear("Square Meter", "m²", 1.0),
        ConversionUnit::linear("Square Centimeter", "cm²", 0.0001),
        ConversionUnit::linear("Square Millimeter", "mm²", 0.000001),
        ConversionUnit::linear("Square Mile", "mi²", 2589988.0),
        ConversionUnit::linear("Acre", "ac", 4046.86),
        ConversionUnit::linear("Square Yard", "yd²", 0.836127),
        ConversionUnit::linear("Square Foot", "ft²", 0.092903),
        ConversionUnit::linear("Square Inch", "in²", 0.00064516),
    ]
}

fn time_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::linear("Year", "yr", 31536000.0), // 365 days
        ConversionUnit::linear("Month", "mo", 2628000.0), // year / 12
        ConversionUnit::linear("Week", "wk", 604800.0),
        ConversionUnit::linear("Day", "d", 86400.0),
        ConversionUnit::linear("Hour", "h", 3600.0),
        ConversionUnit::linear("Minute", "min", 60.0),
        ConversionUnit::linear("Second", "s", 1.0),
        ConversionUnit::linear("Millisecond", "ms", 0.001),
        ConversionUnit::linear("Microsecond", "μs", 0.000001),
        ConversionUnit::linear("Nanosecond", "ns", 0.000000001),
    ]
}

fn speed_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::linear("Meter per second", "m/s", 1.0),
        ConversionUnit::linear("Kilometer per hour", "km/h", 0.277778),
        ConversionUnit::linear("Mile per hour", "mph", 0.44704),
        ConversionUnit::linear("Foot per second", "ft/s", 0.3048),
        ConversionUnit::linear("Knot", "kn", 0.514444),
        ConversionUnit::linear("Speed of light", "c", 299792458.0),
        ConversionUnit::linear("Mach", "Ma", 340.29),
    ]
}

fn data_units() -> Vec<ConversionUnit> {
    // Binary multiples (1 KB = 1024 B)
    vec![
        ConversionUnit::linear("Bit", "bit", 0.125),
        ConversionUnit::linear("Byte", "B", 1.0),
        ConversionUnit::linear("Kilobyte", "KB", 1024.0),
        ConversionUnit::linear("Megabyte", "MB", 1048576.0),
        ConversionUnit::linear("Gigabyte", "GB", 1073741824.0),
        ConversionUnit::linear("Terabyte", "TB", 1099511627776.0),
        ConversionUnit::linear("Petabyte", "PB", 1125899906842624.0),
        ConversionUnit::linear("Kilobit", "Kbit", 128.0),
        ConversionUnit::linear("Megabit", "Mbit", 131072.0),
        ConversionUnit::linear("Gigabit", "Gbit", 134217728.0),
    ]
}

fn energy_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::linear("Joule", "J", 1.0),
        ConversionUnit::linear("Kilojoule", "kJ", 1000.0),
        ConversionUnit::linear("Calorie", "cal", 4.184),
        ConversionUnit::linear("Kilocalorie", "kcal", 4184.0),
        ConversionUnit::linear("Watt-hour", "Wh", 3600.0),
        ConversionUnit::linear("Kilowatt-hour", "kWh", 3600000.0),
        ConversionUnit::linear("Electronvolt", "eV", 1.60218e-19),
        ConversionUnit::linear("British thermal unit", "BTU", 1055.06),
        ConversionUnit::linear("Foot-pound", "ft⋅lb", 1.35582),
    ]
}

fn pressure_units() -> Vec<ConversionUnit> {
    vec![
        ConversionUnit::linear("Pascal", "Pa", 1.0),
        ConversionUnit::linear("Kilopascal", "kPa", 1000.0),
        ConversionUnit::linear("Bar", "bar", 100000.0),
        ConversionUnit::linear("Millibar", "mbar", 100.0),
        ConversionUnit::linear("Atmosphere", "atm", 101325.0),
        ConversionUnit::linear("Torr", "Torr", 133.322),
        ConversionUnit::linear("Pounds per square inch", "psi", 6894.76),
        ConversionUnit::linear("Millimeter of mercury", "mmHg", 133.322),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_category_present_in_order() {
        let table = UnitTable::new();
        let order: Vec<Category> = table.categories().iter().map(|c| c.category).collect();
        assert_eq!(order, Category::ALL.to_vec());
        for category in Category::ALL {
            assert_eq!(table.get(category).category, category);
        }
    }

    #[test]
    fn test_unit_names_unique_and_non_empty() {
        for cat in UNITS.categories() {
            assert!(!cat.units.is_empty(), "{} has no units", cat.name);
            let names: HashSet<_> = cat.units.iter().map(|u| u.name).collect();
            assert_eq!(names.len(), cat.units.len(), "duplicate names in {}", cat.name);
        }
    }

    #[test]
    fn test_exactly_one_base_unit() {
        for cat in UNITS.categories() {
            let bases = cat.units.iter().filter(|u| u.is_base()).count();
            assert_eq!(bases, 1, "{} should have exactly one base unit", cat.name);
        }
    }

    #[test]
    fn test_linear_factors_positive() {
        for cat in UNITS.categories() {
            for unit in &cat.units {
                match unit.factor() {
                    Some(f) => assert!(f > 0.0 && f.is_finite(), "{} has factor {}", unit.name, f),
                    None => assert!(cat.category.is_affine(), "{} is affine outside temperature", unit.name),
                }
            }
        }
    }

    #[test]
    fn test_temperature_units_are_affine() {
        let temp = UNITS.get(Category::Temperature);
        assert_eq!(temp.units.len(), 4);
        assert!(temp.units.iter().all(|u| u.is_affine()));
        assert_eq!(temp.base().map(|u| u.name), Some("Celsius"));
    }

    #[test]
    fn test_find_by_name_then_symbol() {
        let length = UNITS.get(Category::Length);
        assert_eq!(length.find("Kilometer").map(|u| u.symbol), Some("km"));
        assert_eq!(length.find("ft").map(|u| u.name), Some("Foot"));
        assert!(length.find("Furlong").is_none());

        // Torr's name and symbol coincide
        let pressure = UNITS.get(Category::Pressure);
        assert_eq!(pressure.find("Torr").map(|u| u.name), Some("Torr"));
    }

    #[test]
    fn test_unit_error() {
        let err = UNITS.get(Category::Data).unit("Nibble").unwrap_err();
        assert_eq!(err, ConversionError::UnknownUnit {
            category: Category::Data,
            unit: "Nibble".to_string(),
        });
    }

    #[test]
    fn test_by_key() {
        assert_eq!(UNITS.by_key("speed").map(|c| c.base_unit).ok(), Some("meter per second"));
        assert!(UNITS.by_key("luminosity").is_err());
    }
}
