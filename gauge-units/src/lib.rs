//! Gauge Units - Table-driven unit conversion
//!
//! Converts a typed value between two units of the same category.
//! Every category carries one base unit; linear units hold a factor to
//! that base, temperature units hold a pair of formulas through Celsius.
//!
//! Categories:
//! - Length (km, m, mi, ft, ly, AU, ...)
//! - Weight/Mass (t, kg, lb, oz, st, ...)
//! - Temperature (°C, °F, K, °R)
//! - Volume (m³, L, gal, cup, tsp, ...)
//! - Area (km², ha, m², ac, ...)
//! - Time (yr, mo, wk, d, h, min, s, ...)
//! - Speed (m/s, km/h, mph, kn, c, Ma)
//! - Data (bit, B, KB, MB, ..., binary multiples)
//! - Energy (J, cal, kWh, eV, BTU, ...)
//! - Pressure (Pa, bar, atm, psi, mmHg, ...)

mod category;
mod unit;
mod table;
mod format;
mod convert;
mod session;
mod functions;

pub use category::Category;
pub use unit::{ConversionUnit, ConversionError, Scale};
pub use table::{UnitTable, ConversionCategory, UNITS};
pub use format::{format_result, SCIENTIFIC_ABOVE, SCIENTIFIC_BELOW};
pub use convert::{convert, try_convert, convert_value, convert_in};
pub use session::{
    ConverterSession, ConversionHistory, history_entry,
    DEFAULT_HISTORY_LIMIT, QUICK_REFERENCE_LEN,
};

use gauge_plugin::PluginRegistry;

/// Load unit functions into registry
pub fn load_units_library(registry: PluginRegistry) -> PluginRegistry {
    registry
        // Conversion
        .with_function(functions::Convert)

        // Inspection
        .with_function(functions::ListCategories)
        .with_function(functions::ListUnits)
        .with_function(functions::UnitInfo)
}

/// Registry with every Gauge function loaded
pub fn standard_registry() -> PluginRegistry {
    load_units_library(PluginRegistry::new())
}
