//! Gauge Core - Fundamental types
//!
//! This crate provides the core types used throughout Gauge:
//! - `Value`: Runtime values (numbers, text, objects, errors)
//! - `GaugeError`: Structured errors for tool consumers
//! - `parse_numeral`: leading-numeral parsing of user-typed input

mod number;
mod value;
mod error;

pub use number::{parse_numeral, NumberError};
pub use value::Value;
pub use error::{GaugeError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Value, GaugeError, parse_numeral};
    pub use crate::error::codes;
}
