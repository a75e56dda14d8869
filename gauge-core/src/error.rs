//! Structured errors for tool consumers
//!
//! Errors never crash the system. They are values carried in
//! `Value::Error` and provide clear, actionable information.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const NON_FINITE: &str = "NON_FINITE";
    pub const UNKNOWN_CATEGORY: &str = "UNKNOWN_CATEGORY";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

/// Structured error for tool consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl GaugeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Parse error: {}", details.into()))
            .with_suggestion("Enter a decimal or scientific numeral, e.g. 12.5 or 1.5e10")
    }

    pub fn non_finite(details: impl Into<String>) -> Self {
        Self::new(codes::NON_FINITE, format!("Number is not finite: {}", details.into()))
    }

    pub fn unknown_category(name: &str, known: &[&str]) -> Self {
        Self::new(codes::UNKNOWN_CATEGORY, format!("Unknown category: {}", name))
            .with_suggestion(format!("Valid categories: {}", known.join(", ")))
    }

    pub fn unknown_unit(category: &str, unit: &str) -> Self {
        Self::new(codes::UNKNOWN_UNIT, format!("Unknown unit '{}' in category {}", unit, category))
            .with_suggestion(format!("Use list_units(\"{}\") to see valid units", category))
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
            .with_suggestion("Use help() to list available functions")
    }

    pub fn arg_count(func: &str, expected: usize, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
            .with_suggestion(format!("Use help('{}') for usage", func))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, format!("Domain error: {}", details.into()))
    }

    pub fn not_found(details: impl Into<String>) -> Self {
        Self::new(codes::NOT_FOUND, details.into())
    }
}

impl std::fmt::Display for GaugeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for GaugeError {}

impl From<NumberError> for GaugeError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::parse_error(s),
            NumberError::NonFinite(s) => Self::non_finite(s),
        }
    }
}
