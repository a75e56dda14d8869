//! Server configuration from environment variables

use std::env;
use gauge_units::{Category, DEFAULT_HISTORY_LIMIT};

const DEFAULT_LOG_FILTER: &str = "info";

/// Settings read once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// tracing-subscriber filter directive
    pub log_filter: String,
    /// Capacity of the server-wide conversion history
    pub history_limit: usize,
    /// Category used by list_units when none is given
    pub default_category: Category,
    /// Problems found while reading the environment, logged once logging is up
    pub warnings: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or invalid values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let log_filter = lookup("GAUGE_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let history_limit = match lookup("GAUGE_HISTORY_LIMIT") {
            None => DEFAULT_HISTORY_LIMIT,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warnings.push(format!(
                        "GAUGE_HISTORY_LIMIT={:?} is not a positive integer, using {}",
                        raw, DEFAULT_HISTORY_LIMIT
                    ));
                    DEFAULT_HISTORY_LIMIT
                }
            },
        };

        let default_category = match lookup("GAUGE_DEFAULT_CATEGORY") {
            None => Category::Length,
            Some(raw) => Category::from_key(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "GAUGE_DEFAULT_CATEGORY={:?} is not a known category, using length",
                    raw
                ));
                Category::Length
            }),
        };

        ServerConfig {
            log_filter,
            history_limit,
            default_category,
            warnings,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
