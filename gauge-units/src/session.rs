//! Converter session - the state behind an interactive converter
//!
//! A session tracks the selected category, the two selected units, the raw
//! input text and a short history of recorded conversions. It owns no global
//! state; each caller keeps its own session.

use std::collections::VecDeque;
use tracing::debug;
use crate::{convert, Category, ConversionError, ConversionUnit, UNITS};

/// Default number of history entries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Number of units shown in a quick reference
pub const QUICK_REFERENCE_LEN: usize = 8;

const DEFAULT_INPUT: &str = "1";

// Initial pair of a fresh default session; later resets use the first two units
const DEFAULT_FROM_UNIT: &str = "Meter";
const DEFAULT_TO_UNIT: &str = "Foot";

/// Bounded list of conversion records, newest first
#[derive(Debug, Clone)]
pub struct ConversionHistory {
    entries: VecDeque<String>,
    limit: usize,
}

impl ConversionHistory {
    pub fn new(limit: usize) -> Self {
        ConversionHistory {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Add an entry at the front, dropping the oldest past the limit
    pub fn push(&mut self, entry: impl Into<String>) {
        if self.limit == 0 {
            return;
        }
        self.entries.push_front(entry.into());
        self.entries.truncate(self.limit);
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ConversionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

/// Format a history record: "1 km = 1000 m"
pub fn history_entry(input: &str, from: &ConversionUnit, output: &str, to: &ConversionUnit) -> String {
    format!("{} {} = {} {}", input, from.symbol, output, to.symbol)
}

/// Interactive converter state
#[derive(Debug, Clone)]
pub struct ConverterSession {
    category: Category,
    from_unit: &'static str,
    to_unit: &'static str,
    input: String,
    history: ConversionHistory,
}

impl ConverterSession {
    /// Start on `category` with its first two units and input "1"
    pub fn new(category: Category) -> Self {
        Self::with_history(category, ConversionHistory::default())
    }

    pub fn with_history(category: Category, history: ConversionHistory) -> Self {
        let (from_unit, to_unit) = default_units(category);
        ConverterSession {
            category,
            from_unit,
            to_unit,
            input: DEFAULT_INPUT.to_string(),
            history,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn from_unit(&self) -> &'static str {
        self.from_unit
    }

    pub fn to_unit(&self) -> &'static str {
        self.to_unit
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn history(&self) -> &ConversionHistory {
        &self.history
    }

    /// Switch category; units and input return to their defaults
    pub fn select_category(&mut self, category: Category) {
        debug!(from = %self.category, to = %category, "category selected");
        self.category = category;
        self.reset();
    }

    /// Select the source unit by name or symbol
    pub fn set_from_unit(&mut self, unit: &str) -> Result<(), ConversionError> {
        self.from_unit = UNITS.get(self.category).unit(unit)?.name;
        Ok(())
    }

    /// Select the target unit by name or symbol
    pub fn set_to_unit(&mut self, unit: &str) -> Result<(), ConversionError> {
        self.to_unit = UNITS.get(self.category).unit(unit)?.name;
        Ok(())
    }

    /// Replace the input text; partial input is allowed
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Current result for the input, or empty if the input does not convert
    pub fn output(&self) -> String {
        convert(&self.input, self.from_unit, self.to_unit, self.category.key())
    }

    /// Exchange the units; the previous output becomes the new input
    pub fn swap(&mut self) {
        let output = self.output();
        std::mem::swap(&mut self.from_unit, &mut self.to_unit);
        self.input = output;
    }

    /// First two units of the category and input "1"; history is kept
    pub fn reset(&mut self) {
        let (from_unit, to_unit) = default_units(self.category);
        self.from_unit = from_unit;
        self.to_unit = to_unit;
        self.input = DEFAULT_INPUT.to_string();
    }

    /// Record the current conversion; returns false when there is nothing to record
    pub fn record(&mut self) -> bool {
        let output = self.output();
        if self.input.is_empty() || output.is_empty() {
            return false;
        }

        let table = UNITS.get(self.category);
        let (Some(from), Some(to)) = (table.find(self.from_unit), table.find(self.to_unit)) else {
            return false;
        };

        self.history.push(history_entry(&self.input, from, &output, to));
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The leading units of the category as (name, symbol)
    pub fn quick_reference(&self) -> Vec<(&'static str, &'static str)> {
        UNITS.get(self.category).units.iter()
            .take(QUICK_REFERENCE_LEN)
            .map(|u| (u.name, u.symbol))
            .collect()
    }
}

impl Default for ConverterSession {
    /// Length, Meter to Foot
    fn default() -> Self {
        let mut session = Self::new(Category::Length);
        session.from_unit = DEFAULT_FROM_UNIT;
        session.to_unit = DEFAULT_TO_UNIT;
        session
    }
}

fn default_units(category: Category) -> (&'static str, &'static str) {
    let units = &UNITS.get(category).units;
    let first = units.first().map_or("", |u| u.name);
    let second = units.get(1).map_or(first, |u| u.name);
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = ConverterSession::new(Category::Length);
        assert_eq!(session.from_unit(), "Kilometer");
        assert_eq!(session.to_unit(), "Meter");
        assert_eq!(session.input(), "1");
        assert_eq!(session.output(), "1000");
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_default_session_starts_meter_to_foot() {
        let session = ConverterSession::default();
        assert_eq!(session.category(), Category::Length);
        assert_eq!(session.from_unit(), "Meter");
        assert_eq!(session.to_unit(), "Foot");
        assert_eq!(session.output(), "3.2808399");
    }

    #[test]
    fn test_select_category_resets_units_and_input() {
        let mut session = ConverterSession::default();
        session.set_input("250");
        session.select_category(Category::Temperature);
        assert_eq!(session.category(), Category::Temperature);
        assert_eq!(session.from_unit(), "Celsius");
        assert_eq!(session.to_unit(), "Fahrenheit");
        assert_eq!(session.input(), "1");
        assert_eq!(session.output(), "33.8");
    }

    #[test]
    fn test_set_units_by_name_or_symbol() {
        let mut session = ConverterSession::default();
        session.set_from_unit("Meter").unwrap();
        session.set_to_unit("ft").unwrap();
        assert_eq!(session.to_unit(), "Foot");
        assert_eq!(session.output(), "3.2808399");
    }

    #[test]
    fn test_unknown_unit_is_rejected_and_state_kept() {
        let mut session = ConverterSession::default();
        assert!(session.set_from_unit("Kelvin").is_err());
        assert_eq!(session.from_unit(), "Meter");
    }

    #[test]
    fn test_swap_uses_previous_output() {
        let mut session = ConverterSession::new(Category::Length);
        session.set_input("2");
        session.swap();
        assert_eq!(session.from_unit(), "Meter");
        assert_eq!(session.to_unit(), "Kilometer");
        assert_eq!(session.input(), "2000");
        assert_eq!(session.output(), "2");
    }

    #[test]
    fn test_swap_with_invalid_input_clears_input() {
        let mut session = ConverterSession::default();
        session.set_input("abc");
        session.swap();
        assert_eq!(session.input(), "");
        assert_eq!(session.output(), "");
    }

    #[test]
    fn test_reset_keeps_history() {
        let mut session = ConverterSession::default();
        session.set_to_unit("Mile").unwrap();
        session.set_input("5");
        assert!(session.record());
        session.reset();
        assert_eq!(session.from_unit(), "Kilometer");
        assert_eq!(session.to_unit(), "Meter");
        assert_eq!(session.input(), "1");
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_record_formats_entry() {
        let mut session = ConverterSession::new(Category::Data);
        session.set_from_unit("Byte").unwrap();
        session.set_to_unit("Bit").unwrap();
        assert!(session.record());
        let entries: Vec<&str> = session.history().entries().collect();
        assert_eq!(entries, vec!["1 B = 8 bit"]);
    }

    #[test]
    fn test_record_skips_empty_output() {
        let mut session = ConverterSession::default();
        session.set_input("");
        assert!(!session.record());
        session.set_input("x");
        assert!(!session.record());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_history_is_bounded_newest_first() {
        let mut history = ConversionHistory::new(3);
        for i in 0..5 {
            history.push(format!("entry {}", i));
        }
        let entries: Vec<&str> = history.entries().collect();
        assert_eq!(entries, vec!["entry 4", "entry 3", "entry 2"]);
        assert_eq!(history.limit(), 3);

        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_limit_history_keeps_nothing() {
        let mut history = ConversionHistory::new(0);
        history.push("ignored");
        assert!(history.is_empty());
    }

    #[test]
    fn test_session_history_default_limit() {
        let mut session = ConverterSession::new(Category::Length);
        for i in 1..=12 {
            session.set_input(i.to_string());
            session.record();
        }
        assert_eq!(session.history().len(), DEFAULT_HISTORY_LIMIT);
        assert_eq!(session.history().entries().next(), Some("12 km = 12000 m"));

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_quick_reference() {
        let session = ConverterSession::new(Category::Volume);
        let reference = session.quick_reference();
        assert_eq!(reference.len(), QUICK_REFERENCE_LEN);
        assert_eq!(reference[0], ("Cubic Meter", "m³"));

        let session = ConverterSession::new(Category::Temperature);
        assert_eq!(session.quick_reference().len(), 4);
    }
}
