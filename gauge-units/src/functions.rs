//! Unit conversion functions for the plugin registry

use gauge_plugin::prelude::*;
use crate::{convert, ConversionCategory, ConversionUnit, UNITS};

fn extract_text<'a>(value: &'a Value, func: &str, arg: &str) -> Result<&'a str, GaugeError> {
    match value {
        Value::Text(s) => Ok(s),
        Value::Error(e) => Err(e.clone()),
        other => Err(GaugeError::arg_type(func, arg, "Text", other.type_name())),
    }
}

fn lookup_category(key: &str) -> Result<&'static ConversionCategory, GaugeError> {
    UNITS.by_key(key).map_err(GaugeError::from)
}

fn unit_fields(unit: &ConversionUnit) -> Vec<(&'static str, Value)> {
    let mut fields = vec![
        ("name", Value::Text(unit.name.to_string())),
        ("symbol", Value::Text(unit.symbol.to_string())),
        ("kind", Value::Text(unit.kind().to_string())),
    ];
    if let Some(factor) = unit.factor() {
        fields.push(("factor", Value::Number(factor)));
    }
    fields
}

fn unit_to_value(unit: &ConversionUnit) -> Value {
    Value::object(unit_fields(unit))
}

// ============ convert ============

pub struct Convert;

static CONVERT_ARGS: [ArgMeta; 4] = [
    ArgMeta::required("value", "Text|Number", "Value to convert, as typed"),
    ArgMeta::required("from_unit", "Text", "Source unit name or symbol (e.g., \"Kilometer\")"),
    ArgMeta::required("to_unit", "Text", "Target unit name or symbol (e.g., \"Meter\")"),
    ArgMeta::required("category", "Text", "Category key (e.g., \"length\")"),
];

static CONVERT_EXAMPLES: [&str; 3] = [
    "convert(\"1\", \"Kilometer\", \"Meter\", \"length\") → \"1000\"",
    "convert(\"100\", \"Celsius\", \"Fahrenheit\", \"temperature\") → \"212\"",
    "convert(\"abc\", \"Meter\", \"Foot\", \"length\") → \"\"",
];

static CONVERT_RELATED: [&str; 2] = ["list_units", "unit_info"];

impl FunctionPlugin for Convert {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "convert",
            description: "Convert a value between two units of a category; empty text when the input does not convert",
            usage: "convert(value, from_unit, to_unit, category)",
            args: &CONVERT_ARGS,
            returns: "Text",
            examples: &CONVERT_EXAMPLES,
            category: "units",
            related: &CONVERT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() < 4 {
            return Value::Error(GaugeError::arg_count("convert", 4, args.len()));
        }

        // Numbers are accepted too; they take the same path as typed text
        let value = match &args[0] {
            Value::Number(n) => n.to_string(),
            other => match extract_text(other, "convert", "value") {
                Ok(s) => s.to_string(),
                Err(e) => return Value::Error(e),
            },
        };

        let from = match extract_text(&args[1], "convert", "from_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        let to = match extract_text(&args[2], "convert", "to_unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        let category = match extract_text(&args[3], "convert", "category") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        Value::Text(convert(&value, from, to, category))
    }
}

// ============ list_categories ============

pub struct ListCategories;

static LIST_CATEGORIES_EXAMPLES: [&str; 1] = [
    "list_categories() → [{key: \"length\", name: \"Length\", base_unit: \"meter\", units: 12}, ...]",
];

static LIST_CATEGORIES_RELATED: [&str; 1] = ["list_units"];

impl FunctionPlugin for ListCategories {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_categories",
            description: "List the measurement categories with their base units",
            usage: "list_categories()",
            args: &[],
            returns: "List",
            examples: &LIST_CATEGORIES_EXAMPLES,
            category: "units",
            related: &LIST_CATEGORIES_RELATED,
        }
    }

    fn call(&self, _args: &[Value], _ctx: &EvalContext) -> Value {
        let categories = UNITS.categories().iter().map(|c| {
            Value::object([
                ("key", Value::Text(c.category.key().to_string())),
                ("name", Value::Text(c.name.to_string())),
                ("base_unit", Value::Text(c.base_unit.to_string())),
                ("units", Value::Number(c.units.len() as f64)),
            ])
        }).collect();
        Value::List(categories)
    }
}

// ============ list_units ============

pub struct ListUnits;

static LIST_UNITS_ARGS: [ArgMeta; 1] = [
    ArgMeta::optional("category", "Text", "Category key", "context default"),
];

static LIST_UNITS_EXAMPLES: [&str; 2] = [
    "list_units(\"data\") → [{name: \"Bit\", symbol: \"bit\", kind: \"linear\", factor: 0.125}, ...]",
    "list_units(\"temperature\") → [{name: \"Celsius\", symbol: \"°C\", kind: \"affine\"}, ...]",
];

static LIST_UNITS_RELATED: [&str; 2] = ["list_categories", "unit_info"];

impl FunctionPlugin for ListUnits {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "list_units",
            description: "List the units of a category in display order",
            usage: "list_units(category)",
            args: &LIST_UNITS_ARGS,
            returns: "List",
            examples: &LIST_UNITS_EXAMPLES,
            category: "units",
            related: &LIST_UNITS_RELATED,
        }
    }

    fn call(&self, args: &[Value], ctx: &EvalContext) -> Value {
        let key = match args.first() {
            None | Some(Value::Null) => ctx.default_category.as_str(),
            Some(v) => match extract_text(v, "list_units", "category") {
                Ok(s) => s,
                Err(e) => return Value::Error(e),
            },
        };

        match lookup_category(key) {
            Ok(table) => Value::List(table.units.iter().map(unit_to_value).collect()),
            Err(e) => Value::Error(e),
        }
    }
}

// ============ unit_info ============

pub struct UnitInfo;

static UNIT_INFO_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("category", "Text", "Category key"),
    ArgMeta::required("unit", "Text", "Unit name or symbol"),
];

static UNIT_INFO_EXAMPLES: [&str; 2] = [
    "unit_info(\"length\", \"km\") → {name: \"Kilometer\", factor: 1000, base_unit: \"meter\", ...}",
    "unit_info(\"temperature\", \"Kelvin\") → {name: \"Kelvin\", kind: \"affine\", ...}",
];

static UNIT_INFO_RELATED: [&str; 2] = ["list_units", "convert"];

impl FunctionPlugin for UnitInfo {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unit_info",
            description: "Describe one unit: symbol, scale kind, factor and base unit",
            usage: "unit_info(category, unit)",
            args: &UNIT_INFO_ARGS,
            returns: "Object",
            examples: &UNIT_INFO_EXAMPLES,
            category: "units",
            related: &UNIT_INFO_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() < 2 {
            return Value::Error(GaugeError::arg_count("unit_info", 2, args.len()));
        }

        let key = match extract_text(&args[0], "unit_info", "category") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        let unit_key = match extract_text(&args[1], "unit_info", "unit") {
            Ok(s) => s,
            Err(e) => return Value::Error(e),
        };

        let table = match lookup_category(key) {
            Ok(t) => t,
            Err(e) => return Value::Error(e),
        };

        let unit = match table.unit(unit_key) {
            Ok(u) => u,
            Err(e) => return Value::Error(e.into()),
        };

        let mut info = unit_fields(unit);
        info.push(("category", Value::Text(table.category.key().to_string())));
        info.push(("base_unit", Value::Text(table.base_unit.to_string())));
        info.push(("is_base", Value::Bool(unit.is_base())));
        Value::object(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn eval_ctx() -> EvalContext {
        EvalContext::new(Arc::new(PluginRegistry::new()))
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_convert_length() {
        let args = vec![text("1"), text("Kilometer"), text("Meter"), text("length")];
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_text(), Some("1000"));
    }

    #[test]
    fn test_convert_accepts_number() {
        let args = vec![Value::Number(100.0), text("Celsius"), text("Fahrenheit"), text("temperature")];
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_text(), Some("212"));
    }

    #[test]
    fn test_convert_invalid_input_is_empty_text() {
        let args = vec![text("abc"), text("Meter"), text("Foot"), text("length")];
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_text(), Some(""));
    }

    #[test]
    fn test_convert_arg_errors() {
        let result = Convert.call(&[text("1")], &eval_ctx());
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some("ARG_COUNT"));

        let args = vec![text("1"), Value::Bool(true), text("Meter"), text("length")];
        let result = Convert.call(&args, &eval_ctx());
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some("ARG_TYPE"));
    }

    #[test]
    fn test_list_categories() {
        let result = ListCategories.call(&[], &eval_ctx());
        let list = result.as_list().unwrap();
        assert_eq!(list.len(), 10);
        assert_eq!(list[0].get("key").as_text(), Some("length"));
        assert_eq!(list[1].get("name").as_text(), Some("Weight/Mass"));
        assert_eq!(list[0].get("units").as_number(), Some(12.0));
    }

    #[test]
    fn test_list_units() {
        let result = ListUnits.call(&[text("data")], &eval_ctx());
        let list = result.as_list().unwrap();
        assert_eq!(list.len(), 10);
        assert_eq!(list[0].get("name").as_text(), Some("Bit"));
        assert_eq!(list[0].get("factor").as_number(), Some(0.125));
    }

    #[test]
    fn test_list_units_temperature_has_no_factor() {
        let result = ListUnits.call(&[text("temperature")], &eval_ctx());
        let first = &result.as_list().unwrap()[0];
        assert_eq!(first.get("kind").as_text(), Some("affine"));
        assert!(first.get("factor").is_error());
    }

    #[test]
    fn test_list_units_uses_context_default() {
        let ctx = eval_ctx().with_default_category("pressure");
        let result = ListUnits.call(&[], &ctx);
        assert_eq!(result.as_list().unwrap()[0].get("name").as_text(), Some("Pascal"));
    }

    #[test]
    fn test_list_units_unknown_category() {
        let result = ListUnits.call(&[text("mass")], &eval_ctx());
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some("UNKNOWN_CATEGORY"));
    }

    #[test]
    fn test_unit_info() {
        let result = UnitInfo.call(&[text("length"), text("km")], &eval_ctx());
        assert_eq!(result.get("name").as_text(), Some("Kilometer"));
        assert_eq!(result.get("factor").as_number(), Some(1000.0));
        assert_eq!(result.get("base_unit").as_text(), Some("meter"));
        assert_eq!(result.get("is_base").as_bool(), Some(false));
    }

    #[test]
    fn test_unit_info_unknown_unit() {
        let result = UnitInfo.call(&[text("length"), text("Furlong")], &eval_ctx());
        assert_eq!(result.as_error().map(|e| e.code.as_str()), Some("UNKNOWN_UNIT"));
    }
}
