//! Request dispatch and tool handlers

use gauge_core::Value;
use gauge_plugin::{EvalContext, PluginRegistry};
use gauge_units::{history_entry, standard_registry, try_convert, ConversionHistory, UNITS};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::protocol::{McpError, McpRequest, McpResponse};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "gauge";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server state: the function registry and the conversion history
pub struct Server {
    ctx: EvalContext,
    history: ConversionHistory,
}

impl Server {
    pub fn new(config: &ServerConfig) -> Self {
        let registry = Arc::new(standard_registry());
        Server {
            ctx: EvalContext::new(registry)
                .with_default_category(config.default_category.key()),
            history: ConversionHistory::new(config.history_limit),
        }
    }

    fn registry(&self) -> &PluginRegistry {
        &self.ctx.registry
    }

    pub fn handle_request(&mut self, request: &McpRequest) -> McpResponse {
        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => handle_initialize(&request.params),
            "initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => handle_tools_list(),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(McpError::method_not_found(&request.method)),
        };

        match result {
            Ok(r) => McpResponse::success(request.id.clone(), r),
            Err(e) => McpResponse::failure(request.id.clone(), e),
        }
    }

    fn handle_tool_call(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params.as_ref()
            .ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params.get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        debug!(tool = name, "tool call");

        match name {
            "convert" => self.tool_convert(&args),
            "list_categories" => self.tool_list_categories(),
            "list_units" => self.tool_list_units(&args),
            "history" => self.tool_history(&args),
            "help" => self.tool_help(&args),
            "list_functions" => self.tool_list_functions(&args),
            _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
        }
    }

    fn tool_convert(&mut self, args: &JsonValue) -> Result<JsonValue, McpError> {
        // Raw text is kept as typed; numbers go through their shortest display form
        let input = match args.get("value") {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Number(n)) => n.as_f64()
                .map(|f| f.to_string())
                .ok_or_else(|| McpError::invalid_params("value is not a finite number"))?,
            _ => return Err(McpError::invalid_params("Missing value argument")),
        };
        let from = required_str(args, "from_unit")?;
        let to = required_str(args, "to_unit")?;
        let category = args.get("category")
            .and_then(|v| v.as_str())
            .unwrap_or(self.ctx.default_category.as_str())
            .to_string();

        let call_args = [
            Value::Text(input.clone()),
            Value::Text(from.to_string()),
            Value::Text(to.to_string()),
            Value::Text(category.clone()),
        ];
        let result = self.registry().call_function("convert", &call_args, &self.ctx);
        if let Value::Error(e) = &result {
            return Err(McpError::invalid_params(e.to_string()));
        }
        let output = result.as_text().unwrap_or_default().to_string();

        if output.is_empty() {
            let reason = match try_convert(&input, from, to, &category) {
                Err(e) => e.to_string(),
                Ok(_) => "no result".to_string(),
            };
            return Ok(json!({
                "content": [{ "type": "text", "text": format!("No result: {}", reason) }],
                "result": "",
                "isError": true
            }));
        }

        let text = match self.record(&input, from, &output, to, &category) {
            Some(entry) => entry,
            None => output.clone(),
        };

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "result": output,
            "isError": false
        }))
    }

    /// Push a history entry for a successful conversion and return it
    fn record(&mut self, input: &str, from: &str, output: &str, to: &str, category: &str) -> Option<String> {
        let table = UNITS.by_key(category).ok()?;
        let entry = history_entry(input, table.find(from)?, output, table.find(to)?);
        self.history.push(entry.clone());
        debug!(entry = %entry, size = self.history.len(), "recorded conversion");
        Some(entry)
    }

    fn tool_list_categories(&self) -> Result<JsonValue, McpError> {
        let categories = self.registry().call_function("list_categories", &[], &self.ctx);
        let text = UNITS.categories().iter()
            .map(|c| format!("{} - {} (base: {})", c.category.key(), c.name, c.base_unit))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(json!({ "content": [{ "type": "text", "text": text }], "data": value_to_json(&categories) }))
    }

    fn tool_list_units(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let call_args: Vec<Value> = args.get("category")
            .and_then(|v| v.as_str())
            .map(|c| vec![Value::Text(c.to_string())])
            .unwrap_or_default();

        let units = self.registry().call_function("list_units", &call_args, &self.ctx);
        if let Value::Error(e) = &units {
            return Err(McpError::invalid_params(e.to_string())
                .with_data(json!({ "categories": gauge_units::Category::keys() })));
        }

        let text = units.as_list().unwrap_or_default().iter()
            .map(|u| format!("{} ({})", u.get("name"), u.get("symbol")))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(json!({ "content": [{ "type": "text", "text": text }], "data": value_to_json(&units) }))
    }

    fn tool_history(&mut self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let entries: Vec<String> = self.history.entries().map(str::to_string).collect();

        if args.get("clear").and_then(|v| v.as_bool()).unwrap_or(false) {
            info!(dropped = entries.len(), "history cleared");
            self.history.clear();
        }

        let text = if entries.is_empty() {
            "No conversions recorded".to_string()
        } else {
            entries.join("\n")
        };
        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "entries": entries,
            "limit": self.history.limit()
        }))
    }

    fn tool_help(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let name = args.get("name").and_then(|v| v.as_str());
        let help = self.registry().help(name);
        Ok(json!({ "content": [{ "type": "text", "text": format_help(&help) }], "data": value_to_json(&help) }))
    }

    fn tool_list_functions(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let category = args.get("category").and_then(|v| v.as_str());
        let functions = self.registry().list_functions(category);
        Ok(json!({ "content": [{ "type": "text", "text": "Functions listed" }], "data": value_to_json(&functions) }))
    }
}

fn required_str<'a>(args: &'a JsonValue, key: &str) -> Result<&'a str, McpError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", key)))
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Unit conversion across length, mass, temperature and seven other categories"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Use 'list_categories' and 'list_units' to find unit names, then 'convert'. An empty result means the value or a unit was not recognised."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert",
                "description": "Convert a value between two units of one category. Units may be given by name (\"Kilometer\") or symbol (\"km\").",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": {
                            "type": ["string", "number"],
                            "description": "Value to convert"
                        },
                        "from_unit": {
                            "type": "string",
                            "description": "Source unit"
                        },
                        "to_unit": {
                            "type": "string",
                            "description": "Target unit"
                        },
                        "category": {
                            "type": "string",
                            "description": "Category key: length, weight, temperature, volume, area, time, speed, data, energy, pressure"
                        }
                    },
                    "required": ["value", "from_unit", "to_unit"]
                }
            },
            {
                "name": "list_categories",
                "description": "List measurement categories with their base units",
                "inputSchema": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "list_units",
                "description": "List the units of a category with symbols and factors",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category key (defaults to the server's default category)"
                        }
                    }
                }
            },
            {
                "name": "history",
                "description": "Recent conversions, newest first",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "clear": {
                            "type": "boolean",
                            "description": "Clear the history after returning it"
                        }
                    }
                }
            },
            {
                "name": "help",
                "description": "Documentation for a function, or an overview when no name is given",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Function name"
                        }
                    }
                }
            },
            {
                "name": "list_functions",
                "description": "List available functions",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Filter by function category"
                        }
                    }
                }
            }
        ]
    }))
}

fn format_help(help: &Value) -> String {
    if let Some(e) = help.as_error() {
        return e.to_string();
    }
    match help.get("usage").as_text() {
        Some(usage) if help.get("name").as_text().is_some() => {
            format!("{}\n\n{}\n\nReturns: {}", usage, help.get("description"), help.get("returns"))
        }
        Some(usage) => usage.to_string(),
        None => help.to_string(),
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => serde_json::Number::from_f64(*n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::List(l) => JsonValue::Array(l.iter().map(value_to_json).collect()),
        Value::Object(o) => JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect()),
        Value::Error(e) => json!({"_error": {"code": e.code, "message": e.message}}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND};

    fn request(method: &str, params: JsonValue) -> McpRequest {
        serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        })).unwrap()
    }

    fn call(server: &mut Server, tool: &str, arguments: JsonValue) -> McpResponse {
        server.handle_request(&request("tools/call", json!({ "name": tool, "arguments": arguments })))
    }

    fn result(response: McpResponse) -> JsonValue {
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.unwrap()
    }

    fn server() -> Server {
        Server::new(&ServerConfig::default())
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let mut server = server();
        let r = result(server.handle_request(&request("initialize", json!({
            "protocolVersion": "2025-03-26",
            "clientInfo": { "name": "test" }
        }))));
        assert_eq!(r["protocolVersion"], "2025-03-26");
        assert_eq!(r["serverInfo"]["name"], "gauge");
    }

    #[test]
    fn test_unknown_method() {
        let mut server = server();
        let response = server.handle_request(&request("resources/list", json!({})));
        assert_eq!(response.error.map(|e| e.code), Some(METHOD_NOT_FOUND));
    }

    #[test]
    fn test_tools_list_names() {
        let mut server = server();
        let r = result(server.handle_request(&request("tools/list", json!({}))));
        let names: Vec<&str> = r["tools"].as_array().unwrap().iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(names, vec!["convert", "list_categories", "list_units", "history", "help", "list_functions"]);
    }

    #[test]
    fn test_convert_records_history() {
        let mut server = server();
        let r = result(call(&mut server, "convert", json!({
            "value": "1", "from_unit": "Kilometer", "to_unit": "Meter", "category": "length"
        })));
        assert_eq!(r["result"], "1000");
        assert_eq!(r["content"][0]["text"], "1 km = 1000 m");
        assert_eq!(r["isError"], false);

        let r = result(call(&mut server, "convert", json!({
            "value": 100, "from_unit": "Celsius", "to_unit": "Fahrenheit", "category": "temperature"
        })));
        assert_eq!(r["result"], "212");

        let r = result(call(&mut server, "history", json!({})));
        assert_eq!(r["entries"], json!(["100 °C = 212 °F", "1 km = 1000 m"]));
    }

    #[test]
    fn test_convert_uses_default_category() {
        let mut server = server();
        let r = result(call(&mut server, "convert", json!({
            "value": "3", "from_unit": "ft", "to_unit": "in"
        })));
        assert_eq!(r["result"], "36");
    }

    #[test]
    fn test_convert_failure_is_not_recorded() {
        let mut server = server();
        let r = result(call(&mut server, "convert", json!({
            "value": "abc", "from_unit": "Meter", "to_unit": "Foot", "category": "length"
        })));
        assert_eq!(r["result"], "");
        assert_eq!(r["isError"], true);

        let r = result(call(&mut server, "history", json!({})));
        assert_eq!(r["entries"], json!([]));
    }

    #[test]
    fn test_convert_missing_argument() {
        let mut server = server();
        let response = call(&mut server, "convert", json!({ "value": "1", "from_unit": "Meter" }));
        assert_eq!(response.error.map(|e| e.code), Some(INVALID_PARAMS));
    }

    #[test]
    fn test_history_limit_and_clear() {
        let config = ServerConfig { history_limit: 2, ..ServerConfig::default() };
        let mut server = Server::new(&config);
        for v in ["1", "2", "3"] {
            call(&mut server, "convert", json!({
                "value": v, "from_unit": "Byte", "to_unit": "Bit", "category": "data"
            }));
        }

        let r = result(call(&mut server, "history", json!({ "clear": true })));
        assert_eq!(r["entries"], json!(["3 B = 24 bit", "2 B = 16 bit"]));

        let r = result(call(&mut server, "history", json!({})));
        assert_eq!(r["entries"], json!([]));
    }

    #[test]
    fn test_list_units_unknown_category() {
        let mut server = server();
        let response = call(&mut server, "list_units", json!({ "category": "mass" }));
        let error = response.error.unwrap();
        assert_eq!(error.code, INVALID_PARAMS);
        assert!(error.data.is_some());
    }

    #[test]
    fn test_list_categories_data() {
        let mut server = server();
        let r = result(call(&mut server, "list_categories", json!({})));
        assert_eq!(r["data"].as_array().map(|a| a.len()), Some(10));
    }

    #[test]
    fn test_help_for_function() {
        let mut server = server();
        let r = result(call(&mut server, "help", json!({ "name": "convert" })));
        assert_eq!(r["data"]["name"], "convert");
        assert!(r["content"][0]["text"].as_str().unwrap().starts_with("convert(value"));
    }

    #[test]
    fn test_unknown_tool() {
        let mut server = server();
        let response = call(&mut server, "eval", json!({}));
        assert_eq!(response.error.map(|e| e.code), Some(INVALID_PARAMS));
    }

    #[test]
    fn test_value_to_json_numbers() {
        assert_eq!(value_to_json(&Value::Number(0.125)), json!(0.125));
        assert_eq!(value_to_json(&Value::Number(f64::NAN)), JsonValue::Null);
    }
}
