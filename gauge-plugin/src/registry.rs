//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use gauge_core::{GaugeError, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Central plugin registry
pub struct PluginRegistry {
    functions: HashMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    /// Sorted function names
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => f.call(args, ctx),
            None => {
                // Find similar function names for better error message
                let similar = self.find_similar_functions(name);
                let mut err = GaugeError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                (score > 0).then(|| (func_name.clone(), score))
            })
            .collect();

        // Higher score first, then alphabetical for stable output
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        score += common * 2;

        // Penalize length difference
        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.functions.get(&name.to_lowercase()) {
            Some(f) => Self::function_to_help(f.meta()),
            None => Value::Error(GaugeError::not_found(format!("No function named '{}'", name))),
        }
    }

    fn general_help(&self) -> Value {
        let mut funcs_by_cat: HashMap<String, Vec<String>> = HashMap::new();
        for name in self.function_names() {
            if let Some(f) = self.functions.get(name) {
                funcs_by_cat.entry(f.meta().category.to_string()).or_default().push(name.to_string());
            }
        }

        Value::object([
            ("functions", Value::Object(funcs_by_cat.into_iter()
                .map(|(k, v)| (k, Value::List(v.into_iter().map(Value::Text).collect())))
                .collect())),
            ("usage", Value::Text("Call help('function_name') for detailed help.".to_string())),
        ])
    }

    fn function_to_help(meta: FunctionMeta) -> Value {
        let args = meta.args.iter().map(|a| {
            let mut fields = vec![
                ("name", Value::Text(a.name.to_string())),
                ("type", Value::Text(a.typ.to_string())),
                ("description", Value::Text(a.description.to_string())),
                ("optional", Value::Bool(a.optional)),
            ];
            if let Some(default) = a.default {
                fields.push(("default", Value::Text(default.to_string())));
            }
            Value::object(fields)
        }).collect();

        Value::object([
            ("name", Value::Text(meta.name.to_string())),
            ("type", Value::Text("function".to_string())),
            ("description", Value::Text(meta.description.to_string())),
            ("usage", Value::Text(meta.usage.to_string())),
            ("returns", Value::Text(meta.returns.to_string())),
            ("category", Value::Text(meta.category.to_string())),
            ("args", Value::List(args)),
            ("examples", Value::List(meta.examples.iter().map(|e| Value::Text(e.to_string())).collect())),
            ("related", Value::List(meta.related.iter().map(|r| Value::Text(r.to_string())).collect())),
        ])
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        let funcs: Vec<Value> = self.function_names().into_iter()
            .filter_map(|name| self.functions.get(name))
            .map(|f| f.meta())
            .filter(|meta| category.map_or(true, |c| meta.category == c))
            .map(|meta| {
                Value::object([
                    ("name", Value::Text(meta.name.to_string())),
                    ("description", Value::Text(meta.description.to_string())),
                    ("usage", Value::Text(meta.usage.to_string())),
                    ("category", Value::Text(meta.category.to_string())),
                ])
            })
            .collect();
        Value::List(funcs)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
