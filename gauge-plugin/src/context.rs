//! Evaluation Context

use crate::PluginRegistry;
use std::sync::Arc;

/// Evaluation context passed to plugins
pub struct EvalContext {
    pub registry: Arc<PluginRegistry>,
    /// Category assumed by functions whose category argument is optional
    pub default_category: String,
}

impl EvalContext {
    pub fn new(registry: Arc<PluginRegistry>) -> Self {
        Self {
            registry,
            default_category: "length".to_string(),
        }
    }

    pub fn with_default_category(mut self, category: impl Into<String>) -> Self {
        self.default_category = category.into();
        self
    }
}
