use bt_core::blackboard::{value_as_f64, value_as_text};
use serde_json::Value;

use crate::model::NodeInstance;
use crate::registry::NodeDefinition;

/// Parameter reader for one node: instance data first, then the definition default.
#[derive(Clone, Copy)]
pub(crate) struct Params<'a> {
    node: &'a NodeInstance,
    def: &'static NodeDefinition,
}

impl<'a> Params<'a> {
    pub(crate) fn new(node: &'a NodeInstance, def: &'static NodeDefinition) -> Self {
        Self { node, def }
    }

    pub(crate) fn definition(&self) -> &'static NodeDefinition {
        self.def
    }

    fn default_value(&self, name: &str) -> Option<Value> {
        self.def.param(name).map(|p| p.default.to_value())
    }

    pub(crate) fn default_text(&self, name: &str) -> Option<String> {
        self.default_value(name).map(|v| value_as_text(&v))
    }

    pub(crate) fn raw(&self, name: &str) -> Option<Value> {
        self.node
            .data
            .get(name)
            .cloned()
            .or_else(|| self.default_value(name))
    }

    /// Numeric parameter; an unparsable configured value falls back to the default.
    pub(crate) fn number(&self, name: &str) -> f32 {
        self.node
            .data
            .get(name)
            .and_then(value_as_f64)
            .or_else(|| self.default_value(name).as_ref().and_then(value_as_f64))
            .unwrap_or(0.0) as f32
    }

    pub(crate) fn count(&self, name: &str) -> u32 {
        let n = self.number(name);
        if n.is_finite() && n > 0.0 {
            n.round() as u32
        } else {
            0
        }
    }

    pub(crate) fn text(&self, name: &str) -> String {
        self.raw(name)
            .map(|v| value_as_text(&v))
            .unwrap_or_default()
    }
}
