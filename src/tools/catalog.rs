//! Tool declarations sent to providers that support tool calling.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Primitive type tag for a tool parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
}

/// A single named parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolParameter {
    pub name: String,
    pub kind: ParamType,
}

/// Name, description and parameter schema of one tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Builder: add a parameter.
    pub fn param(mut self, name: impl Into<String>, kind: ParamType) -> Self {
        self.parameters.push(ToolParameter {
            name: name.into(),
            kind,
        });
        self
    }

    /// JSON Schema object for the parameters. Every parameter is required.
    pub fn json_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), serde_json::json!({ "type": p.kind.to_string() })))
            .collect();
        let required: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Names of the built-in tools.
pub const SEARCH_TOOL: &str = "search";
pub const EXECUTE_JS_TOOL: &str = "execute_js";
pub const VISUALIZE_TOOL: &str = "visualize";

/// Immutable set of tool definitions with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
}

impl ToolCatalog {
    /// Build a catalog. Later duplicates of a name are dropped.
    pub fn new(tools: impl IntoIterator<Item = ToolDefinition>) -> Self {
        let mut unique: Vec<ToolDefinition> = Vec::new();
        for tool in tools {
            if unique.iter().all(|t| t.name != tool.name) {
                unique.push(tool);
            }
        }
        Self { tools: unique }
    }

    /// `search`, `execute_js` and `visualize`.
    pub fn builtin() -> Self {
        Self::new([
            ToolDefinition::new(SEARCH_TOOL, "Search the web for info").param("query", ParamType::String),
            ToolDefinition::new(EXECUTE_JS_TOOL, "Execute JS code").param("code", ParamType::String),
            ToolDefinition::new(VISUALIZE_TOOL, "Make a chart").param("data", ParamType::String),
        ])
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
