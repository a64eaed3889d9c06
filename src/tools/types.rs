//! Tool declarations: ordered parameter lists and their JSON Schema form.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// JSON Schema primitive type of a tool parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

/// One declared parameter. Declaration order is binding order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

/// Declared interface of a tool: what the model sees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    pub required: Vec<String>,
}

impl ToolSpec {
    /// Start a spec with no parameters.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            required: Vec::new(),
        }
    }

    /// Add a string parameter.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.parameter(name, ParameterType::String, description, None, required)
    }

    /// Add a number parameter.
    pub fn number(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.parameter(name, ParameterType::Number, description, None, required)
    }

    /// Add an integer parameter.
    pub fn integer(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.parameter(name, ParameterType::Integer, description, None, required)
    }

    /// Add a boolean parameter.
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.parameter(name, ParameterType::Boolean, description, None, required)
    }

    /// Add a string parameter restricted to `values`.
    pub fn string_enum(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        values: &[&str],
        required: bool,
    ) -> Self {
        let allowed = values.iter().map(|v| v.to_string()).collect();
        self.parameter(name, ParameterType::String, description, Some(allowed), required)
    }

    /// Add a parameter of any type.
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        kind: ParameterType,
        description: impl Into<String>,
        allowed: Option<Vec<String>>,
        required: bool,
    ) -> Self {
        let name = name.into();
        if required {
            self.required.push(name.clone());
        }
        self.parameters.push(ParameterSpec {
            name,
            kind,
            description: description.into(),
            allowed,
        });
        self
    }

    pub fn is_required(&self, parameter: &str) -> bool {
        self.required.iter().any(|r| r == parameter)
    }

    /// Position of a parameter in declaration order.
    pub fn position(&self, parameter: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == parameter)
    }

    /// JSON Schema object sent to the provider as the tool's input schema.
    pub fn input_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        for parameter in &self.parameters {
            let mut property = serde_json::json!({
                "type": parameter.kind.to_string(),
                "description": parameter.description,
            });
            if let Some(ref allowed) = parameter.allowed {
                property["enum"] = serde_json::json!(allowed);
            }
            properties.insert(parameter.name.clone(), property);
        }
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}
