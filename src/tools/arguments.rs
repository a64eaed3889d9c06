//! Binding model-supplied arguments to a tool's declared parameters.

use serde_json::Value;

use super::types::ToolSpec;
use super::validation::check_value;
use crate::error::{HeartloopError, Result};
use crate::types::ToolInput;

/// Arguments bound in declared parameter order.
///
/// The input mapping's own iteration order never matters: every slot is
/// filled by looking up the parameter's declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    tool: String,
    slots: Vec<(String, Option<Value>)>,
}

impl BoundArguments {
    /// Bind `input` against `spec`.
    ///
    /// A required parameter that is absent (or `null`) fails with
    /// `MissingRequiredArgument`; an absent optional becomes an empty slot.
    /// Keys not declared by the spec are ignored.
    pub fn bind(spec: &ToolSpec, input: &ToolInput) -> Result<Self> {
        let mut slots = Vec::with_capacity(spec.parameters.len());
        for parameter in &spec.parameters {
            let value = input.get(&parameter.name).filter(|v| !v.is_null());
            match value {
                Some(value) => {
                    check_value(parameter, value).map_err(|message| {
                        HeartloopError::InvalidArgument {
                            tool: spec.name.clone(),
                            argument: parameter.name.clone(),
                            message,
                        }
                    })?;
                    slots.push((parameter.name.clone(), Some(value.clone())));
                }
                None if spec.is_required(&parameter.name) => {
                    return Err(HeartloopError::MissingRequiredArgument {
                        tool: spec.name.clone(),
                        argument: parameter.name.clone(),
                    });
                }
                None => slots.push((parameter.name.clone(), None)),
            }
        }
        Ok(Self {
            tool: spec.name.clone(),
            slots,
        })
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Values in declared order; `None` for an omitted optional.
    pub fn positional(&self) -> impl Iterator<Item = Option<&Value>> {
        self.slots.iter().map(|(_, v)| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Value at a declared position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.slots.get(index).and_then(|(_, v)| v.as_ref())
    }

    /// Value of a declared parameter by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(name))
    }

    pub fn get_str_opt(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_f64(&self, name: &str) -> Result<f64> {
        self.get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| self.missing(name))
    }

    pub fn get_i64(&self, name: &str) -> Result<i64> {
        self.get(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| self.missing(name))
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        self.get(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| self.missing(name))
    }

    pub fn get_bool_opt(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Deserialize the bound (non-empty) slots into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        let object: serde_json::Map<String, Value> = self
            .slots
            .iter()
            .filter_map(|(n, v)| v.clone().map(|v| (n.clone(), v)))
            .collect();
        serde_json::from_value(Value::Object(object)).map_err(|e| HeartloopError::InvalidArgument {
            tool: self.tool.clone(),
            argument: "*".into(),
            message: e.to_string(),
        })
    }

    fn missing(&self, name: &str) -> HeartloopError {
        HeartloopError::MissingRequiredArgument {
            tool: self.tool.clone(),
            argument: name.to_string(),
        }
    }
}
