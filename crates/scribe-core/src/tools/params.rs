//! Typed access to loosely-typed tool arguments

use serde_json::{Map, Value};

use crate::error::ToolError;

/// Argument bag for one tool invocation
///
/// Models are inconsistent about types, so numeric and boolean accessors
/// also accept their string spellings (`"3"`, `"true"`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolParams(Map<String, Value>);

impl ToolParams {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Decode the raw `arguments` field of a tool call.
    ///
    /// Accepts a JSON object, a string holding a JSON object, or nothing.
    pub fn from_arguments(raw: Value) -> Result<Self, ToolError> {
        match raw {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            Value::String(text) if text.trim().is_empty() => Ok(Self::default()),
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => Ok(Self(map)),
                Ok(other) => Err(ToolError::Decode(format!(
                    "expected a JSON object, got {}",
                    json_type(&other)
                ))),
                Err(e) => Err(ToolError::Decode(e.to_string())),
            },
            other => Err(ToolError::Decode(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_null())
    }

    pub fn require_str(&self, key: &str) -> Result<&str, ToolError> {
        self.opt_str(key)?
            .ok_or_else(|| ToolError::InvalidParams(format!("{} is required", key)))
    }

    pub fn opt_str(&self, key: &str) -> Result<Option<&str>, ToolError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(mistyped(key, "a string", other)),
        }
    }

    pub fn opt_bool(&self, key: &str) -> Result<Option<bool>, ToolError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(mistyped(key, "a boolean", &Value::String(s.clone()))),
            },
            Some(other) => Err(mistyped(key, "a boolean", other)),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ToolError> {
        Ok(self.opt_bool(key)?.unwrap_or(default))
    }

    pub fn opt_u64(&self, key: &str) -> Result<Option<u64>, ToolError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64))
                .map(Some)
                .ok_or_else(|| mistyped(key, "a non-negative integer", &Value::Number(n.clone()))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| mistyped(key, "a non-negative integer", &Value::String(s.clone()))),
            Some(other) => Err(mistyped(key, "a non-negative integer", other)),
        }
    }

    pub fn require_u64(&self, key: &str) -> Result<u64, ToolError> {
        self.opt_u64(key)?
            .ok_or_else(|| ToolError::InvalidParams(format!("{} is required", key)))
    }
}

impl From<Map<String, Value>> for ToolParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn mistyped(key: &str, expected: &str, got: &Value) -> ToolError {
    ToolError::InvalidParams(format!("{} must be {}, got {}", key, expected, json_type(got)))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
