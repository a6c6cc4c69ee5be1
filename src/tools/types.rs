//! Tool-related types: parameter schemas, arguments, wire declarations.

use serde::{Deserialize, Serialize};

use crate::error::{CourierError, Result};

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    /// JSON Schema object describing the parameters.
    pub schema: serde_json::Value,
}

impl ToolParameters {
    /// Create from a raw JSON Schema value.
    pub fn from_schema(schema: serde_json::Value) -> Self {
        Self { schema }
    }

    /// Create an empty parameter schema (no parameters).
    pub fn empty() -> Self {
        Self {
            schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": [],
            }),
        }
    }

    /// Builder: create an object schema with properties.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }
}

/// Builder for constructing tool parameter schemas.
pub struct ParameterBuilder {
    properties: serde_json::Map<String, serde_json::Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    /// Add a string property.
    pub fn string(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            serde_json::json!({
                "type": "string",
                "description": description.into(),
            }),
        );
        if required {
            self.required.push(name);
        }
        self
    }

    /// Build into ToolParameters.
    pub fn build(self) -> ToolParameters {
        ToolParameters {
            schema: serde_json::json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}

/// Parsed arguments passed to a tool invocation.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Get a required string argument.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        self.value
            .get(name)
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                CourierError::ToolExecution {
                    tool_name: String::new(),
                    message: format!("missing string argument '{name}'"),
                }
            })
    }

    /// Raw JSON view of the arguments.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }
}

/// Tool declaration sent to the platform when creating an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_builder_constructs_schema() {
        let params = ToolParameters::object()
            .string("file_path", "The path of the file", true)
            .string("note", "Optional note", false)
            .build();

        let schema = &params.schema;
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["file_path"]["type"], "string");
        assert_eq!(schema["required"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn empty_parameters() {
        let params = ToolParameters::empty();
        assert_eq!(params.schema["type"], "object");
    }

    #[test]
    fn tool_arguments_get_str() {
        let args = ToolArguments::new(serde_json::json!({"file_path": "/tmp/a.bin"}));
        assert_eq!(args.get_str("file_path").unwrap(), "/tmp/a.bin");
        assert!(args.get_str("missing").is_err());
    }
}
