//! Static tool registry: name → handler, plus wire declarations.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::tool::Tool;
use super::types::{ToolArguments, ToolDefinition};
use crate::error::{CourierError, Result};

/// A fixed set of local tools the agent may call.
///
/// Registered once before agent creation and immutable afterwards. Dispatch
/// returns the tool's JSON result serialized to a string, which is the
/// platform's tool-output contract.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Builder-style registration.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Wire declarations for agent creation.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters().schema.clone(),
            })
            .collect()
    }

    /// Execute a tool by name and return its JSON output as a string.
    pub async fn dispatch(&self, name: &str, arguments: serde_json::Value) -> Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| CourierError::ToolExecution {
                tool_name: name.to_string(),
                message: "unknown tool".to_string(),
            })?;

        debug!(tool = name, "dispatching tool call");

        let result = tool
            .execute(&ToolArguments::new(arguments))
            .await
            .map_err(|e| CourierError::ToolExecution {
                tool_name: name.to_string(),
                message: e.to_string(),
            })?;

        Ok(serde_json::to_string(&result)?)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::tool::FunctionTool;
    use crate::tools::types::ToolParameters;

    fn sample_registry() -> ToolRegistry {
        ToolRegistry::new().with_tool(Arc::new(FunctionTool::new(
            "stamp",
            "Stamp a path",
            ToolParameters::object()
                .string("file_path", "The path of the file", true)
                .build(),
            |args| async move {
                let path = args.get_str("file_path")?.to_string();
                Ok(serde_json::json!({"stamped": path}))
            },
        )))
    }

    #[test]
    fn definitions_cover_all_tools() {
        let registry = sample_registry();
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "stamp");
        assert_eq!(defs[0].parameters["type"], "object");
    }

    #[tokio::test]
    async fn dispatch_returns_json_string() {
        let registry = sample_registry();
        let output = registry
            .dispatch("stamp", serde_json::json!({"file_path": "/tmp/y"}))
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["stamped"], "/tmp/y");
    }

    #[tokio::test]
    async fn unknown_tool_is_a_tool_execution_error() {
        let registry = sample_registry();
        let err = registry
            .dispatch("nope", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, CourierError::ToolExecution { .. }));
    }
}
