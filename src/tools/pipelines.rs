//! The two file-pipeline stubs exposed to the agent.
//!
//! Neither does any real processing; they exist so the agent can be steered
//! to pick between two tools and report which one fired. No size threshold
//! lives here — whether a file is "large" or "small" is the remote model's
//! judgement.

use std::sync::Arc;

use super::registry::ToolRegistry;
use super::tool::FunctionTool;
use super::types::ToolParameters;

fn path_parameter() -> ToolParameters {
    ToolParameters::object()
        .string("file_path", "The path of the file", true)
        .build()
}

/// Stub handler for files the agent judges large.
pub fn large_file_pipeline() -> FunctionTool {
    FunctionTool::new(
        "large_file_pipeline",
        "Process the file with the large file pipeline",
        path_parameter(),
        |_args| async move {
            Ok(serde_json::json!({
                "message": "The file is processed by the large file pipeline"
            }))
        },
    )
}

/// Stub handler for files the agent judges small.
pub fn small_file_pipeline() -> FunctionTool {
    FunctionTool::new(
        "small_file_pipeline",
        "Process the file with the small file pipeline",
        path_parameter(),
        |_args| async move {
            Ok(serde_json::json!({
                "message": "The file is processed by the small file pipeline"
            }))
        },
    )
}

/// Registry bundling both pipeline stubs.
pub fn pipeline_registry() -> ToolRegistry {
    ToolRegistry::new()
        .with_tool(Arc::new(large_file_pipeline()))
        .with_tool(Arc::new(small_file_pipeline()))
}
