//! Local tool system: trait, schemas, registry, and the pipeline stubs.

pub mod pipelines;
pub mod registry;
pub mod tool;
pub mod types;

pub use registry::ToolRegistry;
pub use tool::{FunctionTool, Tool};
pub use types::{ToolArguments, ToolDefinition, ToolParameters};
