//! Tool definitions, registry, argument validation, and execution.
//!
//! A [`Tool`] has a unique name, a [`ToolSpec`] (description plus JSON Schema for its
//! arguments), and an async `call`. Tools live in a [`ToolRegistry`]; the
//! [`ToolExecutor`] resolves each model tool call against it, validates the arguments
//! with [`validate_arguments`], runs the tool, and returns a tool message for every call.
//! Failures become message content so the model can recover on its next turn.

mod executor;
mod fn_tool;
mod registry;
mod r#trait;
mod validation;

pub use executor::{ToolExecutor, DEFAULT_TOOL_ERROR_TEMPLATE};
pub use fn_tool::FnTool;
pub use r#trait::Tool;
pub use registry::ToolRegistry;
pub use validation::validate_arguments;

use serde_json::Value;
use thiserror::Error;

/// Tool definition sent to the model: name, description, argument schema.
///
/// **Interaction**: Returned by `Tool::spec()` and `ToolRegistry::list()`; passed to
/// `LlmClient::invoke` by `AgentNode`; `input_schema` is checked by `validate_arguments`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    /// Human-readable description for the model.
    pub description: Option<String>,
    /// JSON Schema for the arguments object.
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            input_schema,
        }
    }
}

/// Errors from resolving, validating, or running a tool.
///
/// Never escapes `ToolExecutor`; each variant is rendered into a tool message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("tool execution failed: {0}")]
    Execution(String),
}
