use async_trait::async_trait;

use crate::message::ToolArguments;
use crate::tools::{ToolError, ToolSpec};

/// A single tool the model can call.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use reactgraph::tools::{Tool, ToolError, ToolSpec};
/// use reactgraph::ToolArguments;
///
/// struct Clock;
///
/// #[async_trait]
/// impl Tool for Clock {
///     fn name(&self) -> &str {
///         "get_time"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec::new("get_time", "Current time", serde_json::json!({"type": "object"}))
///     }
///
///     async fn call(&self, _args: ToolArguments) -> Result<String, ToolError> {
///         Ok("12:00".to_string())
///     }
/// }
/// ```
///
/// # Interaction
///
/// - **ToolRegistry**: stores tools by `name()`
/// - **ToolExecutor**: validates arguments against `spec().input_schema`, then calls `call`
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; must equal `spec().name`.
    fn name(&self) -> &str;

    fn spec(&self) -> ToolSpec;

    /// Runs the tool with arguments that already passed schema validation.
    ///
    /// Return `ToolError::Execution` when the underlying action fails; the executor
    /// reports it to the model instead of aborting the run.
    async fn call(&self, args: ToolArguments) -> Result<String, ToolError>;
}
