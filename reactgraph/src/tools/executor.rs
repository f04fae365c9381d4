//! Tools node logic: resolve, validate, and run each tool call.
//!
//! Every call yields exactly one tool message linked by `tool_call_id`. Unknown tools,
//! undecodable or mismatched arguments, and capability failures are rendered into that message with
//! [`DEFAULT_TOOL_ERROR_TEMPLATE`] instead of failing the run.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::error::ValidationError;
use crate::message::{Message, ToolCallRequest};
use crate::tools::{validate_arguments, ToolError, ToolRegistry};

/// Content template for a failed tool call; `{error}` is replaced by the error text.
pub const DEFAULT_TOOL_ERROR_TEMPLATE: &str = "Error: {error}\n Please fix your mistakes.";

fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Executes tool calls against a registry.
///
/// **Interaction**: Owned by `GraphEngine`; the `tools` step calls [`execute_all`](Self::execute_all)
/// with the last assistant message's calls and reduces the returned messages as one batch.
#[derive(Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn from_shared(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Runs one call. Tool failures become the message content.
    ///
    /// Fails only when the call has an empty id, since no tool message could link to it.
    pub async fn execute(&self, call: &ToolCallRequest) -> Result<Message, ValidationError> {
        if call.id.is_empty() {
            return Err(ValidationError::MissingToolCallId);
        }
        debug!(tool = %call.name, call_id = %call.id, "tool call start");
        match self.try_execute(call).await {
            Ok(output) => {
                trace!(tool = %call.name, output = %truncate_for_log(&output, 200), "tool call done");
                Message::tool(&call.id, output)
            }
            Err(e) => {
                warn!(tool = %call.name, call_id = %call.id, error = %e, "tool call failed, reporting to model");
                Message::tool(
                    &call.id,
                    DEFAULT_TOOL_ERROR_TEMPLATE.replace("{error}", &e.to_string()),
                )
            }
        }
    }

    /// Runs calls sequentially; results are in call order.
    pub async fn execute_all(&self, calls: &[ToolCallRequest]) -> Result<Vec<Message>, ValidationError> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(call).await?);
        }
        Ok(results)
    }

    async fn try_execute(&self, call: &ToolCallRequest) -> Result<String, ToolError> {
        let tool = self
            .registry
            .get(&call.name)
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;
        if let Some(e) = &call.argument_error {
            return Err(ToolError::InvalidArguments(e.clone()));
        }
        validate_arguments(&call.arguments, &tool.spec().input_schema)
            .map_err(ToolError::InvalidArguments)?;
        tool.call(call.arguments.clone()).await
    }
}
