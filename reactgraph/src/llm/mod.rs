//! Model capability consumed by the agent node.
//!
//! `AgentNode` depends on an [`LlmClient`] that maps the conversation (plus the tool
//! definitions the model may call) to the next reply. Provider adapters implement the
//! trait; [`ScriptedLlm`] replays canned replies for tests and examples.
//!
//! The engine never retries a failed invocation. Retry policy, if any, lives inside the
//! client implementation.

mod scripted;

pub use scripted::ScriptedLlm;

use async_trait::async_trait;

use crate::message::Message;
use crate::tools::ToolSpec;

/// A tool call as the model produced it: arguments are the raw JSON text.
///
/// **Interaction**: Part of `LlmResponse`; `AgentNode` decodes it into a
/// `ToolCallRequest` (parsed arguments, id assigned when missing).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawToolCall {
    /// Provider-assigned call id, when the provider sends one.
    pub id: Option<String>,
    pub name: String,
    /// Arguments as JSON text, e.g. `{"query":"weather"}`.
    pub arguments: String,
}

impl RawToolCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Reply from one model invocation: assistant text and zero or more tool calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmResponse {
    pub content: String,
    /// Empty means a final answer; the router then ends the run.
    pub tool_calls: Vec<RawToolCall>,
}

impl LlmResponse {
    /// A final answer with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A reply that requests tools.
    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<RawToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }
}

/// Failure of the model capability itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("undecodable reply: {0}")]
    Decode(String),
}

/// Model client: given the conversation and available tools, returns the next reply.
///
/// **Interaction**: Held by `AgentNode` as `Arc<dyn LlmClient>`; errors surface from
/// `GraphEngine::run` as `GraphError::ModelInvocation`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Builders leave the id unset unless asked.
    #[test]
    fn raw_tool_call_builders() {
        let c = RawToolCall::new("search", r#"{"query":"weather"}"#);
        assert!(c.id.is_none());
        assert_eq!(c.with_id("call-1").id.as_deref(), Some("call-1"));
    }

    /// **Scenario**: LlmResponse::text carries no tool calls.
    #[test]
    fn text_response_has_no_tool_calls() {
        let r = LlmResponse::text("done");
        assert_eq!(r.content, "done");
        assert!(r.tool_calls.is_empty());
    }
}
