//! Error types for message construction and graph runs.
//!
//! [`ValidationError`] covers malformed messages and malformed tool arguments.
//! [`GraphError`] is what [`GraphEngine::run`](crate::graph::GraphEngine::run) returns
//! when a run aborts; tool failures never show up here because the executor turns
//! them into tool messages.

use thiserror::Error;

use crate::llm::LlmError;
use crate::memory::CheckpointError;

/// A message (or tool argument object) does not satisfy its structural rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown role: {0} (expected user, assistant, or tool)")]
    UnknownRole(String),
    #[error("tool message requires a tool_call_id")]
    MissingToolCallId,
    #[error("only tool messages may carry a tool_call_id")]
    UnexpectedToolCallId,
    #[error("only assistant messages may carry tool calls")]
    ToolCallsOnNonAssistant,
    #[error("tool message references unknown tool call: {0}")]
    DanglingToolCallId(String),
    #[error("invalid arguments: {0}")]
    Arguments(String),
}

/// A run failed and nothing was checkpointed.
///
/// **Interaction**: Returned by `GraphEngine::run`, `invoke`, and `run_with_cancel`.
/// The caller decides whether to retry; the engine never retries internally.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The model capability failed (provider or network error).
    #[error("model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    /// The model kept requesting tools past the configured cycle limit.
    #[error("step limit exceeded: more than {limit} agent/tool cycles")]
    StepLimitExceeded { limit: usize },

    /// Internal contract broken, e.g. routing on an empty conversation.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The caller's input messages do not fit the conversation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Another run holds the session and the engine is configured to reject.
    #[error("session busy: {0}")]
    SessionBusy(String),

    #[error("run cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: StepLimitExceeded display names the configured limit.
    #[test]
    fn step_limit_display_contains_limit() {
        let s = GraphError::StepLimitExceeded { limit: 25 }.to_string();
        assert!(s.contains("step limit"), "{}", s);
        assert!(s.contains("25"), "{}", s);
    }

    /// **Scenario**: LlmError converts into ModelInvocation and keeps its message.
    #[test]
    fn llm_error_converts_to_model_invocation() {
        let err: GraphError = LlmError::Transport("connection reset".into()).into();
        assert!(matches!(err, GraphError::ModelInvocation(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    /// **Scenario**: ValidationError display mentions the offending role.
    #[test]
    fn unknown_role_display() {
        let s = ValidationError::UnknownRole("system".into()).to_string();
        assert!(s.contains("system"), "{}", s);
    }
}
