//! Scripted LLM for tests and examples.
//!
//! Replays a queue of replies (or errors) in order and records every message list it
//! was invoked with, so tests can assert what history the model saw. An optional
//! repeating reply takes over once the queue is empty.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, LlmResponse, RawToolCall};
use crate::message::Message;
use crate::tools::ToolSpec;

/// Model stand-in that returns pre-recorded replies.
///
/// **Interaction**: Implements `LlmClient`; pass it to `GraphEngine::new` wrapped in `Arc`.
pub struct ScriptedLlm {
    script: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    /// Returned whenever the script is exhausted. When `None`, exhaustion is a provider error.
    repeat: Option<LlmResponse>,
    invocations: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedLlm {
    /// Replays `replies` in order, then fails.
    pub fn new(replies: Vec<LlmResponse>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().map(Ok).collect()),
            repeat: None,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// A model that requests the same tool on every turn and never answers.
    pub fn always_tool_call(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self::new(Vec::new()).repeating(LlmResponse::with_tool_calls(
            "",
            vec![RawToolCall::new(name, arguments)],
        ))
    }

    /// Sets the reply used after the script runs out.
    pub fn repeating(mut self, reply: LlmResponse) -> Self {
        self.repeat = Some(reply);
        self
    }

    /// Appends a reply to the script.
    pub fn then(self, reply: LlmResponse) -> Self {
        self.push(Ok(reply));
        self
    }

    /// Appends a failure to the script.
    pub fn then_fail(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, item: Result<LlmResponse, LlmError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(item);
        }
    }

    /// Message lists seen so far, one entry per invocation.
    pub fn invocations(&self) -> Vec<Vec<Message>> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn invoke(
        &self,
        messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, LlmError> {
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(messages.to_vec());
        }
        let next = self
            .script
            .lock()
            .map_err(|e| LlmError::Provider(format!("script lock poisoned: {}", e)))?
            .pop_front();
        match next {
            Some(reply) => reply,
            None => self
                .repeat
                .clone()
                .ok_or_else(|| LlmError::Provider("script exhausted".to_string())),
        }
    }
}
