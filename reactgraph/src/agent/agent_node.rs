use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::llm::{LlmClient, LlmError, LlmResponse, RawToolCall};
use crate::message::{Message, ToolArguments, ToolCallRequest};
use crate::state::ConversationState;
use crate::tools::ToolSpec;

/// Assistant content used when the model returns neither text nor tool calls.
pub const EMPTY_REPLY_FALLBACK: &str =
    "No text response from the model. Please try again or check the API.";

/// Calls the model with the conversation and turns the reply into an assistant message.
///
/// **Interaction**: Built by `GraphEngine` from its `LlmClient` and the registry's
/// `ToolSpec`s; the returned message is merged by `reduce` and inspected by `route`.
pub struct AgentNode {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
}

impl AgentNode {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Vec<ToolSpec>) -> Self {
        Self { llm, tools }
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    /// Invokes the model once. Provider failures are returned unchanged; no retry.
    pub async fn run(&self, state: &ConversationState) -> Result<Message, LlmError> {
        debug!(messages = state.len(), tools = self.tools.len(), "agent invoking model");
        let response = self.llm.invoke(state.messages(), &self.tools).await?;
        Ok(decode_response(response))
    }
}

fn decode_response(response: LlmResponse) -> Message {
    let used_fallback = response.content.is_empty() && response.tool_calls.is_empty();
    if used_fallback {
        warn!("model returned no content and no tool calls, using fallback text");
        return Message::assistant(EMPTY_REPLY_FALLBACK);
    }
    let calls = response.tool_calls.into_iter().map(decode_tool_call).collect();
    Message::assistant_with_tool_calls(response.content, calls)
}

fn decode_tool_call(raw: RawToolCall) -> ToolCallRequest {
    let call = match parse_tool_arguments(&raw.arguments) {
        Ok(arguments) => ToolCallRequest::new(raw.name, arguments),
        Err(e) => {
            warn!(tool = %raw.name, error = %e, arguments = %raw.arguments, "tool arguments undecodable");
            ToolCallRequest::undecodable(raw.name, e)
        }
    };
    match raw.id.filter(|id| !id.is_empty()) {
        Some(id) => call.with_id(id),
        None => call,
    }
}

/// Decodes raw argument text into an object.
///
/// Blank text is `{}`. A JSON string is decoded once more (some providers double-encode).
/// Invalid JSON, or JSON that is not an object, is an error.
fn parse_tool_arguments(arguments: &str) -> Result<ToolArguments, String> {
    if arguments.trim().is_empty() {
        return Ok(ToolArguments::new());
    }
    let raw: Value = serde_json::from_str(arguments)
        .map_err(|e| format!("arguments are not valid JSON: {}", e))?;
    let value = match raw {
        Value::String(s) => serde_json::from_str(&s)
            .map_err(|e| format!("nested arguments are not valid JSON: {}", e))?,
        other => other,
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("arguments must be a JSON object, got {}", other)),
    }
}
