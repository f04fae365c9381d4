//! Conversation messages: user input, assistant replies, tool results.
//!
//! Every message carries an `id`. The reducer uses it to replace an existing entry
//! instead of appending, so replaying a message never duplicates it. Ids are
//! assigned on construction when the caller does not supply one.
//!
//! Role-specific fields are checked on construction and on deserialization:
//! a tool message needs a `tool_call_id`, and only assistant messages carry tool calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ValidationError;

/// Structured key-value arguments of a tool call.
pub type ToolArguments = Map<String, Value>;

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            "tool" => Ok(Self::Tool),
            _ => Err(ValidationError::UnknownRole(s.to_string())),
        }
    }
}

/// A request, emitted by the model, to run a named tool with arguments.
///
/// **Interaction**: Produced by `AgentNode` when decoding the model reply; carried on
/// the assistant message; consumed by `ToolExecutor::execute`, whose result message
/// links back through `tool_call_id == id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
    /// Set when the model's raw arguments could not be decoded into an object.
    /// The executor reports it instead of running the tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument_error: Option<String>,
}

impl ToolCallRequest {
    /// Creates a call with a fresh id.
    pub fn new(name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            id: fresh_id(),
            name: name.into(),
            arguments,
            argument_error: None,
        }
    }

    /// A call whose arguments failed to decode; `arguments` is left empty.
    pub fn undecodable(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            argument_error: Some(error.into()),
            ..Self::new(name, ToolArguments::new())
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// One turn in the conversation.
///
/// Fields are private so the role rules hold for every value in existence; use the
/// role constructors ([`Message::user`], [`Message::assistant`], [`Message::tool`]) or
/// the validating [`Message::from_parts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage")]
pub struct Message {
    id: String,
    role: Role,
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ToolCallRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    /// Creates an assistant message with no tool calls (a final answer).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::assistant_with_tool_calls(content, Vec::new())
    }

    /// Creates an assistant message that requests tools.
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Self {
        Self {
            id: fresh_id(),
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    /// Creates a tool result for the call with id `tool_call_id`.
    ///
    /// Fails with [`ValidationError::MissingToolCallId`] when `tool_call_id` is empty,
    /// the same rule deserialization applies.
    pub fn tool(
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let tool_call_id = tool_call_id.into();
        if tool_call_id.is_empty() {
            return Err(ValidationError::MissingToolCallId);
        }
        Ok(Self {
            id: fresh_id(),
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id),
        })
    }

    /// Builds a message from loosely typed parts, enforcing the role rules.
    ///
    /// A missing or empty `id` gets a fresh one. Fails with [`ValidationError`] when
    /// the role is unknown, a tool message has no `tool_call_id`, a non-tool message
    /// has one, or a non-assistant message carries tool calls.
    pub fn from_parts(
        id: Option<String>,
        role: &str,
        content: impl Into<String>,
        tool_calls: Vec<ToolCallRequest>,
        tool_call_id: Option<String>,
    ) -> Result<Self, ValidationError> {
        let role: Role = role.parse()?;
        match (role, tool_call_id.as_deref()) {
            (Role::Tool, None) | (Role::Tool, Some("")) => {
                return Err(ValidationError::MissingToolCallId)
            }
            (Role::User | Role::Assistant, Some(_)) => {
                return Err(ValidationError::UnexpectedToolCallId)
            }
            _ => {}
        }
        if role != Role::Assistant && !tool_calls.is_empty() {
            return Err(ValidationError::ToolCallsOnNonAssistant);
        }
        Ok(Self {
            id: id.filter(|s| !s.is_empty()).unwrap_or_else(fresh_id),
            role,
            content: content.into(),
            tool_calls,
            tool_call_id,
        })
    }

    /// Replaces the id (e.g. to upsert an existing message through the reducer).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        &self.tool_calls
    }

    pub fn tool_call_id(&self) -> Option<&str> {
        self.tool_call_id.as_deref()
    }

    /// True for an assistant message that requests at least one tool.
    pub fn has_tool_calls(&self) -> bool {
        self.role == Role::Assistant && !self.tool_calls.is_empty()
    }
}

/// Wire shape of [`Message`]; funnels deserialization through [`Message::from_parts`].
#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    id: Option<String>,
    role: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ToolCallRequest>,
    #[serde(default)]
    tool_call_id: Option<String>,
}

impl TryFrom<RawMessage> for Message {
    type Error = ValidationError;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        Message::from_parts(
            raw.id,
            &raw.role,
            raw.content,
            raw.tool_calls,
            raw.tool_call_id,
        )
    }
}
