//! ConversationState and the upsert-by-id reducer.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::message::{Message, Role};

/// Ordered message history of one session.
///
/// Created empty or restored from a checkpoint; grows only through [`reduce`].
///
/// **Interaction**: Loaded from and saved to a `Checkpointer` by `GraphEngine`; read
/// by `AgentNode` (full history goes to the model) and by `route`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    messages: Vec<Message>,
}

impl ConversationState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Content of the chronologically last assistant message, if any.
    ///
    /// An assistant turn that only carried tool calls yields `Some("")`.
    pub fn last_assistant_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role() == Role::Assistant)
            .map(Message::content)
    }

    /// Checks that every tool message answers a call issued by an earlier assistant message.
    pub fn validate_tool_links(&self) -> Result<(), ValidationError> {
        let mut issued: HashSet<&str> = HashSet::new();
        for m in &self.messages {
            match m.role() {
                Role::Assistant => issued.extend(m.tool_calls().iter().map(|c| c.id.as_str())),
                Role::Tool => {
                    let call_id = m.tool_call_id().unwrap_or_default();
                    if !issued.contains(call_id) {
                        return Err(ValidationError::DanglingToolCallId(call_id.to_string()));
                    }
                }
                Role::User => {}
            }
        }
        Ok(())
    }
}

/// Merges `incoming` into `existing` and returns the new state.
///
/// Messages are appended in order, except that a message whose id is already present
/// (in `existing`, or earlier in the same batch) replaces that entry at its position.
/// `existing` is never modified; an empty batch yields an equal copy.
pub fn reduce<I>(existing: &ConversationState, incoming: I) -> ConversationState
where
    I: IntoIterator<Item = Message>,
{
    let mut merged = existing.messages.clone();
    let mut index_by_id: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id().to_string(), i))
        .collect();

    for message in incoming {
        match index_by_id.get(message.id()) {
            Some(&pos) => merged[pos] = message,
            None => {
                index_by_id.insert(message.id().to_string(), merged.len());
                merged.push(message);
            }
        }
    }

    ConversationState { messages: merged }
}
