//! Routing after the agent step.

use std::fmt;

use crate::error::GraphError;
use crate::message::Role;
use crate::state::ConversationState;

/// Where the run goes after the agent step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Tools,
    End,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Tools => "tools",
            Route::End => "end",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides from the last message alone: tool calls go to `Tools`, anything else ends.
///
/// Only valid right after the agent step, so an empty state or a last message that is
/// not from the assistant is an [`GraphError::InvariantViolation`].
pub fn route(state: &ConversationState) -> Result<Route, GraphError> {
    let last = state.last_message().ok_or_else(|| {
        GraphError::InvariantViolation("route called on empty conversation".to_string())
    })?;
    if last.role() != Role::Assistant {
        return Err(GraphError::InvariantViolation(format!(
            "route expects an assistant message last, found {}",
            last.role()
        )));
    }
    Ok(if last.has_tool_calls() {
        Route::Tools
    } else {
        Route::End
    })
}
