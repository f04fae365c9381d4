use std::fmt;

use crate::graph::Route;

/// States of the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphNode {
    /// Pseudo-state before the first step; always moves to `Agent`.
    Start,
    Agent,
    Tools,
    /// Terminal; the run commits its checkpoint here.
    End,
}

impl GraphNode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphNode::Start => "start",
            GraphNode::Agent => "agent",
            GraphNode::Tools => "tools",
            GraphNode::End => "end",
        }
    }
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Route> for GraphNode {
    fn from(route: Route) -> Self {
        match route {
            Route::Tools => GraphNode::Tools,
            Route::End => GraphNode::End,
        }
    }
}
