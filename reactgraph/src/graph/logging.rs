//! Structured logging for graph runs.

use crate::error::GraphError;
use crate::graph::{GraphNode, Route};

/// Log run start.
pub fn log_run_start(session_id: &str, input_len: usize) {
    tracing::info!(session_id = session_id, input_len, "Starting graph run");
}

/// Log node execution start.
pub fn log_node_start(node: GraphNode) {
    tracing::debug!(node_id = node.as_str(), "Starting node execution");
}

/// Log node execution completion with the node that follows.
pub fn log_node_complete(node: GraphNode, next: GraphNode) {
    tracing::debug!(node_id = node.as_str(), next = next.as_str(), "Node execution complete");
}

/// Log the router's decision.
pub fn log_route(route: Route) {
    tracing::debug!(route = route.as_str(), "Routing decision");
}

/// Log run completion.
pub fn log_run_complete(session_id: &str, messages: usize, cycles: usize) {
    tracing::info!(session_id = session_id, messages, cycles, "Graph run complete");
}

/// Log run failure.
pub fn log_run_error(session_id: &str, error: &GraphError) {
    tracing::error!(session_id = session_id, %error, "Graph run error");
}
