//! Agent step: one model invocation per turn.
//!
//! [`AgentNode`] sends the full history plus the available tool definitions to the
//! [`LlmClient`](crate::llm::LlmClient) and decodes the reply into a single assistant
//! message. Whether the run continues is decided afterwards by
//! [`route`](crate::graph::route::route).

mod agent_node;

pub use agent_node::{AgentNode, EMPTY_REPLY_FALLBACK};
