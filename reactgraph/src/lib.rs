//! # reactgraph
//!
//! A resumable agent/tools loop in Rust. A model is asked for the next step; if it
//! requests tools they run and their results go back to the model; when it answers
//! without tool calls the conversation is checkpointed under its session id, so the
//! next run on that session picks up the full history.
//!
//! ## Design principles
//!
//! - **One state type**: [`ConversationState`] is an ordered list of [`Message`]s, changed
//!   only through the pure [`reduce`] (append, or replace by id).
//! - **Fixed topology**: `start → agent → (tools → agent)* → end`, driven by
//!   [`GraphEngine`] with the pure router [`route`](graph::route::route).
//! - **Recoverable tools**: unknown tools, bad arguments and tool failures are turned into
//!   tool messages for the model; only model failures and run-control errors abort a run.
//! - **All-or-nothing runs**: a run that fails or is cancelled writes no checkpoint.
//!
//! ## Main modules
//!
//! - [`message`]: [`Message`], [`Role`], [`ToolCallRequest`].
//! - [`state`]: [`ConversationState`], [`reduce`].
//! - [`tools`]: [`Tool`], [`FnTool`], [`ToolSpec`], [`ToolRegistry`], [`ToolExecutor`].
//! - [`llm`]: [`LlmClient`] trait, [`LlmResponse`], [`ScriptedLlm`].
//! - [`agent`]: [`AgentNode`].
//! - [`graph`]: [`GraphEngine`], [`GraphNode`], [`Route`], [`SessionLocks`], [`SessionPolicy`].
//! - [`memory`]: [`Checkpointer`], [`Checkpoint`], [`MemorySaver`].
//! - [`config`]: [`EngineConfig`] from defaults, `config.toml`, `.env` and the environment.
//! - [`error`]: [`ValidationError`], [`GraphError`].

pub mod agent;
pub mod config;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;
pub mod state;
pub mod tools;

pub use agent::AgentNode;
pub use config::{ConfigError, EngineConfig};
pub use error::{GraphError, ValidationError};
pub use graph::{GraphEngine, GraphNode, Route, RunOutcome, SessionLocks, SessionPolicy};
pub use llm::{LlmClient, LlmError, LlmResponse, RawToolCall, ScriptedLlm};
pub use memory::{Checkpoint, CheckpointError, Checkpointer, MemorySaver};
pub use message::{Message, Role, ToolArguments, ToolCallRequest};
pub use state::{reduce, ConversationState};
pub use tools::{FnTool, Tool, ToolError, ToolExecutor, ToolRegistry, ToolSpec};

pub use tokio_util::sync::CancellationToken;
