//! Shared fixtures for integration tests: the weather `search` tool and scripted replies.

#![allow(dead_code)]

use std::sync::Arc;

use reactgraph::{
    FnTool, GraphEngine, LlmResponse, MemorySaver, RawToolCall, ScriptedLlm, ToolError,
    ToolRegistry, ToolSpec,
};
use serde_json::json;

pub const WEATHER_RESULT: &str = "It's currently sunny and 75°F.";

pub fn search_spec() -> ToolSpec {
    ToolSpec::new(
        "search",
        "Call to surf the web.",
        json!({
            "type": "object",
            "properties": { "query": { "type": "string", "description": "The query to use in your search." } },
            "required": ["query"],
        }),
    )
}

/// Weather search stub: always sunny.
pub fn search_tool() -> FnTool {
    FnTool::new(search_spec(), |_| async { Ok(WEATHER_RESULT.to_string()) })
}

/// A tool whose capability always fails.
pub fn failing_tool() -> FnTool {
    FnTool::new(
        ToolSpec::new("flaky", "Fails every time.", json!({"type": "object"})),
        |_| async { Err(ToolError::Execution("service unavailable".into())) },
    )
}

pub fn registry() -> ToolRegistry {
    ToolRegistry::new().with_tool(search_tool()).with_tool(failing_tool())
}

/// Model turn that calls `search` for the weather.
pub fn weather_tool_call() -> LlmResponse {
    LlmResponse::with_tool_calls(
        "",
        vec![RawToolCall::new("search", r#"{"query":"weather"}"#).with_id("call-weather")],
    )
}

pub fn weather_answer() -> LlmResponse {
    LlmResponse::text("It's sunny and 75°F today.")
}

pub struct Harness {
    pub llm: Arc<ScriptedLlm>,
    pub saver: Arc<MemorySaver>,
    pub engine: GraphEngine,
}

pub fn harness(llm: ScriptedLlm) -> Harness {
    let llm = Arc::new(llm);
    let saver = Arc::new(MemorySaver::new());
    let engine = GraphEngine::new(llm.clone(), registry(), saver.clone());
    Harness { llm, saver, engine }
}
