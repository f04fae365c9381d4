//! Example: two turns on one session with a scripted model and a weather tool.
//!
//! The first turn calls `search` and answers; the second turn is answered with the
//! checkpointed history in view. Prints each message of the final state.
//!
//! Run: `RUST_LOG=reactgraph=debug cargo run -p reactgraph-examples --example weather_session`

use std::sync::Arc;

use reactgraph::{
    Checkpointer, FnTool, GraphEngine, LlmResponse, MemorySaver, Message, RawToolCall,
    ScriptedLlm, ToolRegistry, ToolSpec,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

const SESSION: &str = "demo-123";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let search = FnTool::new(
        ToolSpec::new(
            "search",
            "Call to surf the web.",
            json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"],
            }),
        ),
        |_| async { Ok("It's currently sunny and 75°F.".to_string()) },
    );

    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmResponse::with_tool_calls(
            "",
            vec![RawToolCall::new("search", r#"{"query":"weather"}"#)],
        ),
        LlmResponse::text("It's sunny and 75°F right now."),
        LlmResponse::text("75°F is comfortable for most people, so yes."),
    ]));
    let saver = Arc::new(MemorySaver::new());
    let engine = GraphEngine::new(llm, ToolRegistry::new().with_tool(search), saver.clone());

    for question in ["What's the weather like today?", "Is that a good temperature?"] {
        let outcome = engine.invoke(SESSION, vec![Message::user(question)]).await?;
        println!(
            "> {}\n< {} ({} tool cycles)",
            question,
            outcome.state.last_assistant_reply().unwrap_or_default(),
            outcome.cycles
        );
    }

    if let Some(checkpoint) = saver.load(SESSION).await? {
        println!("\ncheckpoint {} for {}:", checkpoint.id, checkpoint.session_id);
        for m in checkpoint.state.messages() {
            println!("  [{}] {}", m.role(), m.content());
        }
    }
    Ok(())
}
