//! End-to-end runs of GraphEngine against scripted models.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reactgraph::agent::EMPTY_REPLY_FALLBACK;
use reactgraph::{
    CancellationToken, FnTool, GraphEngine, GraphError, LlmClient, LlmError, LlmResponse,
    MemorySaver, Message, RawToolCall, Role, ScriptedLlm, SessionPolicy, ToolRegistry, ToolSpec,
};
use serde_json::json;
use tokio::sync::Notify;

use common::{harness, weather_answer, weather_tool_call, WEATHER_RESULT};

/// **Scenario**: Weather question runs agent -> tools -> agent and ends with the answer.
#[tokio::test]
async fn scenario_weather_question_uses_search_tool() {
    let h = harness(ScriptedLlm::new(vec![weather_tool_call(), weather_answer()]));
    let outcome = h
        .engine
        .invoke("demo-123", vec![Message::user("What's the weather like today?")])
        .await
        .unwrap();

    let messages = outcome.state.messages();
    assert_eq!(outcome.cycles, 1);
    assert_eq!(messages.len(), 4);
    let roles: Vec<Role> = messages.iter().map(|m| m.role()).collect();
    assert_eq!(roles, [Role::User, Role::Assistant, Role::Tool, Role::Assistant]);

    let last = outcome.state.last_message().unwrap();
    assert!(last.content().contains("75°F"), "{}", last.content());
    assert!(!last.has_tool_calls());

    let tool_msg = &messages[2];
    assert_eq!(tool_msg.content(), WEATHER_RESULT);
    assert_eq!(tool_msg.tool_call_id(), Some("call-weather"));
    assert_eq!(messages[1].tool_calls()[0].arguments.get("query"), Some(&json!("weather")));

    let saved = h.engine.get_state("demo-123").await.unwrap().unwrap();
    assert_eq!(saved, outcome.state);
}

/// **Scenario**: Second run on the same session sends the full history to the model.
#[tokio::test]
async fn scenario_follow_up_sees_prior_history() {
    let h = harness(
        ScriptedLlm::new(vec![weather_tool_call(), weather_answer()])
            .then(LlmResponse::text("Yes, 75°F is a pleasant temperature.")),
    );
    h.engine
        .run("demo-123", vec![Message::user("What's the weather like today?")])
        .await
        .unwrap();
    let state = h
        .engine
        .run("demo-123", vec![Message::user("Is that a good temperature?")])
        .await
        .unwrap();

    let invocations = h.llm.invocations();
    assert_eq!(invocations.len(), 3);
    let seen = &invocations[2];
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[0].content(), "What's the weather like today?");
    assert_eq!(seen[2].content(), WEATHER_RESULT);
    assert_eq!(seen[4].content(), "Is that a good temperature?");

    assert_eq!(state.len(), 6);
    assert_eq!(state.last_assistant_reply(), Some("Yes, 75°F is a pleasant temperature."));
}

/// **Scenario**: A call to an unregistered tool is reported and the agent gets another turn.
#[tokio::test]
async fn scenario_unknown_tool_does_not_abort() {
    let h = harness(ScriptedLlm::new(vec![
        LlmResponse::with_tool_calls("", vec![RawToolCall::new("get_stock_price", "{}")]),
        LlmResponse::text("Sorry, I can't look that up."),
    ]));
    let state = h
        .engine
        .run("s3", vec![Message::user("What's ACME trading at?")])
        .await
        .unwrap();

    assert_eq!(h.llm.invocation_count(), 2);
    let tool_msg = &state.messages()[2];
    assert_eq!(tool_msg.role(), Role::Tool);
    assert!(tool_msg.content().contains("unknown tool"), "{}", tool_msg.content());
    assert_eq!(state.last_assistant_reply(), Some("Sorry, I can't look that up."));
}

/// **Scenario**: A model that never stops calling tools hits the cycle limit; nothing is saved.
#[tokio::test]
async fn scenario_step_limit_exceeded_writes_no_checkpoint() {
    let h = harness(ScriptedLlm::always_tool_call("search", r#"{"query":"weather"}"#));
    let engine = h.engine.with_max_cycles(3);
    let err = engine
        .run("loop", vec![Message::user("weather?")])
        .await
        .unwrap_err();

    assert!(matches!(err, GraphError::StepLimitExceeded { limit: 3 }), "{:?}", err);
    assert_eq!(h.llm.invocation_count(), 4);
    assert!(engine.get_state("loop").await.unwrap().is_none());
    assert!(h.saver.sessions().await.is_empty());
}

/// **Scenario**: One turn calling a failing tool and a working tool merges both results in call order.
#[tokio::test]
async fn multiple_tool_calls_merge_in_order_and_failures_do_not_abort() {
    let h = harness(ScriptedLlm::new(vec![
        LlmResponse::with_tool_calls(
            "",
            vec![
                RawToolCall::new("flaky", "{}").with_id("call-flaky"),
                RawToolCall::new("search", r#"{"query":"weather"}"#).with_id("call-search"),
            ],
        ),
        weather_answer(),
    ]));
    let state = h
        .engine
        .run("multi", vec![Message::user("weather?")])
        .await
        .unwrap();

    let messages = state.messages();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[1].tool_calls().len(), 2);
    assert_eq!(messages[2].tool_call_id(), Some("call-flaky"));
    assert!(messages[2].content().contains("service unavailable"), "{}", messages[2].content());
    assert_eq!(messages[3].tool_call_id(), Some("call-search"));
    assert_eq!(messages[3].content(), WEATHER_RESULT);
    assert_eq!(state.last_assistant_reply(), Some("It's sunny and 75°F today."));

    let second_turn = &h.llm.invocations()[1];
    assert_eq!(second_turn.len(), 4);
    let linked: Vec<_> = second_turn[2..].iter().filter_map(|m| m.tool_call_id()).collect();
    assert_eq!(linked, ["call-flaky", "call-search"]);
}

/// **Scenario**: Malformed raw arguments reach the model as an error even when the schema requires nothing.
#[tokio::test]
async fn malformed_arguments_reported_for_optional_only_schema() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let lookup = FnTool::new(
        ToolSpec::new(
            "lookup",
            "Optional query.",
            json!({"type": "object", "properties": {"query": {"type": "string"}}}),
        ),
        move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok("RAN".to_string())
            }
        },
    );
    let llm = Arc::new(ScriptedLlm::new(vec![
        LlmResponse::with_tool_calls("", vec![RawToolCall::new("lookup", "{not json")]),
        LlmResponse::text("Let me retry that."),
    ]));
    let engine = GraphEngine::new(
        llm.clone(),
        ToolRegistry::new().with_tool(lookup),
        Arc::new(MemorySaver::new()),
    );

    let state = engine.run("s", vec![Message::user("look it up")]).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    let tool_msg = &state.messages()[2];
    assert_eq!(tool_msg.role(), Role::Tool);
    assert!(tool_msg.content().contains("invalid arguments"), "{}", tool_msg.content());
    assert_ne!(tool_msg.content(), "RAN");
    assert_eq!(llm.invocation_count(), 2);
}

/// **Scenario**: Session lock entries are dropped once runs finish, whether they succeed or fail.
#[tokio::test]
async fn finished_runs_release_session_entries() {
    let h = harness(ScriptedLlm::new(vec![weather_answer()]));
    h.engine.run("a", vec![Message::user("hi")]).await.unwrap();
    assert!(h.engine.run("b", vec![Message::user("hi")]).await.is_err());
    assert_eq!(h.engine.active_sessions(), 0);
}

/// **Scenario**: A failing run leaves the previously saved state untouched.
#[tokio::test]
async fn failed_run_keeps_prior_checkpoint() {
    let h = harness(
        ScriptedLlm::new(vec![weather_answer()]).repeating(weather_tool_call()),
    );
    let engine = h.engine.with_max_cycles(2);
    let first = engine.run("s", vec![Message::user("hi")]).await.unwrap();
    let err = engine.run("s", vec![Message::user("again")]).await.unwrap_err();
    assert!(matches!(err, GraphError::StepLimitExceeded { .. }));
    assert_eq!(engine.get_state("s").await.unwrap(), Some(first));
}

/// **Scenario**: Model failure aborts the run with ModelInvocation and no checkpoint.
#[tokio::test]
async fn model_error_propagates() {
    let h = harness(
        ScriptedLlm::new(vec![weather_tool_call()])
            .then_fail(LlmError::Transport("connection reset".into())),
    );
    let err = h
        .engine
        .run("s", vec![Message::user("weather?")])
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::ModelInvocation(LlmError::Transport(_))), "{:?}", err);
    assert_eq!(h.llm.invocation_count(), 2);
    assert!(h.engine.get_state("s").await.unwrap().is_none());
}

/// **Scenario**: Sessions do not see each other's history.
#[tokio::test]
async fn sessions_are_isolated() {
    let h = harness(ScriptedLlm::new(vec![
        LlmResponse::text("answer a"),
        LlmResponse::text("answer b"),
    ]));
    h.engine.run("a", vec![Message::user("question a")]).await.unwrap();
    let b = h.engine.run("b", vec![Message::user("question b")]).await.unwrap();

    assert_eq!(b.len(), 2);
    assert_eq!(h.llm.invocations()[1].len(), 1);
    let a = h.engine.get_state("a").await.unwrap().unwrap();
    assert_eq!(a.last_assistant_reply(), Some("answer a"));
}

/// **Scenario**: Input with a tool result for a call nobody made is rejected before the model runs.
#[tokio::test]
async fn dangling_tool_result_is_invalid_input() {
    let h = harness(ScriptedLlm::new(vec![weather_answer()]));
    let err = h
        .engine
        .run("s", vec![Message::tool("ghost-call", "orphan").unwrap()])
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidInput(_)), "{:?}", err);
    assert_eq!(h.llm.invocation_count(), 0);
}

/// **Scenario**: Empty model reply becomes the fallback text and ends the run.
#[tokio::test]
async fn empty_reply_falls_back() {
    let h = harness(ScriptedLlm::new(vec![LlmResponse::default()]));
    let state = h.engine.run("s", vec![Message::user("hi")]).await.unwrap();
    assert_eq!(state.last_assistant_reply(), Some(EMPTY_REPLY_FALLBACK));
}

/// **Scenario**: Already-cancelled token aborts before anything runs.
#[tokio::test]
async fn cancelled_before_start() {
    let h = harness(ScriptedLlm::new(vec![weather_answer()]));
    let token = CancellationToken::new();
    token.cancel();
    let err = h
        .engine
        .run_with_cancel("s", vec![Message::user("hi")], &token)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Cancelled));
    assert_eq!(h.llm.invocation_count(), 0);
    assert!(h.engine.get_state("s").await.unwrap().is_none());
}

/// **Scenario**: Cancelling during a tool call stops the run and writes no checkpoint.
#[tokio::test]
async fn cancelled_mid_run_writes_no_checkpoint() {
    let token = CancellationToken::new();
    let trigger = token.clone();
    let search = FnTool::new(common::search_spec(), move |_| {
        let trigger = trigger.clone();
        async move {
            trigger.cancel();
            Ok(WEATHER_RESULT.to_string())
        }
    });
    let llm = Arc::new(ScriptedLlm::new(vec![weather_tool_call(), weather_answer()]));
    let engine = GraphEngine::new(
        llm.clone(),
        ToolRegistry::new().with_tool(search),
        Arc::new(MemorySaver::new()),
    );

    let err = engine
        .run_with_cancel("s", vec![Message::user("weather?")], &token)
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Cancelled), "{:?}", err);
    assert_eq!(llm.invocation_count(), 1);
    assert!(engine.get_state("s").await.unwrap().is_none());
}

/// Model that signals when it is called and answers only when released.
struct GatedLlm {
    entered: Notify,
    release: Notify,
}

impl GatedLlm {
    fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl LlmClient for GatedLlm {
    async fn invoke(
        &self,
        messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, LlmError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(LlmResponse::text(format!("seen {}", messages.len())))
    }
}

fn gated_engine(policy: SessionPolicy) -> (Arc<GatedLlm>, Arc<GraphEngine>) {
    let llm = Arc::new(GatedLlm::new());
    let engine = GraphEngine::new(llm.clone(), ToolRegistry::new(), Arc::new(MemorySaver::new()))
        .with_session_policy(policy);
    (llm, Arc::new(engine))
}

/// **Scenario**: With the reject policy a second run on a busy session fails with SessionBusy.
#[tokio::test]
async fn reject_policy_rejects_concurrent_run() {
    let (llm, engine) = gated_engine(SessionPolicy::Reject);
    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.run("s", vec![Message::user("one")]).await })
    };
    llm.entered.notified().await;

    let err = engine.run("s", vec![Message::user("two")]).await.unwrap_err();
    assert!(matches!(err, GraphError::SessionBusy(ref id) if id == "s"), "{:?}", err);

    llm.release.notify_one();
    let state = first.await.unwrap().unwrap();
    assert_eq!(state.len(), 2);
}

/// **Scenario**: With the queue policy concurrent runs on one session both land, in order.
#[tokio::test]
async fn queue_policy_serializes_runs() {
    let (llm, engine) = gated_engine(SessionPolicy::Queue);
    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.run("s", vec![Message::user("one")]).await })
    };
    llm.entered.notified().await;
    let second = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.run("s", vec![Message::user("two")]).await })
    };

    llm.release.notify_one();
    first.await.unwrap().unwrap();
    llm.entered.notified().await;
    llm.release.notify_one();
    let state = second.await.unwrap().unwrap();

    let contents: Vec<&str> = state.messages().iter().map(|m| m.content()).collect();
    assert_eq!(contents, ["one", "seen 1", "two", "seen 3"]);
}

/// Model that records the tool names it was offered.
#[derive(Default)]
struct ToolsProbe {
    offered: Mutex<Vec<String>>,
}

#[async_trait]
impl LlmClient for ToolsProbe {
    async fn invoke(
        &self,
        _messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, LlmError> {
        if let Ok(mut offered) = self.offered.lock() {
            offered.extend(tools.iter().map(|t| t.name.clone()));
        }
        Ok(LlmResponse::text("ok"))
    }
}

/// **Scenario**: The model is offered every registered tool definition.
#[tokio::test]
async fn registered_tools_are_offered_to_model() {
    let probe = Arc::new(ToolsProbe::default());
    let engine = GraphEngine::new(probe.clone(), common::registry(), Arc::new(MemorySaver::new()));
    engine.run("s", vec![Message::user("hi")]).await.unwrap();
    let offered = probe.offered.lock().unwrap().clone();
    assert_eq!(offered, ["flaky", "search"]);
}
