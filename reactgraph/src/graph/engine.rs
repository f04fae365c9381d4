//! Run loop over the agent/tools state machine.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::agent::AgentNode;
use crate::config::EngineConfig;
use crate::error::GraphError;
use crate::graph::logging;
use crate::graph::route::route;
use crate::graph::{GraphNode, SessionLocks, SessionPolicy};
use crate::llm::LlmClient;
use crate::memory::Checkpointer;
use crate::message::Message;
use crate::state::{reduce, ConversationState};
use crate::tools::{ToolExecutor, ToolRegistry};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Final state, as saved to the checkpointer.
    pub state: ConversationState,
    /// Number of tools steps taken.
    pub cycles: usize,
}

/// Drives one session's conversation from input to final answer.
///
/// Each run loads the session checkpoint, merges the input, loops
/// `agent -> (tools -> agent)*` until the model answers without tool calls, then saves
/// the final state once. Any failure (model error, cycle limit, cancellation, invalid
/// input) returns before the save, so the stored state is exactly what it was before
/// the run.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use reactgraph::{GraphEngine, LlmResponse, MemorySaver, Message, ScriptedLlm, ToolRegistry};
///
/// # #[tokio::main]
/// # async fn main() {
/// let llm = Arc::new(ScriptedLlm::new(vec![LlmResponse::text("Hello!")]));
/// let engine = GraphEngine::new(llm, ToolRegistry::new(), Arc::new(MemorySaver::new()));
/// let state = engine.run("demo", vec![Message::user("hi")]).await.unwrap();
/// assert_eq!(state.last_assistant_reply(), Some("Hello!"));
/// # }
/// ```
pub struct GraphEngine {
    agent: AgentNode,
    executor: ToolExecutor,
    checkpointer: Arc<dyn Checkpointer>,
    config: EngineConfig,
    sessions: SessionLocks,
}

impl GraphEngine {
    /// Creates an engine with [`EngineConfig::default`].
    pub fn new(
        llm: Arc<dyn LlmClient>,
        registry: ToolRegistry,
        checkpointer: Arc<dyn Checkpointer>,
    ) -> Self {
        let agent = AgentNode::new(llm, registry.list());
        Self {
            agent,
            executor: ToolExecutor::new(registry),
            checkpointer,
            config: EngineConfig::default(),
            sessions: SessionLocks::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.config.max_cycles = max_cycles;
        self
    }

    pub fn with_session_policy(mut self, policy: SessionPolicy) -> Self {
        self.config.session_policy = policy;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sessions with a run in progress or waiting.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Runs the session to its next final answer and returns the saved state.
    pub async fn run(
        &self,
        session_id: &str,
        input: Vec<Message>,
    ) -> Result<ConversationState, GraphError> {
        self.invoke(session_id, input).await.map(|outcome| outcome.state)
    }

    /// Like [`run`](Self::run), also reporting how many tools steps were taken.
    pub async fn invoke(
        &self,
        session_id: &str,
        input: Vec<Message>,
    ) -> Result<RunOutcome, GraphError> {
        self.execute(session_id, input, None).await
    }

    /// Like [`run`](Self::run), aborting with `GraphError::Cancelled` once `cancel` fires.
    ///
    /// Cancellation is observed while waiting for the session, the model, or tools.
    pub async fn run_with_cancel(
        &self,
        session_id: &str,
        input: Vec<Message>,
        cancel: &CancellationToken,
    ) -> Result<ConversationState, GraphError> {
        self.execute(session_id, input, Some(cancel))
            .await
            .map(|outcome| outcome.state)
    }

    /// Persisted state of the session, or `None` if it has never completed a run.
    pub async fn get_state(&self, session_id: &str) -> Result<Option<ConversationState>, GraphError> {
        Ok(self
            .checkpointer
            .load(session_id)
            .await?
            .map(|checkpoint| checkpoint.state))
    }

    async fn execute(
        &self,
        session_id: &str,
        input: Vec<Message>,
        cancel: Option<&CancellationToken>,
    ) -> Result<RunOutcome, GraphError> {
        logging::log_run_start(session_id, input.len());
        let result = self.execute_inner(session_id, input, cancel).await;
        self.sessions.release_idle(session_id);
        match &result {
            Ok(outcome) => {
                logging::log_run_complete(session_id, outcome.state.len(), outcome.cycles)
            }
            Err(e) => logging::log_run_error(session_id, e),
        }
        result
    }

    async fn execute_inner(
        &self,
        session_id: &str,
        input: Vec<Message>,
        cancel: Option<&CancellationToken>,
    ) -> Result<RunOutcome, GraphError> {
        let _guard = cancellable(
            cancel,
            self.sessions.acquire(session_id, self.config.session_policy),
        )
        .await??;

        let prior = self
            .checkpointer
            .load(session_id)
            .await?
            .map(|checkpoint| checkpoint.state)
            .unwrap_or_default();
        let mut state = reduce(&prior, input);
        state.validate_tool_links()?;

        let mut cycles = 0;
        let mut node = GraphNode::Start;
        while node != GraphNode::End {
            logging::log_node_start(node);
            let next = match node {
                GraphNode::Start => GraphNode::Agent,
                GraphNode::Agent => {
                    let reply = cancellable(cancel, self.agent.run(&state)).await??;
                    state = reduce(&state, [reply]);
                    let decision = route(&state)?;
                    logging::log_route(decision);
                    decision.into()
                }
                GraphNode::Tools => {
                    if cycles >= self.config.max_cycles {
                        return Err(GraphError::StepLimitExceeded {
                            limit: self.config.max_cycles,
                        });
                    }
                    cycles += 1;
                    let calls = state
                        .last_message()
                        .map(|m| m.tool_calls().to_vec())
                        .unwrap_or_default();
                    let results = cancellable(cancel, self.executor.execute_all(&calls)).await??;
                    state = reduce(&state, results);
                    GraphNode::Agent
                }
                GraphNode::End => GraphNode::End,
            };
            logging::log_node_complete(node, next);
            node = next;
        }

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(GraphError::Cancelled);
        }
        self.checkpointer.save(session_id, &state).await?;
        Ok(RunOutcome { state, cycles })
    }
}

/// Races `fut` against `cancel`; cancellation wins ties.
async fn cancellable<F>(cancel: Option<&CancellationToken>, fut: F) -> Result<F::Output, GraphError>
where
    F: Future,
{
    match cancel {
        None => Ok(fut.await),
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(GraphError::Cancelled),
            out = fut => Ok(out),
        },
    }
}
