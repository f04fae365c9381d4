//! Checkpointer trait and its error type.

use async_trait::async_trait;

use crate::memory::Checkpoint;
use crate::state::ConversationState;

/// Error from a checkpoint store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckpointError {
    #[error("session_id required")]
    SessionIdRequired,
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("storage: {0}")]
    Storage(String),
}

/// Durable map from session id to its latest conversation state.
///
/// Implementations are last-write-wins per session and must be safe to share across
/// tasks. Sessions are independent: saving one never affects another.
///
/// **Interaction**: Held by `GraphEngine` as `Arc<dyn Checkpointer>`; `load` before a run,
/// `save` once after it succeeds.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    /// Latest checkpoint for the session, or `None` when the session has none.
    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>, CheckpointError>;

    /// Replaces the session's checkpoint with `state`; returns the new checkpoint id.
    async fn save(
        &self,
        session_id: &str,
        state: &ConversationState,
    ) -> Result<String, CheckpointError>;

    /// Removes the session's checkpoint; returns whether one existed.
    async fn delete(&self, session_id: &str) -> Result<bool, CheckpointError>;
}
