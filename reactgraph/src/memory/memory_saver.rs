//! In-memory checkpointer. Not persistent; for dev and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::memory::{Checkpoint, CheckpointError, Checkpointer};
use crate::state::ConversationState;

/// In-memory checkpointer keyed by session id; keeps only the latest checkpoint.
///
/// Cloning shares the same storage.
///
/// **Interaction**: Used as `Arc<dyn Checkpointer>` in `GraphEngine::new`.
#[derive(Clone, Default)]
pub struct MemorySaver {
    inner: Arc<RwLock<HashMap<String, Checkpoint>>>,
}

impl MemorySaver {
    /// Creates a new in-memory checkpointer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session ids that currently have a checkpoint, sorted.
    pub async fn sessions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn require_session(session_id: &str) -> Result<(), CheckpointError> {
        if session_id.is_empty() {
            return Err(CheckpointError::SessionIdRequired);
        }
        Ok(())
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn load(&self, session_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        Self::require_session(session_id)?;
        Ok(self.inner.read().await.get(session_id).cloned())
    }

    async fn save(
        &self,
        session_id: &str,
        state: &ConversationState,
    ) -> Result<String, CheckpointError> {
        Self::require_session(session_id)?;
        let checkpoint = Checkpoint::from_state(session_id, state.clone());
        let id = checkpoint.id.clone();
        self.inner
            .write()
            .await
            .insert(session_id.to_string(), checkpoint);
        Ok(id)
    }

    async fn delete(&self, session_id: &str) -> Result<bool, CheckpointError> {
        Self::require_session(session_id)?;
        Ok(self.inner.write().await.remove(session_id).is_some())
    }
}
