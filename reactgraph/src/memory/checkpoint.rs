use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::ConversationState;

/// Snapshot of one session's state at the end of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Unique id of this snapshot.
    pub id: String,
    pub session_id: String,
    /// Milliseconds since the Unix epoch when the snapshot was taken.
    pub created_at_ms: u64,
    pub state: ConversationState,
}

impl Checkpoint {
    /// Wraps `state` in a new checkpoint stamped with a fresh id and the current time.
    pub fn from_state(session_id: impl Into<String>, state: ConversationState) -> Self {
        let created_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            created_at_ms,
            state,
        }
    }
}
