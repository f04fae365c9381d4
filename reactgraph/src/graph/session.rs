//! Per-session serialization of runs.

use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::GraphError;

/// What a run does when another run already holds its session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Wait for the earlier run to finish.
    #[default]
    Queue,
    /// Fail immediately with `GraphError::SessionBusy`.
    Reject,
}

impl FromStr for SessionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "queue" => Ok(Self::Queue),
            "reject" => Ok(Self::Reject),
            _ => Err(format!(
                "unknown session policy: {} (use queue or reject)",
                s
            )),
        }
    }
}

/// One async mutex per session id, held only while a run uses the session.
/// Distinct sessions never contend.
///
/// **Interaction**: Owned by `GraphEngine`; the guard returned by `acquire` is held
/// from checkpoint load until after save.
#[derive(Default)]
pub struct SessionLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the session's lock under `policy`.
    pub async fn acquire(
        &self,
        session_id: &str,
        policy: SessionPolicy,
    ) -> Result<OwnedMutexGuard<()>, GraphError> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_default()
            .value()
            .clone();
        match policy {
            SessionPolicy::Queue => Ok(lock.lock_owned().await),
            SessionPolicy::Reject => lock
                .try_lock_owned()
                .map_err(|_| GraphError::SessionBusy(session_id.to_string())),
        }
    }

    /// Drops the session's lock entry if no run holds or awaits it.
    ///
    /// Called after every run so the map only tracks sessions in use.
    pub fn release_idle(&self, session_id: &str) {
        self.locks
            .remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of sessions with a lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Whether a run currently holds the session.
    pub fn is_busy(&self, session_id: &str) -> bool {
        self.locks
            .get(session_id)
            .map(|lock| lock.try_lock().is_err())
            .unwrap_or(false)
    }
}
