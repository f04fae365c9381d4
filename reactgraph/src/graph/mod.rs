//! The fixed agent/tools state machine and its run loop.
//!
//! ```text
//! start ──► agent ──route──► tools ──► agent ...
//!                 └────────► end (checkpoint saved)
//! ```
//!
//! [`GraphEngine`] owns the loop: it loads the session's state, merges the caller's
//! input, alternates between the agent and tools steps as [`route`](route::route)
//! decides, and commits the final state once. Runs on one session are serialized by
//! [`SessionLocks`].

mod engine;
pub mod logging;
mod node;
pub mod route;
pub mod session;

pub use engine::{GraphEngine, RunOutcome};
pub use node::GraphNode;
pub use route::Route;
pub use session::{SessionLocks, SessionPolicy};
