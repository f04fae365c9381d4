//! Per-session persistence of conversation state.
//!
//! A [`Checkpointer`] maps a session id to the latest [`Checkpoint`]. `GraphEngine`
//! loads it before a run and saves exactly once after a successful one; a failed or
//! cancelled run never calls `save`. [`MemorySaver`] is the in-process implementation.

mod checkpoint;
mod checkpointer;
mod memory_saver;

pub use checkpoint::Checkpoint;
pub use checkpointer::{CheckpointError, Checkpointer};
pub use memory_saver::MemorySaver;
