//! Conversation state and the reducer that merges messages into it.
//!
//! The engine holds one [`ConversationState`] per run and only ever changes it via
//! [`reduce`]: new messages are appended, and a message whose id is already present
//! replaces the existing entry in place.
//!
//! # Example
//!
//! ```rust
//! use reactgraph::{reduce, ConversationState, Message};
//!
//! let start = ConversationState::new();
//! let q = Message::user("What's the weather like today?").with_id("q1");
//! let state = reduce(&start, vec![q.clone()]);
//! let again = reduce(&state, vec![q]);
//! assert_eq!(again.len(), 1);
//! ```

mod conversation;

pub use conversation::{reduce, ConversationState};
