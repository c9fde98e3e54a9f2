//! Chat session memory
//!
//! Keeps every session's message history and its conversation flow state.

pub mod store;

pub use store::{Session, SessionStore};
