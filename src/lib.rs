//! Do-Flow backend
//!
//! Two services built from one crate:
//! - a rule-based Italian chat assistant that guides users through
//!   recording expenses and income one question at a time
//! - a finance API over transactions, clients, accounts and preferences,
//!   with JWT login, analytics and an audit trail
//!
//! CHAT LOOP:
//! MESSAGE → CLASSIFY (or continue active flow) → REPLY → STORE

pub mod amount;
pub mod analytics;
pub mod api;
pub mod audit;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod conversational;
pub mod demo;
pub mod error;
pub mod flow;
pub mod memory;
pub mod models;
pub mod state;

pub use error::Result;

// Re-export common types
pub use classifier::{Intent, IntentClassifier};
pub use conversational::ChatService;
pub use flow::FlowState;
