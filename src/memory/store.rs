//! Chat session storage
//!
//! Sessions are created lazily on first message and live for the lifetime
//! of the process. Messages are append-only.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::flow::FlowState;
use crate::models::{Message, SessionSummary};

/// Longest `lastMessage` preview before it gets an ellipsis
const PREVIEW_CHARS: usize = 50;

/// One conversation thread
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    /// Creation order, used to list sessions deterministically
    seq: u64,
    messages: Vec<Message>,
    flow: FlowState,
}

impl Session {
    fn new(session_id: String, seq: u64) -> Self {
        Self {
            session_id,
            seq,
            messages: Vec::new(),
            flow: FlowState::Idle,
        }
    }

    /// Add a message at the end. Earlier messages are never touched.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn flow(&self) -> &FlowState {
        &self.flow
    }

    pub fn set_flow(&mut self, flow: FlowState) {
        self.flow = flow;
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        let last = self.last_message()?;

        Some(SessionSummary {
            session_id: self.session_id.clone(),
            last_message: preview(&last.text),
            last_activity: last.timestamp,
            message_count: self.message_count(),
        })
    }
}

/// Truncate to `PREVIEW_CHARS` characters, appending "..." when cut
pub fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let mut cut: String = text.chars().take(PREVIEW_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

struct Sessions {
    by_id: HashMap<String, Session>,
    next_seq: u64,
}

/// Process-wide session store
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Sessions>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Sessions {
                by_id: HashMap::new(),
                next_seq: 0,
            })),
        }
    }

    /// Run `f` against the session, creating it if needed.
    ///
    /// The write lock is held for the whole call, so everything `f` does to
    /// one session is serialized with other callers.
    pub async fn with_session<F, R>(&self, session_id: &str, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut locked = self.inner.write().await;
        let Sessions { by_id, next_seq } = &mut *locked;

        let session = by_id.entry(session_id.to_string()).or_insert_with(|| {
            let seq = *next_seq;
            *next_seq += 1;
            Session::new(session_id.to_string(), seq)
        });

        f(session)
    }

    /// Messages of a session in append order; empty for unknown sessions
    pub async fn history(&self, session_id: &str) -> Vec<Message> {
        let locked = self.inner.read().await;
        locked
            .by_id
            .get(session_id)
            .map(|session| session.messages().to_vec())
            .unwrap_or_default()
    }

    /// Summaries of every non-empty session, in creation order
    pub async fn summaries(&self) -> Vec<SessionSummary> {
        let locked = self.inner.read().await;

        let mut sessions: Vec<&Session> = locked.by_id.values().collect();
        sessions.sort_by_key(|session| session.seq);

        sessions.into_iter().filter_map(Session::summary).collect()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
