//! Session identity and rolling conversation history.

use std::collections::VecDeque;

use chrono::Utc;
use uuid::Uuid;

use crate::message::{Role, Turn, WireTurn};

/// Number of turns kept as conversation context.
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// The conversation owned by one widget instance.
///
/// `ChatSession` holds:
/// - A session id generated once at construction and never rotated
/// - A bounded, insertion-ordered history of turns (oldest evicted first)
///
/// Nothing here is persisted; the session lives as long as its widget.
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    history: VecDeque<Turn>,
    max_history: usize,
}

impl ChatSession {
    /// Creates a session with a fresh id and an empty history.
    ///
    /// A `max_history` of zero is treated as one so the latest turn is
    /// always available as context.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley_core::session::ChatSession;
    ///
    /// let session = ChatSession::new(20);
    /// assert!(session.id().starts_with("session_"));
    /// assert!(session.is_empty());
    /// ```
    pub fn new(max_history: usize) -> Self {
        let max_history = max_history.max(1);
        let session = Self {
            id: generate_session_id(),
            history: VecDeque::with_capacity(max_history + 1),
            max_history,
        };
        tracing::debug!(target: "parley::session", session_id = %session.id, "Session created");
        session
    }

    /// The opaque session identifier sent with every request.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Upper bound on the number of retained turns.
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Appends a turn stamped with the current time, evicting the oldest
    /// turns until the history fits the bound again.
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.history.push_back(Turn::now(role, content));
        while self.history.len() > self.max_history {
            self.history.pop_front();
        }
    }

    /// Returns the last `limit` turns in chronological order.
    pub fn recent_history(&self, limit: usize) -> Vec<Turn> {
        let skip = self.history.len().saturating_sub(limit);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Full bounded history in wire form, as sent with each request.
    pub fn wire_history(&self) -> Vec<WireTurn> {
        let skip = self.history.len().saturating_sub(self.max_history);
        self.history.iter().skip(skip).map(WireTurn::from).collect()
    }

    /// The most recently appended turn, if any.
    pub fn last_turn(&self) -> Option<&Turn> {
        self.history.back()
    }

    /// Iterates the retained turns, oldest first.
    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.history.iter()
    }

    /// Empties the history. The session id is kept.
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

/// `session_<unix millis>_<uuid>`: sortable by creation time, collision-resistant.
fn generate_session_id() -> String {
    format!(
        "session_{}_{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}
