//! In-memory conversation session.
//!
//! A session lives for one run of the chat loop and is dropped with it.
//! Nothing is persisted.

use uuid::Uuid;

use crate::models::{ConversationTurn, Role};

/// Ordered, append-only message history for one chat session.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: Uuid,
    started_at: String,
    turns: Vec<ConversationTurn>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    /// Start an empty session.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: chrono::Utc::now().to_rfc3339(),
            turns: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> &str {
        &self.started_at
    }

    /// Append a single turn.
    pub fn append_turn(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(ConversationTurn::new(role, content));
    }

    /// Append a user message together with its completed assistant reply.
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.append_turn(Role::User, user);
        self.append_turn(Role::Assistant, assistant);
    }

    /// History in chronological order.
    pub fn history(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
