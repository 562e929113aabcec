//! Conversation turn models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Avatar shown next to the role in a transcript.
    pub fn avatar(&self) -> &'static str {
        match self {
            Role::User => "👨‍💻",
            Role::Assistant => "🤖",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the session history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// RFC 3339 timestamp of when the turn was appended
    pub created_at: String,
}

impl ConversationTurn {
    /// Create a turn stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
