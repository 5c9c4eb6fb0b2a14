//! Message and History domain types.
//!
//! These are the value objects that flow through the whole client:
//! the user types a message → the context window is selected from
//! History → the server streams back an assistant Message → History is
//! persisted.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions
    System,
}

/// A single message in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// The full, ordered record of all turns in a conversation.
///
/// Append-only during a session: each turn pushes exactly one user
/// message and, after a successful stream, exactly one assistant
/// message. Serialized as `{"messages": [...]}` so chat files written
/// by earlier versions of the client keep loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    /// Ordered messages, insertion order significant
    pub messages: Vec<Message>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the history.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Total characters of content across all messages (used by the CLI
    /// prompt to give a rough sense of conversation size).
    pub fn content_chars(&self) -> usize {
        self.messages.iter().map(|m| m.content.len()).sum()
    }
}
