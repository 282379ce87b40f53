//! Support chat WebSocket protocol
//!
//! Client → Server: [`ClientEvent`]
//! Server → Client: [`ServerEvent`]
//!
//! Frames are JSON objects of the form `{"event": "<name>", "data": {...}}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side of a support conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Admin,
}

impl ChatRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Admin => "admin",
        }
    }

    pub const fn other(&self) -> ChatRole {
        match self {
            ChatRole::User => ChatRole::Admin,
            ChatRole::Admin => ChatRole::User,
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: ChatRole,
    pub content: String,
    /// Unix millis
    pub timestamp: i64,
}

/// Client → Server events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Customer joins their own conversation
    JoinUser { token: String },
    /// Administrator joins the support inbox
    JoinAdmin { token: String },
    SendMessage {
        #[serde(default)]
        token: Option<String>,
        role: ChatRole,
        content: String,
        /// Conversation to post into (admins only)
        #[serde(default)]
        user_id: Option<String>,
    },
    MarkRead {
        #[serde(default)]
        token: Option<String>,
        role: ChatRole,
        /// Conversation being read (admins only)
        #[serde(default)]
        user_id: Option<String>,
    },
}

/// Server → Client events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Join accepted; customers receive their conversation history
    Joined {
        role: ChatRole,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
        #[serde(default)]
        history: Vec<ChatMessage>,
    },
    ReceiveMessage {
        user_id: String,
        sender: ChatRole,
        content: String,
        timestamp: i64,
    },
    /// Read receipt: `by` has read every message in the conversation
    MessagesRead { user_id: String, by: ChatRole },
    Error { code: u16, message: String },
}

/// Inbox row for the admin console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<ChatMessage>,
    pub admin_has_read: bool,
    pub user_has_read: bool,
    pub updated_at: i64,
}
