//! ChatHub: in-process support conversations with read receipts
//!
//! ```text
//! WS session (customer)          WS session (admin)
//!       │ send / mark_read              │ send / mark_read
//!       ▼                               ▼
//! ChatHub
//!   ├── rooms: user_id → Room
//!   │     ├── conversation: messages + admin_has_read / user_has_read
//!   │     └── tx: broadcast to that customer's sessions
//!   └── admin_tx: broadcast to every admin session
//! ```
//!
//! Every event for a conversation goes to its room and to the admin room, so
//! the sender sees its own message echoed back.

use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use shared::chat::{ChatMessage, ChatRole, ConversationSummary, ServerEvent};
use shared::error::{AppError, AppResult, ErrorCode};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::broadcast;
use validator::Validate;

/// Broadcast channel capacity
const BROADCAST_CAPACITY: usize = 256;

pub const MAX_MESSAGE_CHARS: u64 = 2000;

#[derive(Debug, Validate)]
struct MessageContent {
    #[validate(length(min = 1, max = 2000))]
    content: String,
}

/// Read state and history of one customer's conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
    pub admin_has_read: bool,
    pub user_has_read: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            admin_has_read: true,
            user_has_read: true,
        }
    }
}

struct Room {
    messages: VecDeque<ChatMessage>,
    admin_has_read: bool,
    user_has_read: bool,
    updated_at: i64,
    tx: broadcast::Sender<ServerEvent>,
}

impl Room {
    fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            messages: VecDeque::new(),
            admin_has_read: true,
            user_has_read: true,
            updated_at: 0,
            tx,
        }
    }

    fn set_read(&mut self, role: ChatRole, read: bool) {
        match role {
            ChatRole::User => self.user_has_read = read,
            ChatRole::Admin => self.admin_has_read = read,
        }
    }
}

#[derive(Clone)]
pub struct ChatHub {
    rooms: Arc<DashMap<String, Room>>,
    admin_tx: broadcast::Sender<ServerEvent>,
    history_limit: usize,
}

impl ChatHub {
    pub fn new(history_limit: usize) -> Self {
        let (admin_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            rooms: Arc::new(DashMap::new()),
            admin_tx,
            history_limit: history_limit.max(1),
        }
    }

    /// Events for one customer's conversation
    pub fn subscribe_user(&self, user_id: &str) -> broadcast::Receiver<ServerEvent> {
        self.rooms
            .entry(user_id.to_string())
            .or_insert_with(Room::new)
            .tx
            .subscribe()
    }

    /// Events for every conversation
    pub fn subscribe_admin(&self) -> broadcast::Receiver<ServerEvent> {
        self.admin_tx.subscribe()
    }

    /// Snapshot of a conversation; unknown customers get an empty, read one
    pub fn conversation(&self, user_id: &str) -> Conversation {
        match self.rooms.get(user_id) {
            Some(room) => Conversation {
                messages: room.messages.iter().cloned().collect(),
                admin_has_read: room.admin_has_read,
                user_has_read: room.user_has_read,
            },
            None => Conversation::default(),
        }
    }

    /// Post a message into `user_id`'s conversation
    ///
    /// Content is trimmed and must be 1..=2000 characters. The sender's side
    /// becomes read, the other side unread.
    pub fn send(&self, user_id: &str, sender: ChatRole, content: &str) -> AppResult<ChatMessage> {
        let content = MessageContent {
            content: content.trim().to_string(),
        };
        content.validate().map_err(|_| {
            AppError::with_message(
                ErrorCode::ChatInvalidMessage,
                format!("Message must be 1 to {} characters", MAX_MESSAGE_CHARS),
            )
        })?;

        let message = ChatMessage {
            sender,
            content: content.content,
            timestamp: Utc::now().timestamp_millis(),
        };

        let tx = {
            let mut room = self
                .rooms
                .entry(user_id.to_string())
                .or_insert_with(Room::new);
            room.messages.push_back(message.clone());
            while room.messages.len() > self.history_limit {
                room.messages.pop_front();
            }
            room.set_read(sender, true);
            room.set_read(sender.other(), false);
            room.updated_at = message.timestamp;
            room.tx.clone()
        };

        self.publish(
            &tx,
            ServerEvent::ReceiveMessage {
                user_id: user_id.to_string(),
                sender,
                content: message.content.clone(),
                timestamp: message.timestamp,
            },
        );
        Ok(message)
    }

    /// Record that `by` has read the conversation and broadcast the receipt
    pub fn mark_read(&self, user_id: &str, by: ChatRole) {
        let tx = {
            let mut room = self
                .rooms
                .entry(user_id.to_string())
                .or_insert_with(Room::new);
            room.set_read(by, true);
            room.tx.clone()
        };
        self.publish(
            &tx,
            ServerEvent::MessagesRead {
                user_id: user_id.to_string(),
                by,
            },
        );
    }

    /// Inbox rows, most recently active first; rooms without messages are skipped
    pub fn list_conversations(&self) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> = self
            .rooms
            .iter()
            .filter(|entry| !entry.messages.is_empty())
            .map(|entry| ConversationSummary {
                user_id: entry.key().clone(),
                last_message: entry.messages.back().cloned(),
                admin_has_read: entry.admin_has_read,
                user_has_read: entry.user_has_read,
                updated_at: entry.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        summaries
    }

    fn publish(&self, room_tx: &broadcast::Sender<ServerEvent>, event: ServerEvent) {
        // send fails only when nobody is subscribed
        let _ = room_tx.send(event.clone());
        let _ = self.admin_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_flips_read_flags() {
        let hub = ChatHub::new(50);
        hub.send("customer:1", ChatRole::User, "Xin chào").unwrap();
        let conv = hub.conversation("customer:1");
        assert!(conv.user_has_read);
        assert!(!conv.admin_has_read);

        hub.send("customer:1", ChatRole::Admin, "Chào bạn").unwrap();
        let conv = hub.conversation("customer:1");
        assert!(conv.admin_has_read);
        assert!(!conv.user_has_read);
        assert_eq!(conv.messages.len(), 2);
    }

    #[test]
    fn test_mark_read_sets_only_caller_flag() {
        let hub = ChatHub::new(50);
        hub.send("customer:1", ChatRole::User, "hello").unwrap();
        hub.mark_read("customer:1", ChatRole::User);
        assert!(!hub.conversation("customer:1").admin_has_read);

        hub.mark_read("customer:1", ChatRole::Admin);
        assert!(hub.conversation("customer:1").admin_has_read);
    }

    #[test]
    fn test_content_is_trimmed_and_bounded() {
        let hub = ChatHub::new(50);
        let msg = hub.send("customer:1", ChatRole::User, "  hi  ").unwrap();
        assert_eq!(msg.content, "hi");

        let err = hub.send("customer:1", ChatRole::User, "   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ChatInvalidMessage);

        let long = "\u{e9}".repeat(2001);
        assert!(hub.send("customer:1", ChatRole::User, &long).is_err());
        // counted in characters, not bytes
        let max = "\u{e9}".repeat(2000);
        assert!(hub.send("customer:1", ChatRole::User, &max).is_ok());
    }

    #[test]
    fn test_history_is_bounded() {
        let hub = ChatHub::new(3);
        for i in 0..5 {
            hub.send("customer:1", ChatRole::User, &format!("m{i}")).unwrap();
        }
        let contents: Vec<String> = hub
            .conversation("customer:1")
            .messages
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_events_reach_room_and_admins() {
        let hub = ChatHub::new(50);
        let mut user_rx = hub.subscribe_user("customer:1");
        let mut other_rx = hub.subscribe_user("customer:2");
        let mut admin_rx = hub.subscribe_admin();

        hub.send("customer:1", ChatRole::User, "hello").unwrap();
        hub.mark_read("customer:1", ChatRole::Admin);

        for rx in [&mut user_rx, &mut admin_rx] {
            match rx.recv().await.unwrap() {
                ServerEvent::ReceiveMessage { user_id, sender, content, .. } => {
                    assert_eq!(user_id, "customer:1");
                    assert_eq!(sender, ChatRole::User);
                    assert_eq!(content, "hello");
                }
                other => panic!("unexpected event {other:?}"),
            }
            assert_eq!(
                rx.recv().await.unwrap(),
                ServerEvent::MessagesRead {
                    user_id: "customer:1".into(),
                    by: ChatRole::Admin,
                }
            );
        }
        assert!(other_rx.try_recv().is_err());
    }

    #[test]
    fn test_list_conversations_newest_first() {
        let hub = ChatHub::new(50);
        let _rx = hub.subscribe_user("customer:idle");
        hub.send("customer:1", ChatRole::User, "first").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        hub.send("customer:2", ChatRole::User, "second").unwrap();

        let list = hub.list_conversations();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].user_id, "customer:2");
        assert_eq!(list[1].user_id, "customer:1");
        assert_eq!(
            list[0].last_message.as_ref().map(|m| m.content.as_str()),
            Some("second")
        );
        assert!(!list[0].admin_has_read);
    }

    #[test]
    fn test_unknown_conversation_is_empty_and_read() {
        let hub = ChatHub::new(50);
        let conv = hub.conversation("customer:none");
        assert!(conv.messages.is_empty());
        assert!(conv.admin_has_read && conv.user_has_read);
    }
}
