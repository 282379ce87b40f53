//! Chat API Handlers

use axum::{Json, extract::State};
use shared::chat::ConversationSummary;

use crate::auth::CurrentUser;
use crate::chat::Conversation;
use crate::core::ServerState;

/// The caller's own conversation
pub async fn my_conversation(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Json<Conversation> {
    Json(state.chat.conversation(&user.id))
}

/// Support inbox, most recently active first
pub async fn list_conversations(
    State(state): State<ServerState>,
) -> Json<Vec<ConversationSummary>> {
    Json(state.chat.list_conversations())
}
