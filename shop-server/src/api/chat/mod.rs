//! Support chat API
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/chat/ws | GET (upgrade) | token in join event |
//! | /api/chat/conversation | GET | customer |
//! | /api/admin/chat/conversations | GET | admin |

mod handler;
mod ws;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/chat", routes())
        .nest("/api/admin/chat", admin_routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/ws", get(ws::handle_chat_ws))
        .route("/conversation", get(handler::my_conversation))
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/conversations", get(handler::list_conversations))
        .route_layer(middleware::from_fn(require_admin))
}
