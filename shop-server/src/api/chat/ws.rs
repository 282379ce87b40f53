//! Chat WebSocket endpoint
//!
//! GET /api/chat/ws
//!
//! - Client → Server: `ClientEvent` (join_user, join_admin, send_message, mark_read)
//! - Server → Client: `ServerEvent` (joined, receive_message, messages_read, error)
//!
//! Browsers cannot attach headers to the upgrade request, so the socket
//! authenticates through the token in its join event.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::chat::ServerEvent;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::chat::ChatSession;
use crate::core::ServerState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

pub async fn handle_chat_ws(
    State(state): State<ServerState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| chat_ws_session(socket, state))
}

async fn chat_ws_session(socket: WebSocket, state: ServerState) {
    let (mut sink, mut stream) = socket.split();
    let mut session = ChatSession::new(state.chat.clone(), state.jwt_service.clone());
    let mut hub_rx: Option<broadcast::Receiver<ServerEvent>> = None;

    tracing::debug!("Chat WS connected");

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(vec![].into())).await.is_err() {
                    break;
                }
            }

            event = next_hub_event(&mut hub_rx) => {
                match event {
                    Ok(event) => {
                        if send_message(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "Chat subscriber lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let outcome = session.handle_text(text.as_str());
                        if let Some(rx) = outcome.subscription {
                            hub_rx = Some(rx);
                        }
                        if let Some(reply) = outcome.reply
                            && send_message(&mut sink, &reply).await.is_err()
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    match session.identity() {
        Some((account, role)) => tracing::info!(account = %account, role = %role, "Chat WS disconnected"),
        None => tracing::debug!("Chat WS disconnected before joining"),
    }
}

/// Pending forever until the socket has joined
async fn next_hub_event(
    rx: &mut Option<broadcast::Receiver<ServerEvent>>,
) -> Result<ServerEvent, broadcast::error::RecvError> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn send_message<S>(sink: &mut S, msg: &ServerEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
