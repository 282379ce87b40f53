//! Per-connection chat protocol state
//!
//! A socket starts unjoined. `join_user` / `join_admin` authenticate the
//! connection and fix its role; every later event is checked against it.

use shared::chat::{ChatRole, ClientEvent, ServerEvent};
use shared::error::{AppError, AppResult, ErrorCode};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::ChatHub;
use crate::auth::CurrentUser;
use crate::auth::JwtService;
use crate::auth::middleware::verify_token;
use crate::security_log;

const SOCKET_PATH: &str = "/api/chat/ws";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Joined {
    account_id: String,
    role: ChatRole,
}

/// What the socket loop should do after an event
#[derive(Debug, Default)]
pub struct Outcome {
    /// Sent to this socket only
    pub reply: Option<ServerEvent>,
    /// Replaces the socket's hub subscription
    pub subscription: Option<broadcast::Receiver<ServerEvent>>,
}

impl Outcome {
    fn silent() -> Self {
        Self::default()
    }
}

pub struct ChatSession {
    hub: ChatHub,
    jwt_service: Arc<JwtService>,
    joined: Option<Joined>,
}

impl ChatSession {
    pub fn new(hub: ChatHub, jwt_service: Arc<JwtService>) -> Self {
        Self {
            hub,
            jwt_service,
            joined: None,
        }
    }

    /// Joined account id and role, if any
    pub fn identity(&self) -> Option<(&str, ChatRole)> {
        self.joined
            .as_ref()
            .map(|j| (j.account_id.as_str(), j.role))
    }

    /// Parse and handle one text frame
    ///
    /// Protocol errors are turned into an `error` event for the sender; the
    /// connection stays open.
    pub fn handle_text(&mut self, text: &str) -> Outcome {
        let result = serde_json::from_str::<ClientEvent>(text)
            .map_err(|e| AppError::invalid_request(format!("Malformed chat event: {e}")))
            .and_then(|event| self.handle(event));

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::debug!(code = err.code.code(), message = %err.message, "Chat event rejected");
                Outcome {
                    reply: Some(error_event(&err)),
                    subscription: None,
                }
            }
        }
    }

    pub fn handle(&mut self, event: ClientEvent) -> AppResult<Outcome> {
        match event {
            ClientEvent::JoinUser { token } => {
                let user = self.verify(&token)?;
                let subscription = self.hub.subscribe_user(&user.id);
                let history = self.hub.conversation(&user.id).messages;
                tracing::info!(user_id = %user.id, "Customer joined chat");
                self.joined = Some(Joined {
                    account_id: user.id.clone(),
                    role: ChatRole::User,
                });
                Ok(Outcome {
                    reply: Some(ServerEvent::Joined {
                        role: ChatRole::User,
                        user_id: Some(user.id),
                        history,
                    }),
                    subscription: Some(subscription),
                })
            }
            ClientEvent::JoinAdmin { token } => {
                let user = self.verify(&token)?;
                if !user.is_admin() {
                    security_log!(WARN, "chat_admin_join_denied", user_id = %user.id, role = %user.role);
                    return Err(AppError::admin_required());
                }
                tracing::info!(admin_id = %user.id, "Admin joined chat");
                self.joined = Some(Joined {
                    account_id: user.id,
                    role: ChatRole::Admin,
                });
                Ok(Outcome {
                    reply: Some(ServerEvent::Joined {
                        role: ChatRole::Admin,
                        user_id: None,
                        history: Vec::new(),
                    }),
                    subscription: Some(self.hub.subscribe_admin()),
                })
            }
            ClientEvent::SendMessage {
                token,
                role,
                content,
                user_id,
            } => {
                let conversation = self.resolve(token.as_deref(), role, user_id.as_deref())?;
                self.hub.send(&conversation, role, &content)?;
                Ok(Outcome::silent())
            }
            ClientEvent::MarkRead {
                token,
                role,
                user_id,
            } => {
                let conversation = self.resolve(token.as_deref(), role, user_id.as_deref())?;
                self.hub.mark_read(&conversation, role);
                Ok(Outcome::silent())
            }
        }
    }

    fn verify(&self, token: &str) -> AppResult<CurrentUser> {
        verify_token(token, SOCKET_PATH, &self.jwt_service)
    }

    /// Check an event against the joined identity and pick its conversation
    fn resolve(
        &self,
        token: Option<&str>,
        role: ChatRole,
        user_id: Option<&str>,
    ) -> AppResult<String> {
        let joined = self
            .joined
            .as_ref()
            .ok_or_else(|| AppError::new(ErrorCode::ChatNotJoined))?;

        if role != joined.role {
            return Err(AppError::new(ErrorCode::ChatRoleMismatch)
                .with_detail("joined", joined.role.as_str())
                .with_detail("claimed", role.as_str()));
        }

        if let Some(token) = token {
            let user = self.verify(token)?;
            if user.id != joined.account_id {
                security_log!(WARN, "chat_token_mismatch", joined = %joined.account_id, token_user = %user.id);
                return Err(AppError::new(ErrorCode::ChatRoleMismatch));
            }
        }

        let target = user_id.map(str::trim).filter(|id| !id.is_empty());
        match joined.role {
            ChatRole::User => match target {
                Some(other) if other != joined.account_id => {
                    Err(AppError::new(ErrorCode::ChatRoleMismatch).with_detail("user_id", other))
                }
                _ => Ok(joined.account_id.clone()),
            },
            ChatRole::Admin => target.map(str::to_string).ok_or_else(|| {
                AppError::with_message(ErrorCode::ChatInvalidMessage, "user_id is required")
                    .with_detail("field", "user_id")
            }),
        }
    }
}

pub fn error_event(err: &AppError) -> ServerEvent {
    ServerEvent::Error {
        code: err.code.code(),
        message: err.message.clone(),
    }
}
