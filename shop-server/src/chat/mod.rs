//! Customer support chat
//!
//! Conversations live in [`ChatHub`]; [`ChatSession`] applies the socket
//! protocol for one connection. The WebSocket transport is in `api::chat`.

pub mod hub;
pub mod session;

pub use hub::{ChatHub, Conversation};
pub use session::{ChatSession, Outcome};
