//! Shared types for the storefront back-office
//!
//! Types that cross the wire between the server and its clients: the
//! unified error system, order vocabularies, and the chat protocol.

pub mod chat;
pub mod error;
pub mod order;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
