//! Utilities: logging setup and business-timezone time helpers

pub mod logger;
pub mod time;
