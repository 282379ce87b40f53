//! Luxevie shop server - storefront back-office core
//!
//! # Overview
//!
//! - **Orders** (`orders`): status / paid state machine and cancellation
//! - **Reports** (`reports`): monthly aggregation and the Excel export
//! - **Chat** (`chat`): customer support conversations with read receipts
//! - **Database** (`db`): embedded SurrealDB storage
//! - **Auth** (`auth`): JWT bearer authentication and the admin guard
//! - **HTTP API** (`api`): routes and handlers
//!
//! # Layout
//!
//! ```text
//! shop-server/src/
//! ├── core/          # config, state, server, errors
//! ├── auth/          # JWT, guards
//! ├── api/           # HTTP routes and handlers
//! ├── middleware/    # request logging
//! ├── db/            # models and repositories
//! ├── orders/        # order transitions
//! ├── reports/       # monthly reports
//! ├── chat/          # support chat
//! └── utils/         # logging, business calendar
//! ```

pub mod api;
pub mod auth;
pub mod chat;
pub mod core;
pub mod db;
pub mod middleware;
pub mod orders;
pub mod reports;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorResponse};
pub use utils::logger::{cleanup_old_logs, init_logger_with_file};

/// Load `.env` and start logging
///
/// Logging settings are read straight from the environment so that
/// configuration errors later in start-up are logged too.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty());

    init_logger_with_file(&level, json, log_dir.as_deref())
}

pub fn print_banner() {
    println!(
        r#"
    __                     _
   / /   __  ___  _____   _(_)__
  / /   / / / / |/_/ _ \ | / / _ \
 / /___/ /_/ />  </  __/ |/ /  __/
/_____/\__,_/_/|_|\___/|___/\___/
    "#
    );
}
