use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};
use crate::utils::time::{DEFAULT_TIMEZONE, parse_timezone};
use chrono_tz::Tz;
use std::path::PathBuf;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./work_dir | database and log root |
/// | HTTP_PORT | 5000 | HTTP listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | BUSINESS_TIMEZONE | Asia/Ho_Chi_Minh | calendar for report months and dates |
/// | LOG_LEVEL | info | default log filter (`RUST_LOG` wins) |
/// | LOG_JSON | false | JSON console logs |
/// | LOG_DIR | unset | enables file logging |
/// | CHAT_HISTORY_LIMIT | 200 | messages kept per conversation |
/// | JWT_SECRET, JWT_ISSUER, JWT_AUDIENCE, JWT_EXPIRATION_MINUTES | | see [`JwtConfig`] |
///
/// ```ignore
/// WORK_DIR=/data/luxevie HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub business_timezone: Tz,
    pub jwt: JwtConfig,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub chat_history_limit: usize,
}

impl Config {
    /// Load configuration from the environment, with defaults
    pub fn from_env() -> Result<Self> {
        let jwt = JwtConfig::from_env().map_err(|e| ServerError::Config(e.to_string()))?;
        Ok(Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            business_timezone: std::env::var("BUSINESS_TIMEZONE")
                .map(|tz| parse_timezone(&tz))
                .unwrap_or(DEFAULT_TIMEZONE),
            jwt,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            chat_history_limit: std::env::var("CHAT_HISTORY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
        })
    }

    /// Defaults without reading the environment
    ///
    /// Used by tests and tooling that supply their own JWT settings.
    pub fn with_overrides(work_dir: impl Into<String>, jwt: JwtConfig) -> Self {
        Self {
            work_dir: work_dir.into(),
            http_port: 5000,
            environment: "development".into(),
            business_timezone: DEFAULT_TIMEZONE,
            jwt,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            chat_history_limit: 200,
        }
    }

    /// Embedded database directory
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
