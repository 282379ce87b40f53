use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::chat::ChatHub;
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::orders::OrderService;
use crate::reports::ReportService;

/// Shared server state
///
/// Cheap to clone: the database handle, JWT service and chat hub are all
/// reference counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub chat: ChatHub,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let chat = ChatHub::new(config.chat_history_limit);
        Self {
            config,
            db,
            jwt_service,
            chat,
        }
    }

    /// Create the work directory and open the database under it
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db_dir = config.database_dir();
        std::fs::create_dir_all(&db_dir)?;

        let db_service = DbService::new(&db_dir).await?;
        Ok(Self::new(config.clone(), db_service.db))
    }

    pub fn order_service(&self) -> OrderService {
        OrderService::new(self.db.clone())
    }

    pub fn report_service(&self) -> ReportService {
        ReportService::new(self.db.clone())
    }
}
