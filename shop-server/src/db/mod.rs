//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) holding orders, customers and products.

pub mod models;
pub mod repository;

use shared::error::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "luxevie";
const DATABASE: &str = "shop";

/// Database service, owns the embedded store handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the store at `path` and select the shop database
    pub async fn new(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let db: Surreal<Db> = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select database: {e}")))?;

        tracing::info!(path = %path.display(), "Database connection established (SurrealDB RocksDB)");
        Ok(Self { db })
    }
}
