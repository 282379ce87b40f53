//! Repository Module
//!
//! Typed access to the SurrealDB tables.

pub mod customer;
pub mod order;
pub mod product;

// Re-exports
pub use customer::CustomerRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;

use shared::error::AppError;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID convention: "table:id" strings on the wire, RecordId inside
// =============================================================================
//
//   - parse:  record_id(TABLE, "order:abc") or record_id(TABLE, "abc")
//   - create: RecordId::from_table_key("order", "abc")
//   - CRUD:   bind the RecordId, never format it into SurrealQL

/// Resolve a client-supplied id against `table`
///
/// Accepts `"table:key"` or a bare key. Returns `None` for empty keys and for
/// ids that name a different table.
pub fn record_id(table: &str, raw: &str) -> Option<RecordId> {
    let raw = raw.trim();
    let key = match raw.split_once(':') {
        Some((prefix, key)) if prefix == table => key,
        Some(_) => return None,
        None => raw,
    };
    if key.is_empty() {
        return None;
    }
    Some(RecordId::from_table_key(table, key))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
