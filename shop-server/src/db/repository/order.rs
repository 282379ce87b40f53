//! Order Repository
//!
//! Orders are written once by checkout and afterwards only merged with an
//! [`OrderPatch`]. Reads are by id, by creation window, or paged newest first.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderCreate, OrderPatch};
use serde::Deserialize;
use shared::order::OrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

pub const TABLE: &str = "order";

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Store a new order built from checkout input
    pub async fn create(&self, data: OrderCreate, now: i64) -> RepoResult<Order> {
        let order = data.into_order(now).map_err(RepoError::Validation)?;
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    /// Orders created in `[start, end]` (inclusive millis), oldest first
    ///
    /// Orders sharing a timestamp come back in id order so repeated reads of
    /// the same data agree.
    pub async fn find_created_between(&self, start: i64, end: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE created_at >= $start AND created_at <= $end \
                 ORDER BY created_at ASC, id ASC",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// One page of orders, newest first, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        limit: usize,
        offset: usize,
    ) -> RepoResult<(Vec<Order>, i64)> {
        let (select, count) = match status {
            Some(_) => (
                "SELECT * FROM order WHERE status = $status \
                 ORDER BY created_at DESC LIMIT $limit START $offset",
                "SELECT count() FROM order WHERE status = $status GROUP ALL",
            ),
            None => (
                "SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset",
                "SELECT count() FROM order GROUP ALL",
            ),
        };
        let status = status.map(|s| s.as_str().to_string()).unwrap_or_default();

        let mut result = self
            .base
            .db()
            .query(select)
            .query(count)
            .bind(("status", status))
            .bind(("limit", limit as i64))
            .bind(("offset", offset as i64))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|row| row.count).unwrap_or(0);
        Ok((orders, total))
    }

    /// Merge a patch into an existing order
    ///
    /// Returns `None` when the order does not exist; nothing is written then.
    pub async fn apply_patch(&self, id: &RecordId, patch: OrderPatch) -> RepoResult<Option<Order>> {
        let updated: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("data", patch))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Merge a patch only while the stored status is one of `allowed`
    ///
    /// The status check and the write are one statement, so a status change
    /// committed in between cannot be overwritten. Returns `None` when the
    /// order is missing or its status no longer qualifies.
    pub async fn apply_patch_if_status(
        &self,
        id: &RecordId,
        patch: OrderPatch,
        allowed: &[OrderStatus],
    ) -> RepoResult<Option<Order>> {
        let allowed: Vec<String> = allowed.iter().map(|s| s.as_str().to_string()).collect();
        let updated: Vec<Order> = self
            .base
            .db()
            .query("UPDATE $thing MERGE $data WHERE status IN $allowed RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("data", patch))
            .bind(("allowed", allowed))
            .await?
            .take(0)?;
        Ok(updated.into_iter().next())
    }
}
