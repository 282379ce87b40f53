//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Customer, CustomerCreate};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

pub const TABLE: &str = "customer";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a customer account
    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        let customer = Customer::from(data);
        let created: Option<Customer> = self.base.db().create(TABLE).content(customer).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    /// Find customer by id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Customer>> {
        let customer: Option<Customer> = self.base.db().select(id.clone()).await?;
        Ok(customer)
    }

    /// Batch lookup; ids that do not resolve are simply absent from the result
    pub async fn find_many(&self, ids: Vec<RecordId>) -> RepoResult<Vec<Customer>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE id IN $ids")
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(customers)
    }
}
