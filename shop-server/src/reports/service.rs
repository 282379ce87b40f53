//! Report service: one read of the month, then aggregate and render

use super::aggregate::{MonthlySummary, aggregate};
use super::window::MonthWindow;
use super::workbook;
use crate::db::models::{Customer, Order};
use crate::db::repository::{CustomerRepository, OrderRepository};
use shared::error::{AppError, AppResult, ErrorCode};
use std::collections::HashMap;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Finished workbook, ready to be written to a response
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ReportService {
    orders: OrderRepository,
    customers: CustomerRepository,
}

impl ReportService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            customers: CustomerRepository::new(db),
        }
    }

    /// Aggregation only, for the console's JSON view
    pub async fn summary(&self, window: &MonthWindow) -> AppResult<MonthlySummary> {
        let orders = self.load_orders(window).await?;
        Ok(aggregate(window, &orders))
    }

    /// Build the monthly workbook
    ///
    /// Both the detail sheet and the aggregates come from the same read, so
    /// the sheets always agree with each other.
    pub async fn export(&self, window: &MonthWindow) -> AppResult<ReportFile> {
        let orders = self.load_orders(window).await?;
        let summary = aggregate(window, &orders);
        let customers = self.load_customers(&orders).await?;

        let window_copy = *window;
        let bytes = tokio::task::spawn_blocking(move || {
            workbook::render(&window_copy, &summary, &orders, &customers)
        })
        .await
        .map_err(|e| export_failed(e.to_string()))?
        .map_err(|e| export_failed(e.to_string()))?;

        tracing::info!(
            month = window.month,
            year = window.year,
            size = bytes.len(),
            "Monthly report exported"
        );
        Ok(ReportFile {
            file_name: window.file_name(),
            bytes,
        })
    }

    async fn load_orders(&self, window: &MonthWindow) -> AppResult<Vec<Order>> {
        self.orders
            .find_created_between(window.start_millis, window.end_millis)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to read orders for report");
                AppError::from(e)
            })
    }

    /// Accounts referenced by the orders, keyed by `"customer:key"`
    async fn load_customers(&self, orders: &[Order]) -> AppResult<HashMap<String, Customer>> {
        let mut ids: Vec<RecordId> = Vec::new();
        for id in orders.iter().filter_map(|order| order.user_id.as_ref()) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        let customers = self.customers.find_many(ids).await?;
        Ok(customers
            .into_iter()
            .filter_map(|c| Some((c.id.as_ref()?.to_string(), c)))
            .collect())
    }
}

/// Generic client message plus a short description
fn export_failed(error: String) -> AppError {
    tracing::error!(error = %error, "Excel export failed");
    AppError::new(ErrorCode::ReportGenerationFailed).with_detail("error", error)
}
