//! Order service: the status machine wired to storage

use super::transition::{self, OrderUpdate, OrderUpdateRequest};
use crate::auth::CurrentUser;
use crate::db::models::{Order, OrderDetail};
use crate::db::repository::{
    CustomerRepository, OrderRepository, ProductRepository, order, record_id,
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::OrderStatus;
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const DEFAULT_PER_PAGE: u32 = 20;
const MAX_PER_PAGE: u32 = 100;

/// Query params for the admin order list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

/// One page of orders, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    customers: CustomerRepository,
    products: ProductRepository,
}

impl OrderService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            products: ProductRepository::new(db),
        }
    }

    /// Order with customer and products resolved
    pub async fn get_detail(&self, id: &str) -> AppResult<OrderDetail> {
        let order = self.load(&resolve_order_id(id)?, id).await?;
        self.denormalize(order).await
    }

    pub async fn list(&self, query: &OrderListQuery) -> AppResult<OrderPage> {
        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<OrderStatus>().map_err(|_| {
                AppError::with_message(
                    ErrorCode::InvalidOrderStatus,
                    format!("Unknown order status '{}'", raw),
                )
                .with_detail("status", raw)
            })?),
        };
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let offset = (page as usize - 1) * per_page as usize;

        let (items, total) = self.orders.list(status, per_page as usize, offset).await?;
        Ok(OrderPage {
            items,
            total,
            page,
            per_page,
        })
    }

    /// Apply `{status?, paid?}` to an order
    ///
    /// The request is validated before the order is read, so malformed input
    /// never reaches storage.
    pub async fn apply_update(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: &OrderUpdateRequest,
    ) -> AppResult<OrderDetail> {
        let update = OrderUpdate::parse(request)?;
        let thing = resolve_order_id(id)?;
        let current = self.load(&thing, id).await?;

        let patch = transition::plan_update(&current, &update, now_millis(), &actor.id);
        let updated = self
            .orders
            .apply_patch(&thing, patch)
            .await?
            .ok_or_else(|| AppError::order_not_found(id))?;

        tracing::info!(
            order_id = %thing,
            actor = %actor.id,
            from = %current.status,
            to = %updated.status,
            paid = updated.paid,
            "Order updated"
        );
        self.denormalize(updated).await
    }

    /// Cancel an order that is still open
    pub async fn cancel(&self, actor: &CurrentUser, id: &str) -> AppResult<OrderDetail> {
        let thing = resolve_order_id(id)?;
        let current = self.load(&thing, id).await?;
        let patch = transition::plan_cancel(&current, now_millis(), &actor.id)?;

        let updated = match self
            .orders
            .apply_patch_if_status(&thing, patch, &OrderStatus::CANCELLABLE)
            .await?
        {
            Some(order) => order,
            None => {
                // Status moved between the read and the guarded write
                let latest = self.load(&thing, id).await?;
                return Err(AppError::invalid_transition(
                    latest.status.as_str(),
                    OrderStatus::Cancelled.as_str(),
                ));
            }
        };

        tracing::info!(
            order_id = %thing,
            actor = %actor.id,
            from = %current.status,
            to = %updated.status,
            "Order cancelled"
        );
        self.denormalize(updated).await
    }

    async fn load(&self, thing: &RecordId, raw: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(thing)
            .await?
            .ok_or_else(|| AppError::order_not_found(raw))
    }

    async fn denormalize(&self, order: Order) -> AppResult<OrderDetail> {
        let customer = match &order.user_id {
            Some(user_id) => self.customers.find_by_id(user_id).await?,
            None => None,
        };

        let mut product_ids: Vec<RecordId> = Vec::new();
        for id in order.items.iter().filter_map(|item| item.product_id.as_ref()) {
            if !product_ids.contains(id) {
                product_ids.push(id.clone());
            }
        }
        let products = self.products.find_many(product_ids).await?;

        Ok(OrderDetail {
            order,
            customer,
            products,
        })
    }
}

/// Unparseable ids are reported as missing orders
fn resolve_order_id(raw: &str) -> AppResult<RecordId> {
    record_id(order::TABLE, raw).ok_or_else(|| AppError::order_not_found(raw))
}
