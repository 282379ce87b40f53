//! Order Model

use super::serde_helpers;
use super::{Customer, Product};
use serde::{Deserialize, Serialize};
use shared::order::{OrderStatus, PaymentMethod};
use surrealdb::RecordId;

/// Delivery address captured at checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub line1: String,
    pub line2: Option<String>,
    pub ward: String,
    pub district: String,
    pub city: String,
}

impl ShippingAddress {
    /// Non-empty address components joined by ", "
    pub fn formatted(&self) -> String {
        [
            Some(self.line1.as_str()),
            self.line2.as_deref(),
            Some(self.ward.as_str()),
            Some(self.district.as_str()),
            Some(self.city.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Order line item; sku and name are snapshots taken at checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Weak reference, the product may since have been deleted
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub product_id: Option<RecordId>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub unit_price: i64,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        self.unit_price * self.quantity
    }
}

/// Order document
///
/// Monetary fields are integral VND. Timestamps are Unix millis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub user_id: Option<RecordId>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: i64,
    #[serde(default)]
    pub shipping_fee: i64,
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: i64,
    #[serde(default)]
    pub confirmed_at: Option<i64>,
    #[serde(default)]
    pub shipped_at: Option<i64>,
    #[serde(default)]
    pub delivered_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Order {
    /// "order:key" string, empty for unsaved orders
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Human-facing order reference: the code, or the last 8 chars of the key
    pub fn display_code(&self) -> String {
        if let Some(code) = self.code.as_deref().filter(|c| !c.trim().is_empty()) {
            return code.to_string();
        }
        let key = self
            .id
            .as_ref()
            .map(|id| id.key().to_string())
            .unwrap_or_default();
        let chars: Vec<char> = key.chars().collect();
        chars[chars.len().saturating_sub(8)..].iter().collect()
    }
}

/// Checkout input for a new order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub user_id: Option<RecordId>,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub shipping_fee: i64,
    #[serde(default)]
    pub discount: i64,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub note: Option<String>,
    /// Defaults to the time of creation; set explicitly when importing history
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl OrderCreate {
    /// Build the stored document: pending, unpaid, with computed totals
    pub fn into_order(self, now: i64) -> Result<Order, String> {
        if self.shipping_fee < 0 || self.discount < 0 {
            return Err("shipping_fee and discount must not be negative".to_string());
        }
        if let Some(item) = self
            .items
            .iter()
            .find(|item| item.quantity < 0 || item.unit_price < 0)
        {
            return Err(format!(
                "item {} has a negative quantity or price",
                item.name.as_deref().unwrap_or("N/A")
            ));
        }

        let subtotal: i64 = self.items.iter().map(OrderItem::line_total).sum();
        Ok(Order {
            id: None,
            code: self.code,
            user_id: self.user_id,
            status: OrderStatus::Pending,
            paid: false,
            items: self.items,
            subtotal,
            shipping_fee: self.shipping_fee,
            discount: self.discount,
            total: subtotal + self.shipping_fee - self.discount,
            shipping_address: self.shipping_address,
            payment_method: self.payment_method,
            note: self.note,
            created_at: self.created_at.unwrap_or(now),
            confirmed_at: None,
            shipped_at: None,
            delivered_at: None,
            updated_at: None,
            updated_by: None,
        })
    }
}

/// Partial order update merged into the stored document
///
/// Only status, paid and the bookkeeping stamps are ever written after checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
    pub updated_at: i64,
    pub updated_by: String,
}

/// Order with its customer and products resolved for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub products: Vec<Product>,
}
