//! Order status machine
//!
//! Pure planning: given the stored order and a requested change, produce the
//! [`OrderPatch`] to merge. Nothing here touches storage.
//!
//! Any status may be set to any other (administrators correct mis-clicks this
//! way). Only the cancel shortcut is restricted, to
//! [`OrderStatus::CANCELLABLE`].

use crate::db::models::{Order, OrderPatch};
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::{Milestone, OrderStatus};

/// Raw `{status?, paid?}` body as sent by the console
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdateRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
}

/// Validated status/paid change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub paid: Option<bool>,
}

impl OrderUpdate {
    /// Validate a request body; runs before any storage access
    pub fn parse(req: &OrderUpdateRequest) -> AppResult<Self> {
        let status = req
            .status
            .as_deref()
            .map(|raw| {
                raw.trim().parse::<OrderStatus>().map_err(|_| {
                    AppError::with_message(
                        ErrorCode::InvalidOrderStatus,
                        format!("Unknown order status '{}'", raw),
                    )
                    .with_detail("status", raw)
                })
            })
            .transpose()?;

        if status.is_none() && req.paid.is_none() {
            return Err(AppError::new(ErrorCode::EmptyOrderUpdate));
        }
        Ok(Self {
            status,
            paid: req.paid,
        })
    }

    pub fn cancel() -> Self {
        Self {
            status: Some(OrderStatus::Cancelled),
            paid: None,
        }
    }
}

/// Patch applying `update` to `order` at `now` on behalf of `actor`
///
/// A milestone timestamp is stamped the first time its status is reached and
/// never moved afterwards.
pub fn plan_update(order: &Order, update: &OrderUpdate, now: i64, actor: &str) -> OrderPatch {
    let mut patch = OrderPatch {
        status: update.status,
        paid: update.paid,
        updated_at: now,
        updated_by: actor.to_string(),
        ..Default::default()
    };

    match update.status.and_then(|s| s.milestone()) {
        Some(Milestone::Confirmed) if order.confirmed_at.is_none() => {
            patch.confirmed_at = Some(now)
        }
        Some(Milestone::Shipped) if order.shipped_at.is_none() => patch.shipped_at = Some(now),
        Some(Milestone::Delivered) if order.delivered_at.is_none() => {
            patch.delivered_at = Some(now)
        }
        _ => {}
    }
    patch
}

/// Patch cancelling `order`, or `InvalidStatusTransition` from a closed status
pub fn plan_cancel(order: &Order, now: i64, actor: &str) -> AppResult<OrderPatch> {
    if !order.status.is_cancellable() {
        return Err(AppError::invalid_transition(
            order.status.as_str(),
            OrderStatus::Cancelled.as_str(),
        ));
    }
    Ok(plan_update(order, &OrderUpdate::cancel(), now, actor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderCreate;

    fn order_with(status: OrderStatus) -> Order {
        let mut order = OrderCreate::default().into_order(1_000).unwrap();
        order.status = status;
        order
    }

    fn request(status: Option<&str>, paid: Option<bool>) -> OrderUpdateRequest {
        OrderUpdateRequest {
            status: status.map(String::from),
            paid,
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        let err = OrderUpdate::parse(&request(Some("lost"), None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidOrderStatus);
        assert_eq!(err.details.unwrap().get("status").unwrap(), "lost");
    }

    #[test]
    fn test_parse_requires_a_field() {
        let err = OrderUpdate::parse(&request(None, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyOrderUpdate);

        let update = OrderUpdate::parse(&request(None, Some(true))).unwrap();
        assert_eq!(update.status, None);
        assert_eq!(update.paid, Some(true));
    }

    #[test]
    fn test_parse_trims_status() {
        let update = OrderUpdate::parse(&request(Some(" shipped "), None)).unwrap();
        assert_eq!(update.status, Some(OrderStatus::Shipped));
    }

    #[test]
    fn test_first_shipment_stamps_shipped_at() {
        let order = order_with(OrderStatus::Processing);
        let update = OrderUpdate {
            status: Some(OrderStatus::Shipped),
            paid: None,
        };
        let patch = plan_update(&order, &update, 5_000, "customer:admin");
        assert_eq!(patch.status, Some(OrderStatus::Shipped));
        assert_eq!(patch.shipped_at, Some(5_000));
        assert_eq!(patch.confirmed_at, None);
        assert_eq!(patch.updated_at, 5_000);
        assert_eq!(patch.updated_by, "customer:admin");
    }

    #[test]
    fn test_repeat_shipment_keeps_shipped_at() {
        let mut order = order_with(OrderStatus::Pending);
        order.shipped_at = Some(2_000);
        let update = OrderUpdate {
            status: Some(OrderStatus::Shipped),
            paid: None,
        };
        let patch = plan_update(&order, &update, 9_000, "a");
        assert_eq!(patch.shipped_at, None);
    }

    #[test]
    fn test_any_status_may_be_set_backwards() {
        let order = order_with(OrderStatus::Delivered);
        let update = OrderUpdate {
            status: Some(OrderStatus::Pending),
            paid: Some(false),
        };
        let patch = plan_update(&order, &update, 1, "a");
        assert_eq!(patch.status, Some(OrderStatus::Pending));
        assert_eq!(patch.paid, Some(false));
    }

    #[test]
    fn test_cancel_allowed_from_open_statuses() {
        for status in OrderStatus::CANCELLABLE {
            let patch = plan_cancel(&order_with(status), 1, "a").unwrap();
            assert_eq!(patch.status, Some(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_cancel_rejected_from_closed_statuses() {
        for status in [
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            OrderStatus::Refunded,
        ] {
            let err = plan_cancel(&order_with(status), 1, "a").unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        }
    }
}
