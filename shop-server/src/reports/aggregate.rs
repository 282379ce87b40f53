//! Monthly aggregation engine
//!
//! Pure projection of a month's orders into daily revenue and per-product
//! unit totals. The caller supplies the orders; nothing here reads storage.

use super::window::MonthWindow;
use crate::db::models::Order;
use crate::utils::time::format_date;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placeholder for missing names and SKUs
pub const NOT_AVAILABLE: &str = "N/A";

/// Raw `(product_id, sku, name)` of a line item
type ProductKey<'a> = (Option<String>, Option<&'a str>, Option<&'a str>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    /// Day of month, 1-based
    pub day: u32,
    /// `dd/mm/yyyy`
    pub date: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTotal {
    #[serde(default)]
    pub product_id: Option<String>,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: u32,
    pub year: i32,
    pub order_count: usize,
    /// One entry per calendar day, zero-revenue days included
    pub daily_revenue: Vec<DailyRevenue>,
    /// Sorted by quantity, highest first
    pub product_totals: Vec<ProductTotal>,
    pub total_revenue: i64,
    pub total_units: i64,
}

/// Aggregate `orders` over `window`
///
/// Orders outside the window are ignored. Every status counts towards
/// revenue, cancelled and refunded included (gross bookings); the report has
/// never reconciled them out and the console relies on that figure.
///
/// Products are grouped by their stored `(product_id, sku, name)` in
/// first-seen order, scanning orders by `created_at` then line order; the
/// stable sort keeps that order among equal quantities. The `N/A`
/// placeholder only replaces missing values in the output rows.
pub fn aggregate(window: &MonthWindow, orders: &[Order]) -> MonthlySummary {
    let mut daily_revenue: Vec<DailyRevenue> = window
        .dates()
        .zip(1..)
        .map(|(date, day)| DailyRevenue {
            day,
            date: format_date(date),
            revenue: 0,
        })
        .collect();

    let mut in_window: Vec<&Order> = orders
        .iter()
        .filter(|order| window.contains(order.created_at))
        .collect();
    in_window.sort_by_key(|order| order.created_at);

    let mut product_totals: Vec<ProductTotal> = Vec::new();
    let mut product_index: HashMap<ProductKey<'_>, usize> = HashMap::new();
    for order in &in_window {
        if let Some(slot) = window
            .day_of(order.created_at)
            .and_then(|day| daily_revenue.get_mut(day as usize - 1))
        {
            slot.revenue += order.total;
        }

        for item in &order.items {
            let key = (
                item.product_id.as_ref().map(|id| id.to_string()),
                item.sku.as_deref(),
                item.name.as_deref(),
            );
            match product_index.get(&key) {
                Some(&idx) => product_totals[idx].quantity += item.quantity,
                None => {
                    product_totals.push(ProductTotal {
                        product_id: key.0.clone(),
                        sku: non_empty_or_placeholder(key.1),
                        name: non_empty_or_placeholder(key.2),
                        quantity: item.quantity,
                    });
                    product_index.insert(key, product_totals.len() - 1);
                }
            }
        }
    }
    product_totals.sort_by(|a, b| b.quantity.cmp(&a.quantity));

    let total_revenue = daily_revenue.iter().map(|d| d.revenue).sum();
    let total_units = product_totals.iter().map(|p| p.quantity).sum();

    MonthlySummary {
        month: window.month,
        year: window.year,
        order_count: in_window.len(),
        daily_revenue,
        product_totals,
        total_revenue,
        total_units,
    }
}

fn non_empty_or_placeholder(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{OrderCreate, OrderItem};
    use crate::utils::time::{DEFAULT_TIMEZONE as VN, day_start_millis};
    use chrono::NaiveDate;
    use shared::order::OrderStatus;
    use surrealdb::RecordId;

    const HOUR: i64 = 3_600_000;

    fn at(year: i32, month: u32, day: u32, hour: i64) -> i64 {
        day_start_millis(NaiveDate::from_ymd_opt(year, month, day).unwrap(), VN) + hour * HOUR
    }

    fn item(product: &str, sku: &str, name: &str, quantity: i64) -> OrderItem {
        OrderItem {
            product_id: Some(RecordId::from_table_key("product", product)),
            sku: Some(sku.to_string()),
            name: Some(name.to_string()),
            unit_price: 100_000,
            quantity,
            size: None,
            color: None,
        }
    }

    fn order(created_at: i64, total: i64, items: Vec<OrderItem>) -> Order {
        let mut order = OrderCreate {
            items,
            created_at: Some(created_at),
            ..Default::default()
        }
        .into_order(0)
        .unwrap();
        order.total = total;
        order
    }

    #[test]
    fn test_empty_month_has_zero_days() {
        let window = MonthWindow::new(2, 2024, VN).unwrap();
        let summary = aggregate(&window, &[]);
        assert_eq!(summary.daily_revenue.len(), 29);
        assert!(summary.daily_revenue.iter().all(|d| d.revenue == 0));
        assert_eq!(
            summary.daily_revenue.iter().map(|d| d.day).collect::<Vec<_>>(),
            (1..=29).collect::<Vec<_>>()
        );
        assert_eq!(summary.daily_revenue[0].date, "01/02/2024");
        assert!(summary.product_totals.is_empty());
        assert_eq!(summary.total_revenue, 0);
        assert_eq!(summary.total_units, 0);
        assert_eq!(summary.order_count, 0);
    }

    #[test]
    fn test_same_day_orders_sum() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        let orders = vec![
            order(at(2024, 3, 5, 9), 500_000, vec![]),
            order(at(2024, 3, 5, 20), 300_000, vec![]),
            order(at(2024, 3, 6, 0), 100_000, vec![]),
        ];
        let summary = aggregate(&window, &orders);
        assert_eq!(summary.daily_revenue[4].day, 5);
        assert_eq!(summary.daily_revenue[4].revenue, 800_000);
        assert_eq!(summary.daily_revenue[5].revenue, 100_000);
        assert_eq!(summary.total_revenue, 900_000);
        assert_eq!(summary.order_count, 3);
    }

    #[test]
    fn test_orders_outside_window_are_ignored() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        let orders = vec![
            order(window.start_millis - 1, 1_000, vec![item("p1", "A", "Áo", 1)]),
            order(window.end_millis + 1, 2_000, vec![item("p1", "A", "Áo", 1)]),
            order(window.end_millis, 3_000, vec![item("p1", "A", "Áo", 2)]),
        ];
        let summary = aggregate(&window, &orders);
        assert_eq!(summary.order_count, 1);
        assert_eq!(summary.total_revenue, 3_000);
        assert_eq!(summary.daily_revenue[30].revenue, 3_000);
        assert_eq!(summary.total_units, 2);
    }

    #[test]
    fn test_cancelled_orders_count_towards_revenue() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        let mut cancelled = order(at(2024, 3, 1, 10), 250_000, vec![]);
        cancelled.status = OrderStatus::Cancelled;
        let mut refunded = order(at(2024, 3, 1, 11), 50_000, vec![]);
        refunded.status = OrderStatus::Refunded;

        let summary = aggregate(&window, &[cancelled, refunded]);
        assert_eq!(summary.daily_revenue[0].revenue, 300_000);
    }

    #[test]
    fn test_product_totals_grouped_and_sorted() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        let orders = vec![
            order(
                at(2024, 3, 2, 8),
                0,
                vec![item("p1", "TS-01", "Áo thun", 1), item("p2", "QJ-02", "Quần jean", 2)],
            ),
            order(
                at(2024, 3, 3, 8),
                0,
                vec![item("p1", "TS-01", "Áo thun", 3), item("p3", "MU-03", "Mũ", 2)],
            ),
        ];
        let summary = aggregate(&window, &orders);
        let rows: Vec<(&str, i64)> = summary
            .product_totals
            .iter()
            .map(|p| (p.name.as_str(), p.quantity))
            .collect();
        // p2 and p3 tie at 2; p2 was seen first
        assert_eq!(rows, vec![("Áo thun", 4), ("Quần jean", 2), ("Mũ", 2)]);
        assert_eq!(summary.total_units, 8);
        assert_eq!(
            summary.product_totals[0].product_id.as_deref(),
            Some("product:p1")
        );
    }

    #[test]
    fn test_tie_order_follows_creation_time_not_input_order() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        let later = order(at(2024, 3, 9, 8), 0, vec![item("p2", "B", "Beta", 1)]);
        let earlier = order(at(2024, 3, 1, 8), 0, vec![item("p1", "A", "Alpha", 1)]);
        let summary = aggregate(&window, &[later, earlier]);
        assert_eq!(summary.product_totals[0].name, "Alpha");
        assert_eq!(summary.product_totals[1].name, "Beta");
    }

    #[test]
    fn test_missing_name_and_sku_use_placeholder() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        let mut bare = item("p9", "", "", 5);
        bare.sku = None;
        bare.name = Some("  ".into());
        let summary = aggregate(&window, &[order(at(2024, 3, 4, 1), 0, vec![bare])]);
        assert_eq!(summary.product_totals[0].name, NOT_AVAILABLE);
        assert_eq!(summary.product_totals[0].sku, NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_and_blank_names_stay_separate() {
        let window = MonthWindow::new(3, 2024, VN).unwrap();
        let mut missing = item("p9", "X-9", "", 1);
        missing.name = None;
        let blank = item("p9", "X-9", " ", 5);
        let named = item("p9", "X-9", "Khăn", 3);
        let summary = aggregate(
            &window,
            &[order(
                at(2024, 3, 4, 1),
                0,
                vec![missing.clone(), blank, named, missing],
            )],
        );
        let rows: Vec<(&str, i64)> = summary
            .product_totals
            .iter()
            .map(|p| (p.name.as_str(), p.quantity))
            .collect();
        // blank (5) and missing (1 + 1) are different products
        assert_eq!(
            rows,
            vec![(NOT_AVAILABLE, 5), ("Khăn", 3), (NOT_AVAILABLE, 2)]
        );
        assert_eq!(summary.total_units, 10);
    }

    #[test]
    fn test_sums_are_consistent() {
        let window = MonthWindow::new(1, 2025, VN).unwrap();
        let orders: Vec<Order> = (1..=31u32)
            .map(|day| {
                order(
                    at(2025, 1, day, 12),
                    day as i64 * 10_001,
                    vec![item("p1", "A", "Alpha", day as i64), item("p2", "B", "Beta", 1)],
                )
            })
            .collect();
        let summary = aggregate(&window, &orders);
        let daily_sum: i64 = summary.daily_revenue.iter().map(|d| d.revenue).sum();
        let order_sum: i64 = orders.iter().map(|o| o.total).sum();
        assert_eq!(daily_sum, summary.total_revenue);
        assert_eq!(order_sum, summary.total_revenue);

        let item_units: i64 = orders
            .iter()
            .flat_map(|o| o.items.iter())
            .map(|i| i.quantity)
            .sum();
        assert_eq!(summary.total_units, item_units);
    }
}
