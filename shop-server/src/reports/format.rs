//! Display fallbacks for the order detail sheet

use super::aggregate::NOT_AVAILABLE;
use crate::db::models::{Customer, Order};
use std::collections::HashMap;

/// Shipping name, then account name, then the placeholder
pub fn customer_name(order: &Order, customers: &HashMap<String, Customer>) -> String {
    let shipping = order.shipping_address.full_name.trim();
    if !shipping.is_empty() {
        return shipping.to_string();
    }
    order
        .user_id
        .as_ref()
        .and_then(|id| customers.get(&id.to_string()))
        .map(|c| c.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Shipping phone or the placeholder
pub fn customer_phone(order: &Order) -> String {
    let phone = order.shipping_address.phone.trim();
    if phone.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        phone.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderCreate;
    use surrealdb::RecordId;

    fn customers() -> HashMap<String, Customer> {
        let customer = Customer {
            id: Some(RecordId::from_table_key("customer", "c1")),
            name: "Nguyễn Văn A".into(),
            email: "a@example.com".into(),
            phone: None,
            role: "user".into(),
            status: "active".into(),
            avatar: None,
        };
        HashMap::from([("customer:c1".to_string(), customer)])
    }

    #[test]
    fn test_customer_name_fallback_chain() {
        let mut order = OrderCreate::default().into_order(0).unwrap();
        assert_eq!(customer_name(&order, &customers()), NOT_AVAILABLE);

        order.user_id = Some(RecordId::from_table_key("customer", "c1"));
        assert_eq!(customer_name(&order, &customers()), "Nguyễn Văn A");

        order.shipping_address.full_name = "Trần Thị B".into();
        assert_eq!(customer_name(&order, &customers()), "Trần Thị B");

        order.shipping_address.full_name = String::new();
        order.user_id = Some(RecordId::from_table_key("customer", "gone"));
        assert_eq!(customer_name(&order, &customers()), NOT_AVAILABLE);
    }

    #[test]
    fn test_customer_phone() {
        let mut order = OrderCreate::default().into_order(0).unwrap();
        assert_eq!(customer_phone(&order), NOT_AVAILABLE);
        order.shipping_address.phone = "0901234567".into();
        assert_eq!(customer_phone(&order), "0901234567");
    }
}
