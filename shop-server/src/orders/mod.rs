//! Order lifecycle
//!
//! - [`transition`]: validation and patch planning for status/paid changes
//! - [`service`]: loads, applies and denormalizes orders for the console

pub mod service;
pub mod transition;

pub use service::{OrderListQuery, OrderPage, OrderService};
pub use transition::{OrderUpdate, OrderUpdateRequest};
