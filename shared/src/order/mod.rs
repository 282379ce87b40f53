//! Order vocabularies shared by the back-office and its clients
//!
//! Both vocabularies are closed enums with exhaustive label mappings, so a
//! new status or payment method cannot reach a report without a label.

pub mod payment;
pub mod status;

pub use payment::PaymentMethod;
pub use status::{Milestone, OrderStatus, UnknownOrderStatus};
