//! Database Models

pub mod serde_helpers;

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, CustomerCreate};
pub use order::{Order, OrderCreate, OrderDetail, OrderItem, OrderPatch, ShippingAddress};
pub use product::{Product, ProductCreate};
