//! Database models

pub mod order;
pub mod serde_helpers;
pub mod user;

pub use order::{Order, OrderProjection, OrderStatus, Product};
pub use user::User;
