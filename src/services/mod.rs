//! Service layer

pub mod order;

pub use order::OrderService;
