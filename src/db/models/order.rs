//! Order model
//!
//! An order owns its product lines outright: products are embedded in
//! the order document, so replacing the product set or deleting the
//! order takes the products with it in the same statement. Orders are
//! never physically removed by this layer; `is_deleted` flips instead.

use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Order table name
pub const ORDER_TABLE: &str = "order";

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Error for status strings outside the closed set
#[derive(Debug, thiserror::Error)]
#[error("invalid order status '{0}' (expected pending, confirmed or cancelled)")]
pub struct InvalidStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidStatus;

    /// The single fallible conversion from external input; anything
    /// outside the three-member set is a validation error, never a crash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Product line belonging to exactly one order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    /// Unit price, non-negative integer currency units
    pub price: i64,
    /// Positive quantity
    pub quantity: i64,
}

impl Product {
    /// `price * quantity`, or `None` when the product would not fit
    /// in an i64
    pub fn line_total(&self) -> Option<i64> {
        self.price.checked_mul(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub customer_name: String,
    pub status: OrderStatus,
    /// Derived: sum of price x quantity over `products`
    #[serde(default)]
    pub total_price: i64,
    /// Soft-delete flag; deleted orders stay in storage but are
    /// invisible to every read path
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_deleted: bool,
    /// Owner reference
    pub user_id: String,
    #[serde(default)]
    pub products: Vec<Product>,
    pub created_at: String,
}

impl Order {
    /// New order with a fresh timestamp; the id is assigned by the store
    pub fn new(
        customer_name: impl Into<String>,
        status: OrderStatus,
        user_id: impl Into<String>,
        products: Vec<Product>,
    ) -> Self {
        Self {
            id: None,
            customer_name: customer_name.into(),
            status,
            total_price: 0,
            is_deleted: false,
            user_id: user_id.into(),
            products,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Sum of line totals over the currently attached products
    ///
    /// `None` on overflow; the caller turns that into a validation
    /// error, the request never panics on large inputs.
    pub fn compute_total(&self) -> Option<i64> {
        self.products
            .iter()
            .try_fold(0i64, |acc, p| acc.checked_add(p.line_total()?))
    }

    /// Full "order:key" id string, if persisted
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_string())
    }
}

/// Flat cache/display projection of an order
///
/// Reconstructible into a display-equivalent order without a store
/// round-trip; read-path only, never written back to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProjection {
    pub order_id: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total_price: i64,
    pub user_id: String,
    pub products: Vec<Product>,
}

impl From<&Order> for OrderProjection {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id_string().unwrap_or_default(),
            customer_name: order.customer_name.clone(),
            status: order.status,
            total_price: order.total_price,
            user_id: order.user_id.clone(),
            products: order.products.clone(),
        }
    }
}
