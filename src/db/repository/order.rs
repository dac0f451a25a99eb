//! Order repository
//!
//! Soft-delete filtering lives here: `find_by_id` and `find_all` only
//! ever return rows with `is_deleted = false`, so callers cannot tell
//! a deleted order from a missing one.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::order::{ORDER_TABLE, Order, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Conjunction of optional list predicates
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Restrict to a single owner; `None` means no ownership restriction
    /// (the boundary layer omits it for administrators)
    pub user_id: Option<String>,
    pub status: Option<OrderStatus>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order with its embedded products in one statement
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find a live order by id; soft-deleted rows are absent here
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = record_id(ORDER_TABLE, id);
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE id = $id AND is_deleted = false")
            .bind(("id", rid))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Persist all mutable fields, including the full replacement
    /// product set, and return the refreshed row
    pub async fn update(&self, order: &Order) -> RepoResult<Order> {
        self.persist(order).await
    }

    /// Persist the `is_deleted` flag already set by the caller
    ///
    /// The repository does not flip the flag itself; deletion is a
    /// caller decision, persistence is ours.
    pub async fn delete(&self, order: &Order) -> RepoResult<Order> {
        self.persist(order).await
    }

    async fn persist(&self, order: &Order) -> RepoResult<Order> {
        let id = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Validation("Order has no id".to_string()))?;
        let id_str = id.to_string();

        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET \
                 customer_name = $customer_name, \
                 status = $status, \
                 total_price = $total_price, \
                 is_deleted = $is_deleted, \
                 products = $products \
                 RETURN AFTER",
            )
            .bind(("id", id))
            .bind(("customer_name", order.customer_name.clone()))
            .bind(("status", order.status))
            .bind(("total_price", order.total_price))
            .bind(("is_deleted", order.is_deleted))
            .bind((
                "products",
                serde_json::to_value(&order.products).unwrap_or_default(),
            ))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id_str)))
    }

    /// List live orders matching the filter conjunction, in insertion order
    pub async fn find_all(&self, filter: OrderFilter) -> RepoResult<Vec<Order>> {
        let mut conditions = vec!["is_deleted = false"];
        if filter.user_id.is_some() {
            conditions.push("user_id = $user_id");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.min_price.is_some() {
            conditions.push("total_price >= $min_price");
        }
        if filter.max_price.is_some() {
            conditions.push("total_price <= $max_price");
        }

        let sql = format!(
            "SELECT * FROM order WHERE {} ORDER BY created_at",
            conditions.join(" AND ")
        );

        let mut query = self.base.db().query(sql);
        if let Some(v) = filter.user_id {
            query = query.bind(("user_id", v));
        }
        if let Some(v) = filter.status {
            query = query.bind(("status", v));
        }
        if let Some(v) = filter.min_price {
            query = query.bind(("min_price", v));
        }
        if let Some(v) = filter.max_price {
            query = query.bind(("max_price", v));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }
}
