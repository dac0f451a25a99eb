//! Order service
//!
//! The single orchestration point for the order lifecycle: the only
//! place total price is computed and the only place cache and audit
//! side effects are triggered. Repository and cache stay coherent
//! best-effort - the store is authoritative, the cache is advisory
//! with TTL-bounded staleness, and a cache fault never fails the
//! business operation.

use std::sync::Arc;
use std::time::Duration;

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::cache::{Cache, order_key};
use crate::core::ServerState;
use crate::db::models::{Order, OrderProjection};
use crate::db::repository::{OrderFilter, OrderRepository, RepoError, RepoResult};

pub struct OrderService {
    repo: OrderRepository,
    cache: Arc<dyn Cache>,
    cache_ttl: Duration,
}

impl OrderService {
    pub fn new(repo: OrderRepository, cache: Arc<dyn Cache>, cache_ttl: Duration) -> Self {
        Self {
            repo,
            cache,
            cache_ttl,
        }
    }

    /// Request-scoped construction from shared state
    pub fn from_state(state: &ServerState) -> Self {
        Self::new(
            OrderRepository::new(state.get_db()),
            state.cache.clone(),
            state.cache_ttl(),
        )
    }

    /// Create an order: compute the total, persist, project into the
    /// cache, emit an audit line. Returns the persisted order, never a
    /// cache-derived one.
    pub async fn create(&self, actor: &CurrentUser, mut order: Order) -> RepoResult<Order> {
        order.total_price = Self::total_or_validation_error(&order)?;
        let created = self.repo.create(order).await?;

        self.store_projection(&created).await;
        if let Some(id) = created.id_string() {
            audit_log!(actor.id, "created", id);
        }

        Ok(created)
    }

    /// Update an order whose product set the boundary layer has
    /// already replaced: recompute the total, persist, refresh the
    /// cache entry.
    pub async fn update(&self, actor: &CurrentUser, mut order: Order) -> RepoResult<Order> {
        order.total_price = Self::total_or_validation_error(&order)?;
        let updated = self.repo.update(&order).await?;

        self.store_projection(&updated).await;
        if let Some(id) = updated.id_string() {
            audit_log!(actor.id, "updated", id);
        }

        Ok(updated)
    }

    /// Cache-aside read: a hit is returned without consulting the
    /// store, so a staleness window is observable until the TTL evicts
    /// the entry. On miss the store result repopulates the cache.
    pub async fn get_by_id(&self, id: &str) -> RepoResult<Option<OrderProjection>> {
        let key = order_key(id);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<OrderProjection>(&raw) {
                Ok(projection) => return Ok(Some(projection)),
                // Unparseable entry counts as a miss
                Err(e) => tracing::warn!(target: "cache", key, error = %e, "Discarding bad cache entry"),
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(target: "cache", key, error = %e, "Cache read failed"),
        }

        let Some(order) = self.repo.find_by_id(id).await? else {
            return Ok(None);
        };

        let projection = OrderProjection::from(&order);
        self.store_projection(&order).await;
        Ok(Some(projection))
    }

    /// Plain store read, used by the boundary layer to load the entity
    /// before an update or delete
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        self.repo.find_by_id(id).await
    }

    /// List orders; never cache-backed. Whether an ownership filter is
    /// present is the caller's (the guard's) decision, not ours.
    pub async fn get_orders(&self, filter: OrderFilter) -> RepoResult<Vec<Order>> {
        self.repo.find_all(filter).await
    }

    /// Persist a soft delete the caller already flagged, then evict
    /// the cache entry unconditionally - no repopulation.
    pub async fn soft_delete(&self, actor: &CurrentUser, order: Order) -> RepoResult<Order> {
        let deleted = self.repo.delete(&order).await?;

        if let Some(id) = deleted.id_string() {
            let key = order_key(&id);
            if let Err(e) = self.cache.delete(&key).await {
                // Eviction is advisory; the TTL bounds the staleness window
                tracing::warn!(target: "cache", key, error = %e, "Cache eviction failed");
            }
            audit_log!(actor.id, "deleted", id);
        }

        Ok(deleted)
    }

    /// Overflowing totals are a validation failure of the submitted
    /// product set, rejected before anything is persisted
    fn total_or_validation_error(order: &Order) -> RepoResult<i64> {
        order.compute_total().ok_or_else(|| {
            RepoError::Validation("Order total exceeds the representable range".to_string())
        })
    }

    async fn store_projection(&self, order: &Order) {
        let Some(id) = order.id_string() else {
            return;
        };
        let key = order_key(&id);

        let projection = OrderProjection::from(order);
        match serde_json::to_string(&projection) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&key, &raw, self.cache_ttl).await {
                    tracing::warn!(target: "cache", key, error = %e, "Cache write failed");
                }
            }
            Err(e) => tracing::warn!(target: "cache", key, error = %e, "Projection serialization failed"),
        }
    }
}
