//! Server state
//!
//! [`ServerState`] holds the shared handles every request needs: the
//! embedded database, the order cache and the JWT service. It is cloned
//! per request (all fields are cheap to clone); no process-wide mutable
//! singletons exist.

use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::cache::{Cache, MemoryCache};
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::UserRepository;
use crate::utils::AppError;

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Order side cache
    pub cache: Arc<dyn Cache>,
    /// JWT authentication service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Manual construction, used by tests
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        cache: Arc<dyn Cache>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            config,
            db,
            cache,
            jwt_service,
        }
    }

    /// Initialize server state
    ///
    /// 1. Open the embedded database under `work_dir/database`
    /// 2. Build the in-process cache and JWT service
    /// 3. Ensure the bootstrap admin account exists
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db_path = config.database_dir().join("orderd.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;
        let db = db_service.db;

        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        UserRepository::new(db.clone())
            .ensure_admin(&config.admin_username, &config.admin_password)
            .await?;

        Ok(Self::new(config.clone(), db, cache, jwt_service))
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// TTL applied to order cache entries
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config.cache_ttl_secs)
    }
}
