//! Database module
//!
//! Owns the embedded SurrealDB instance. The binary runs on the
//! RocksDB backend under `work_dir/database`; tests use the in-memory
//! backend through [`DbService::in_memory`].

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "orderd";
const DATABASE: &str = "orders";

/// Database service - owns the embedded database handle
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select database: {e}")))?;

        Self::define_schema(&db).await?;

        tracing::info!("Database connection established ({db_path})");

        Ok(Self { db })
    }

    /// Volatile in-memory database, used by the integration tests
    pub async fn in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select database: {e}")))?;

        Self::define_schema(&db).await?;

        Ok(Self { db })
    }

    /// Idempotent schema setup; uniqueness constraints live in the
    /// store, not in application-level checks
    async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query("DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE")
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
        Ok(())
    }
}
