//! Repository module
//!
//! Thin adapters translating domain operations into store queries.
//! Every mutating call commits on its own; there is no cross-call
//! transaction.

pub mod order;
pub mod user;

pub use order::{OrderFilter, OrderRepository};
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Resolve an id string to a RecordId for `table`
///
/// Accepts both the bare key (`"abc"`) and the prefixed form
/// (`"table:abc"`).
pub fn record_id(table: &str, id: &str) -> RecordId {
    match id.parse::<RecordId>() {
        Ok(rid) if rid.table() == table => rid,
        _ => RecordId::from_table_key(table, id),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
