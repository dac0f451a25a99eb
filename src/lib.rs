//! orderd - order management backend
//!
//! # Architecture
//!
//! Layered CRUD service: HTTP handlers resolve the caller identity and
//! enforce ownership, the [`services::OrderService`] computes totals and
//! keeps store and cache coherent, repositories talk to the embedded
//! SurrealDB store.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # Config, state, server
//! ├── auth/          # JWT authentication, current user
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # Database layer (models, repositories)
//! ├── cache/         # Cache-aside protocol
//! ├── services/      # Order orchestration
//! └── utils/         # Errors, logging
//! ```

pub mod api;
pub mod auth;
pub mod cache;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Audit logging macro - one line per business mutation, append-only sink.
// Log failures never abort the operation that emitted them.
#[macro_export]
macro_rules! audit_log {
    ($actor:expr, $action:expr, $order_id:expr) => {
        tracing::info!(
            target: "audit",
            actor = %$actor,
            action = $action,
            order_id = %$order_id
        );
    };
}

// Security logging macro - auth anomalies
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
