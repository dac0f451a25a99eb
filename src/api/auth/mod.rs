//! Authentication routes
//!
//! - /api/auth/register: public
//! - /api/auth/login: public

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub use handler::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Build authentication router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/register", post(handler::register))
        .route("/api/auth/login", post(handler::login))
}
