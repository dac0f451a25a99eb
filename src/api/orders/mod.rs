//! Order routes
//!
//! Every route requires a bearer token; ownership is enforced in the
//! handlers (admins bypass it).

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub use handler::{CreateOrderRequest, ProductPayload, UpdateOrderRequest};

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create_order).get(handler::list_orders))
        .route(
            "/{id}",
            get(handler::get_order)
                .put(handler::update_order)
                .delete(handler::delete_order),
        )
}
