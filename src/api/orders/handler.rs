//! Order handlers
//!
//! The boundary layer: request validation, status parsing, and the
//! ownership guard live here. Existence is always decided before
//! ownership, so a caller probing someone else's order id and a caller
//! probing a random id get the same 404.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderProjection, OrderStatus, Product};
use crate::db::repository::OrderFilter;
use crate::services::OrderService;
use crate::utils::{AppError, AppResponse, AppResult, ok};

#[derive(Debug, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 128, message = "product name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0, message = "price must be non-negative"))]
    pub price: i64,
    #[validate(range(min = 1, message = "quantity must be positive"))]
    pub quantity: i64,
}

impl From<ProductPayload> for Product {
    fn from(p: ProductPayload) -> Self {
        Self {
            name: p.name,
            price: p.price,
            quantity: p.quantity,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, max = 128, message = "customer name must not be empty"))]
    pub customer_name: String,
    /// One of pending, confirmed, cancelled
    pub status: String,
    #[validate(nested)]
    pub products: Vec<ProductPayload>,
}

/// Full replacement of the mutable fields; the product set is replaced
/// wholesale, never merged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, max = 128, message = "customer name must not be empty"))]
    pub customer_name: String,
    pub status: String,
    #[validate(nested)]
    pub products: Vec<ProductPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

/// Status strings arrive as free text; the closed set is enforced here,
/// before any store access
fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.parse::<OrderStatus>()
        .map_err(|e| AppError::validation(e.to_string()))
}

/// Ownership guard, called only after the order is known to exist
fn ensure_owner_or_admin(user: &CurrentUser, owner: &str) -> AppResult<()> {
    if !user.is_admin && owner != user.id {
        return Err(AppError::forbidden("Not the owner of this order"));
    }
    Ok(())
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<OrderProjection>>)> {
    req.validate()?;
    let status = parse_status(&req.status)?;

    let products: Vec<Product> = req.products.into_iter().map(Product::from).collect();
    let order = Order::new(req.customer_name, status, user.id.clone(), products);

    let service = OrderService::from_state(&state);
    let created = service.create(&user, order).await?;

    Ok((StatusCode::CREATED, ok(OrderProjection::from(&created))))
}

/// GET /api/orders
///
/// Admins list every live order; everyone else only their own.
pub async fn list_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListOrdersQuery>,
) -> AppResult<Json<AppResponse<Vec<OrderProjection>>>> {
    let status = query.status.as_deref().map(parse_status).transpose()?;

    let filter = OrderFilter {
        user_id: (!user.is_admin).then(|| user.id.clone()),
        status,
        min_price: query.min_price,
        max_price: query.max_price,
    };

    let service = OrderService::from_state(&state);
    let orders = service.get_orders(filter).await?;

    Ok(ok(orders.iter().map(OrderProjection::from).collect()))
}

/// GET /api/orders/{id}
pub async fn get_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<OrderProjection>>> {
    let service = OrderService::from_state(&state);

    let projection = service
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    ensure_owner_or_admin(&user, &projection.user_id)?;

    Ok(ok(projection))
}

/// PUT /api/orders/{id}
pub async fn update_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateOrderRequest>,
) -> AppResult<Json<AppResponse<OrderProjection>>> {
    req.validate()?;
    let status = parse_status(&req.status)?;

    let service = OrderService::from_state(&state);
    let mut order = service
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    ensure_owner_or_admin(&user, &order.user_id)?;

    order.customer_name = req.customer_name;
    order.status = status;
    order.products = req.products.into_iter().map(Product::from).collect();

    let updated = service.update(&user, order).await?;

    Ok(ok(OrderProjection::from(&updated)))
}

/// DELETE /api/orders/{id}
pub async fn delete_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let service = OrderService::from_state(&state);
    let mut order = service
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;

    ensure_owner_or_admin(&user, &order.user_id)?;

    order.is_deleted = true;
    service.soft_delete(&user, order).await?;

    Ok(StatusCode::NO_CONTENT)
}
