//! HTTP API integration tests
//!
//! Drive the full router with in-process requests: authentication,
//! status codes, and the not-found/forbidden distinction.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use orderd::api::build_router;
use orderd::auth::{JwtConfig, JwtService};
use orderd::cache::{Cache, MemoryCache};
use orderd::core::{Config, ServerState};
use orderd::db::DbService;
use orderd::db::models::User;
use orderd::db::repository::UserRepository;

fn test_config() -> Config {
    Config {
        work_dir: "/tmp/orderd-test".into(),
        http_port: 0,
        environment: "development".into(),
        cache_ttl_secs: 300,
        jwt: JwtConfig {
            secret: "integration-test-signing-key-32-bytes".into(),
            expiration_minutes: 60,
            issuer: "orderd".into(),
            audience: "orderd-clients".into(),
        },
        admin_username: "admin".into(),
        admin_password: "admin-password".into(),
    }
}

async fn test_state() -> ServerState {
    let config = test_config();
    let db = DbService::in_memory().await.unwrap().db;
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
    ServerState::new(config, db, cache, jwt_service)
}

/// Create an account directly and mint a token for it, bypassing the
/// login delay
async fn signed_in_user(state: &ServerState, username: &str, is_admin: bool) -> String {
    let hash = User::hash_password("password123").unwrap();
    let user = UserRepository::new(state.get_db())
        .create(User::new(username, hash, is_admin))
        .await
        .unwrap();

    state
        .get_jwt_service()
        .generate_token(&user.id_string().unwrap(), username, is_admin)
        .unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_order() -> Value {
    json!({
        "customer_name": "John Doe",
        "status": "pending",
        "products": [
            {"name": "Laptop", "price": 1000, "quantity": 1},
            {"name": "Mouse", "price": 50, "quantity": 2}
        ]
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = build_router(test_state().await);

    let response = send(&app, request("GET", "/api/health", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = build_router(test_state().await);

    let response = send(&app, request("GET", "/api/orders", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, request("POST", "/api/orders", None, Some(sample_order()))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let app = build_router(test_state().await);

    let response = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"username": "john_doe", "password": "password123"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Duplicate username is a conflict
    let response = send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"username": "john_doe", "password": "password123"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "john_doe", "password": "password123"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    // The issued token opens the protected surface
    let response = send(&app, request("GET", "/api/orders", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_is_rejected_uniformly() {
    let app = build_router(test_state().await);

    send(
        &app,
        request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"username": "john_doe", "password": "password123"})),
        ),
    )
    .await;

    let wrong_password = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "john_doe", "password": "nope-nope-nope"})),
        ),
    )
    .await;
    let unknown_user = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "who_dis", "password": "password123"})),
        ),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::BAD_REQUEST);
    assert_eq!(unknown_user.status(), StatusCode::BAD_REQUEST);

    // Same message either way, no username enumeration
    let a = json_body(wrong_password).await;
    let b = json_body(unknown_user).await;
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
async fn test_create_returns_created_with_computed_total() {
    let state = test_state().await;
    let token = signed_in_user(&state, "alice", false).await;
    let app = build_router(state);

    let response = send(&app, request("POST", "/api/orders", Some(&token), Some(sample_order()))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["code"], "E0000");
    assert_eq!(body["data"]["total_price"], 1100);
    assert_eq!(body["data"]["customer_name"], "John Doe");
    assert!(body["data"]["order_id"].as_str().unwrap().starts_with("order:"));
}

#[tokio::test]
async fn test_overflowing_total_is_rejected_as_validation() {
    let state = test_state().await;
    let token = signed_in_user(&state, "alice", false).await;
    let app = build_router(state);

    // Passes the field-level bounds but cannot be totalled in an i64
    let payload = json!({
        "customer_name": "Big Spender",
        "status": "pending",
        "products": [
            {"name": "Everything", "price": i64::MAX, "quantity": 2}
        ]
    });
    let response = send(&app, request("POST", "/api/orders", Some(&token), Some(payload))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was persisted
    let response = send(&app, request("GET", "/api/orders", Some(&token), None)).await;
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_status_is_rejected_before_store() {
    let state = test_state().await;
    let token = signed_in_user(&state, "alice", false).await;
    let app = build_router(state);

    let mut payload = sample_order();
    payload["status"] = json!("new");

    let response = send(&app, request("POST", "/api/orders", Some(&token), Some(payload))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was persisted
    let response = send(&app, request("GET", "/api/orders", Some(&token), None)).await;
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_missing_and_foreign_orders_are_distinct() {
    let state = test_state().await;
    let alice = signed_in_user(&state, "alice", false).await;
    let bob = signed_in_user(&state, "bob", false).await;
    let admin = signed_in_user(&state, "root", true).await;
    let app = build_router(state);

    let response = send(&app, request("POST", "/api/orders", Some(&alice), Some(sample_order()))).await;
    let body = json_body(response).await;
    let id = body["data"]["order_id"].as_str().unwrap().to_string();
    let uri = format!("/api/orders/{id}");

    // Owner and admin read it; another user is refused
    let response = send(&app, request("GET", &uri, Some(&alice), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    // Same field vocabulary as the create response
    let body = json_body(response).await;
    assert_eq!(body["data"]["order_id"].as_str().unwrap(), id);
    let response = send(&app, request("GET", &uri, Some(&admin), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(&app, request("GET", &uri, Some(&bob), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A missing id is not found, for everyone
    let response = send(&app, request("GET", "/api/orders/order:missing", Some(&bob), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Mutations follow the same guard
    let response = send(&app, request("PUT", &uri, Some(&bob), Some(sample_order()))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = send(&app, request("DELETE", &uri, Some(&bob), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_replaces_product_set_wholesale() {
    let state = test_state().await;
    let token = signed_in_user(&state, "alice", false).await;
    let app = build_router(state);

    let response = send(&app, request("POST", "/api/orders", Some(&token), Some(sample_order()))).await;
    let body = json_body(response).await;
    let id = body["data"]["order_id"].as_str().unwrap().to_string();

    let payload = json!({
        "customer_name": "John Doe",
        "status": "confirmed",
        "products": [
            {"name": "Keyboard", "price": 200, "quantity": 3}
        ]
    });
    let response = send(
        &app,
        request("PUT", &format!("/api/orders/{id}"), Some(&token), Some(payload)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "confirmed");
    assert_eq!(body["data"]["total_price"], 600);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_returns_no_content_and_hides_order() {
    let state = test_state().await;
    let token = signed_in_user(&state, "alice", false).await;
    let app = build_router(state);

    let response = send(&app, request("POST", "/api/orders", Some(&token), Some(sample_order()))).await;
    let body = json_body(response).await;
    let id = body["data"]["order_id"].as_str().unwrap().to_string();
    let uri = format!("/api/orders/{id}");

    let response = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone from reads; a repeat delete is indistinguishable from missing
    let response = send(&app, request("GET", &uri, Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_sees_all_owner_sees_own() {
    let state = test_state().await;
    let alice = signed_in_user(&state, "alice", false).await;
    let bob = signed_in_user(&state, "bob", false).await;
    let admin = signed_in_user(&state, "root", true).await;
    let app = build_router(state);

    for _ in 0..2 {
        send(&app, request("POST", "/api/orders", Some(&alice), Some(sample_order()))).await;
    }
    send(&app, request("POST", "/api/orders", Some(&bob), Some(sample_order()))).await;

    let response = send(&app, request("GET", "/api/orders", Some(&alice), None)).await;
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = send(&app, request("GET", "/api/orders", Some(&admin), None)).await;
    let body = json_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}
