//! Authentication handlers
//!
//! Registration and credential login. Login failures take the same
//! path and the same fixed delay whether the username exists or not,
//! and always answer with the same message.

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "username must be 3 to 64 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8 to 128 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Token lifetime in minutes
    pub expires_in: i64,
}

/// Public account view; the password hash never leaves the db layer
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            username: user.username.clone(),
            is_admin: user.is_admin,
        }
    }
}

/// Register a new (non-admin) account
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AppResponse<UserInfo>>)> {
    req.validate()?;

    let hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let repo = UserRepository::new(state.get_db());
    let created = repo.create(User::new(req.username, hash, false)).await?;

    tracing::info!(username = %created.username, "Account registered");
    Ok((StatusCode::CREATED, ok(UserInfo::from(&created))))
}

/// Credential login, answering with a bearer token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<AppResponse<LoginResponse>>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_username(&req.username).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(u) => u,
        None => {
            security_log!(
                "WARN",
                "login_failed",
                username = req.username.clone(),
                reason = "user_not_found"
            );
            return Err(AppError::invalid_credentials());
        }
    };

    if !user.is_active {
        security_log!(
            "WARN",
            "login_failed",
            username = req.username.clone(),
            reason = "account_disabled"
        );
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_valid {
        security_log!(
            "WARN",
            "login_failed",
            username = req.username.clone(),
            reason = "invalid_credentials"
        );
        return Err(AppError::invalid_credentials());
    }

    let user_id = user.id_string().unwrap_or_default();
    let jwt_service = state.get_jwt_service();
    let token = jwt_service
        .generate_token(&user_id, &user.username, user.is_admin)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = %user_id, username = %user.username, "Login successful");

    Ok(ok(LoginResponse {
        access_token: token,
        token_type: "bearer",
        expires_in: jwt_service.config.expiration_minutes,
    }))
}
