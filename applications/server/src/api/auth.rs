/// Authentication API routes
use crate::{
    api::users::UserResponse,
    error::{Result, ServerError},
    state::AppState,
};
use aria_core::types::Role;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// POST /api/auth/register
///
/// The first account created becomes the admin.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    if req.name.trim().is_empty() || req.username.trim().is_empty() {
        return Err(ServerError::BadRequest("name and username are required".to_string()));
    }
    if !req.email.contains('@') {
        return Err(ServerError::BadRequest("invalid email address".to_string()));
    }
    if req.password.len() < 6 {
        return Err(ServerError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }

    let role = if aria_storage::users::count(&state.pool).await? == 0 {
        Role::Admin
    } else {
        Role::User
    };

    let password_hash = state.auth_service.hash_password(&req.password)?;
    let user = aria_storage::users::create(
        &state.pool,
        aria_storage::users::NewUser {
            name: req.name,
            username: req.username,
            email: req.email,
            password_hash,
            role,
        },
    )
    .await?;

    if let Err(e) = state.mailer.send_welcome(&user.email, &user.name).await {
        tracing::warn!("Welcome email failed: {}", e);
    }

    let access_token = state.auth_service.create_access_token(user.id, user.role)?;
    let refresh_token = state.auth_service.create_refresh_token(user.id, user.role)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        user: user.into(),
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = aria_storage::users::get_by_email(&state.pool, &req.email)
        .await?
        .ok_or_else(|| ServerError::Auth("Invalid email or password".to_string()))?;

    if !state
        .auth_service
        .verify_password(&req.password, &user.password_hash)?
    {
        return Err(ServerError::Auth("Invalid email or password".to_string()));
    }

    let access_token = state.auth_service.create_access_token(user.id, user.role)?;
    let refresh_token = state.auth_service.create_refresh_token(user.id, user.role)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        user: user.into(),
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; logout is an acknowledgement for clients that
/// want a definitive end-of-session signal.
pub async fn logout() -> Json<serde_json::Value> {
    Json(json!({ "success": true }))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let identity = state.auth_service.verify_refresh_token(&req.refresh_token)?;

    let access_token = state
        .auth_service
        .create_access_token(identity.user_id, identity.role)?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}

/// POST /api/auth/forgot_password
///
/// Always answers 200 so the endpoint cannot be used to probe for
/// registered addresses.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    let token = uuid::Uuid::new_v4().to_string();
    let expires_at = aria_storage::now_ts() + state.reset_token_ttl_secs;

    if let Some(user) =
        aria_storage::users::set_reset_token(&state.pool, &req.email, &token, expires_at).await?
    {
        if let Err(e) = state.mailer.send_password_reset(&user.email, &token).await {
            tracing::warn!("Password reset email failed: {}", e);
        }
    }

    Ok(Json(json!({ "success": true })))
}

/// POST /api/auth/reset_password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.password.len() < 6 {
        return Err(ServerError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }

    let user = aria_storage::users::get_by_reset_token(&state.pool, &req.token)
        .await?
        .ok_or_else(|| ServerError::BadRequest("invalid or expired reset token".to_string()))?;

    let password_hash = state.auth_service.hash_password(&req.password)?;
    aria_storage::users::set_password_hash(&state.pool, user.id, &password_hash).await?;
    aria_storage::users::clear_reset_token(&state.pool, user.id).await?;

    Ok(Json(json!({ "success": true })))
}
