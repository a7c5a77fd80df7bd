/// User management API routes
use crate::{
    error::{Result, ServerError},
    middleware::{require_admin, AuthenticatedUser},
    state::AppState,
};
use aria_core::types::{Role, User, UserId};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Public shape of a user account. Never carries the password hash or
/// reset-token fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub profile_image: Option<String>,
    pub created_at: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            role: user.role,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Raw card number; stored only as a hash
    #[serde(default)]
    pub credit_card: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// GET /api/users - List all users (admin only)
pub async fn list_users(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>> {
    require_admin(&auth)?;

    let users = aria_storage::users::get_all(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/:id
pub async fn get_user(
    _auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>> {
    let user = aria_storage::users::get(&state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("User {id}")))?;
    Ok(Json(user.into()))
}

/// PATCH /api/users/update_current_user
pub async fn update_current_user(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    if let Some(email) = &req.email {
        if !email.contains('@') {
            return Err(ServerError::BadRequest("invalid email address".to_string()));
        }
    }

    let credit_card_hash = match req.credit_card.as_deref() {
        Some(card) => Some(state.auth_service.hash_password(card)?),
        None => None,
    };

    let user = aria_storage::users::update_profile(
        &state.pool,
        auth.user_id,
        aria_storage::users::ProfileUpdate {
            name: req.name,
            username: req.username,
            email: req.email,
            profile_image: req.profile_image,
            credit_card_hash,
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// PATCH /api/users/update_password
pub async fn update_password(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<serde_json::Value>> {
    if req.new_password.len() < 6 {
        return Err(ServerError::BadRequest(
            "password must be at least 6 characters".to_string(),
        ));
    }

    let user = aria_storage::users::get(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("User {}", auth.user_id)))?;

    if !state
        .auth_service
        .verify_password(&req.old_password, &user.password_hash)?
    {
        return Err(ServerError::Auth("Incorrect password".to_string()));
    }

    let new_hash = state.auth_service.hash_password(&req.new_password)?;
    aria_storage::users::set_password_hash(&state.pool, auth.user_id, &new_hash).await?;

    Ok(Json(json!({ "success": true })))
}

/// DELETE /api/users/:id (admin only)
pub async fn delete_user(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<serde_json::Value>> {
    require_admin(&auth)?;

    aria_storage::users::delete(&state.pool, id).await?;
    Ok(Json(json!({ "success": true })))
}
