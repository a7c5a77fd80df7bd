/// Forum API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use aria_core::types::{Forum, ForumId};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateForumRequest {
    pub name: String,
}

/// GET /api/forums
pub async fn list_forums(
    _auth: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Forum>>> {
    let forums = aria_storage::forums::get_all(&state.pool).await?;
    Ok(Json(forums))
}

/// POST /api/forums
pub async fn create_forum(
    _auth: AuthenticatedUser,
    State(state): State<AppState>,
    Json(req): Json<CreateForumRequest>,
) -> Result<Json<Forum>> {
    if req.name.trim().is_empty() {
        return Err(ServerError::BadRequest("forum name is required".to_string()));
    }

    let forum = aria_storage::forums::create(&state.pool, req.name.trim()).await?;
    Ok(Json(forum))
}

/// POST /api/forums/:id/join
pub async fn join_forum(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<ForumId>,
) -> Result<Json<Forum>> {
    if aria_storage::forums::get(&state.pool, id).await?.is_none() {
        return Err(ServerError::NotFound(format!("Forum {id}")));
    }

    let forum = aria_storage::forums::join(&state.pool, id, auth.user_id).await?;
    Ok(Json(forum))
}
