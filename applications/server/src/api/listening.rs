/// Listening history and recommendation API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use aria_core::types::{Album, UserId};
use axum::{
    extract::{Path, State},
    Json,
};

const RECENT_LIMIT: i64 = 20;

/// GET /api/recently-listened/:user_id
pub async fn recently_listened(
    _auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Album>>> {
    let albums =
        aria_storage::listening::recent_for_user(&state.pool, user_id, RECENT_LIMIT).await?;
    Ok(Json(albums))
}

/// GET /api/recommendations/:user_id
///
/// Recommendations never include albums the user already owns.
pub async fn recommendations(
    _auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Album>>> {
    let albums = aria_storage::listening::recommendations_for_user(&state.pool, user_id).await?;
    Ok(Json(albums))
}
