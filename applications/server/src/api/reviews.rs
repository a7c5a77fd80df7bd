/// Review API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use aria_core::types::{AlbumId, CreateReview, Review, ReviewId, UpdateReview};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;

/// GET /api/reviews
pub async fn list_reviews(
    _auth: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Review>>> {
    let reviews = aria_storage::reviews::get_all(&state.pool).await?;
    Ok(Json(reviews))
}

/// GET /api/reviews/album/:album_id - Public
pub async fn reviews_for_album(
    State(state): State<AppState>,
    Path(album_id): Path<AlbumId>,
) -> Result<Json<Vec<Review>>> {
    if aria_storage::albums::get(&state.pool, album_id).await?.is_none() {
        return Err(ServerError::NotFound(format!("Album {album_id}")));
    }

    let reviews = aria_storage::reviews::for_album(&state.pool, album_id).await?;
    Ok(Json(reviews))
}

/// POST /api/reviews
pub async fn create_review(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReview>,
) -> Result<Json<Review>> {
    req.validate().map_err(|e| ServerError::BadRequest(e.to_string()))?;

    if aria_storage::albums::get(&state.pool, req.album_id)
        .await?
        .is_none()
    {
        return Err(ServerError::NotFound(format!("Album {}", req.album_id)));
    }

    let review = aria_storage::reviews::create(&state.pool, auth.user_id, req).await?;
    Ok(Json(review))
}

/// PATCH /api/reviews/:id - Author only
pub async fn update_review(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
    Json(req): Json<UpdateReview>,
) -> Result<Json<Review>> {
    req.validate().map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let existing = aria_storage::reviews::get(&state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Review {id}")))?;

    if existing.user_id != auth.user_id {
        return Err(ServerError::Forbidden(
            "Only the author may edit a review".to_string(),
        ));
    }

    let review = aria_storage::reviews::update(&state.pool, id, req).await?;
    Ok(Json(review))
}

/// DELETE /api/reviews/:id - Author only
pub async fn delete_review(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> Result<Json<serde_json::Value>> {
    let existing = aria_storage::reviews::get(&state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Review {id}")))?;

    if existing.user_id != auth.user_id {
        return Err(ServerError::Forbidden(
            "Only the author may delete a review".to_string(),
        ));
    }

    aria_storage::reviews::delete(&state.pool, id).await?;
    Ok(Json(json!({ "success": true })))
}
