/// Wishlist API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use aria_core::types::{AlbumId, Wishlist, WishlistId};
use axum::{
    extract::{Path, State},
    Json,
};

/// POST /api/wishlists - Fetch own wishlist, creating it on first use
pub async fn get_or_create(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Wishlist>> {
    let wishlist = aria_storage::wishlists::get_or_create(&state.pool, auth.user_id).await?;
    Ok(Json(wishlist))
}

async fn owned_wishlist(
    state: &AppState,
    auth: &AuthenticatedUser,
    id: WishlistId,
) -> Result<Wishlist> {
    let wishlist = aria_storage::wishlists::get(&state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Wishlist {id}")))?;

    if wishlist.user_id != auth.user_id {
        return Err(ServerError::Forbidden(
            "Cannot modify another user's wishlist".to_string(),
        ));
    }
    Ok(wishlist)
}

/// PATCH /api/wishlists/:id/add_album/:album_id
pub async fn add_album(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path((id, album_id)): Path<(WishlistId, AlbumId)>,
) -> Result<Json<Wishlist>> {
    owned_wishlist(&state, &auth, id).await?;

    if aria_storage::albums::get(&state.pool, album_id).await?.is_none() {
        return Err(ServerError::NotFound(format!("Album {album_id}")));
    }

    let wishlist = aria_storage::wishlists::add_album(&state.pool, id, album_id).await?;
    Ok(Json(wishlist))
}

/// PATCH /api/wishlists/:id/remove_album/:album_id
pub async fn remove_album(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path((id, album_id)): Path<(WishlistId, AlbumId)>,
) -> Result<Json<Wishlist>> {
    owned_wishlist(&state, &auth, id).await?;

    let wishlist = aria_storage::wishlists::remove_album(&state.pool, id, album_id).await?;
    Ok(Json(wishlist))
}
