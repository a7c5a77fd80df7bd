/// Album catalog API routes
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use aria_core::types::{Album, AlbumFilter, AlbumId, CreateAlbum, UpdateAlbum};
use axum::{
    extract::{Path, Query, State},
    Json,
};

fn require_catalog_admin(auth: &AuthenticatedUser) -> Result<()> {
    if auth.role.can_manage_catalog() {
        Ok(())
    } else {
        Err(ServerError::Forbidden("Admin access required".to_string()))
    }
}

/// GET /api/albums - Public catalog listing
pub async fn list_albums(State(state): State<AppState>) -> Result<Json<Vec<Album>>> {
    let albums = aria_storage::albums::get_all(&state.pool).await?;
    Ok(Json(albums))
}

/// GET /api/albums/filter?limit&offset&order&albumName&artistName
pub async fn filter_albums(
    State(state): State<AppState>,
    Query(filter): Query<AlbumFilter>,
) -> Result<Json<Vec<Album>>> {
    let albums = aria_storage::albums::filter(&state.pool, &filter).await?;
    Ok(Json(albums))
}

/// GET /api/albums/:id
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<AlbumId>,
) -> Result<Json<Album>> {
    let album = aria_storage::albums::get(&state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Album {id}")))?;
    Ok(Json(album))
}

/// POST /api/albums (admin only)
pub async fn create_album(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Json(req): Json<CreateAlbum>,
) -> Result<Json<Album>> {
    require_catalog_admin(&auth)?;
    req.validate().map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let album = aria_storage::albums::create(&state.pool, req).await?;
    Ok(Json(album))
}

/// PATCH /api/albums/:id (admin only)
pub async fn update_album(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<AlbumId>,
    Json(req): Json<UpdateAlbum>,
) -> Result<Json<Album>> {
    require_catalog_admin(&auth)?;
    req.validate().map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let album = aria_storage::albums::update(&state.pool, id, req).await?;
    Ok(Json(album))
}
