//! Wishlist queries

use crate::error::{Result, StorageError};
use aria_core::types::{AlbumId, UserId, Wishlist, WishlistId};
use sqlx::{Row, SqlitePool};

async fn album_ids_for(pool: &SqlitePool, wishlist_id: WishlistId) -> Result<Vec<AlbumId>> {
    let rows = sqlx::query(
        "SELECT album_id FROM wishlist_albums WHERE wishlist_id = ? ORDER BY added_at",
    )
    .bind(wishlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("album_id")).collect())
}

pub async fn get(pool: &SqlitePool, id: WishlistId) -> Result<Option<Wishlist>> {
    let row = sqlx::query("SELECT id, user_id, created_at FROM wishlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let album_ids = album_ids_for(pool, row.get("id")).await?;
            Ok(Some(Wishlist {
                id: row.get("id"),
                user_id: row.get("user_id"),
                album_ids,
                created_at: row.get("created_at"),
            }))
        }
        None => Ok(None),
    }
}

/// Fetch the user's wishlist, creating an empty one on first request.
pub async fn get_or_create(pool: &SqlitePool, user_id: UserId) -> Result<Wishlist> {
    sqlx::query("INSERT OR IGNORE INTO wishlists (user_id) VALUES (?)")
        .bind(user_id)
        .execute(pool)
        .await?;

    let row = sqlx::query("SELECT id, user_id, created_at FROM wishlists WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    let album_ids = album_ids_for(pool, row.get("id")).await?;
    Ok(Wishlist {
        id: row.get("id"),
        user_id: row.get("user_id"),
        album_ids,
        created_at: row.get("created_at"),
    })
}

/// Idempotent add; a second insert of the same album is a no-op.
pub async fn add_album(pool: &SqlitePool, id: WishlistId, album_id: AlbumId) -> Result<Wishlist> {
    sqlx::query("INSERT OR IGNORE INTO wishlist_albums (wishlist_id, album_id) VALUES (?, ?)")
        .bind(id)
        .bind(album_id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Wishlist", id))
}

pub async fn remove_album(
    pool: &SqlitePool,
    id: WishlistId,
    album_id: AlbumId,
) -> Result<Wishlist> {
    sqlx::query("DELETE FROM wishlist_albums WHERE wishlist_id = ? AND album_id = ?")
        .bind(id)
        .bind(album_id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Wishlist", id))
}
