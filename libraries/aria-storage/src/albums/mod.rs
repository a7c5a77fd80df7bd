//! Album catalog queries

use crate::error::{Result, StorageError};
use aria_core::types::{Album, AlbumFilter, AlbumId, CreateAlbum, SortOrder, UpdateAlbum};
use sqlx::{Row, SqlitePool};

const ALBUM_COLUMNS: &str = "id, artist_name, album_name, price_cents, image, release_date, \
     category, spotify_url, average_rating, num_of_reviews, created_at";

fn map_album(row: &sqlx::sqlite::SqliteRow) -> Album {
    Album {
        id: row.get("id"),
        artist_name: row.get("artist_name"),
        album_name: row.get("album_name"),
        price_cents: row.get("price_cents"),
        image: row.get("image"),
        release_date: row.get("release_date"),
        category: row.get("category"),
        spotify_url: row.get("spotify_url"),
        average_rating: row.get("average_rating"),
        num_of_reviews: row.get("num_of_reviews"),
        created_at: row.get("created_at"),
    }
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS} FROM albums ORDER BY album_name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_album).collect())
}

pub async fn get(pool: &SqlitePool, id: AlbumId) -> Result<Option<Album>> {
    let row = sqlx::query(&format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_album))
}

pub async fn create(pool: &SqlitePool, album: CreateAlbum) -> Result<Album> {
    let result = sqlx::query(
        "INSERT INTO albums (artist_name, album_name, price_cents, image, release_date,
                category, spotify_url)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&album.artist_name)
    .bind(&album.album_name)
    .bind(album.price_cents)
    .bind(&album.image)
    .bind(&album.release_date)
    .bind(&album.category)
    .bind(&album.spotify_url)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Album", id))
}

pub async fn update(pool: &SqlitePool, id: AlbumId, update: UpdateAlbum) -> Result<Album> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Album", id))?;

    sqlx::query(
        "UPDATE albums SET artist_name = ?, album_name = ?, price_cents = ?, image = ?,
                release_date = ?, category = ?, spotify_url = ?
         WHERE id = ?",
    )
    .bind(update.artist_name.unwrap_or(current.artist_name))
    .bind(update.album_name.unwrap_or(current.album_name))
    .bind(update.price_cents.unwrap_or(current.price_cents))
    .bind(update.image.or(current.image))
    .bind(update.release_date.or(current.release_date))
    .bind(update.category.or(current.category))
    .bind(update.spotify_url.or(current.spotify_url))
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Album", id))
}

/// Filtered catalog listing with pagination and name sorting.
pub async fn filter(pool: &SqlitePool, filter: &AlbumFilter) -> Result<Vec<Album>> {
    let direction = match filter.order {
        Some(SortOrder::Desc) => "DESC",
        _ => "ASC",
    };
    let limit = filter.limit.unwrap_or(50).clamp(1, 200);
    let offset = filter.offset.unwrap_or(0).max(0);

    let rows = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS} FROM albums
         WHERE album_name LIKE ? AND artist_name LIKE ?
         ORDER BY album_name {direction}
         LIMIT ? OFFSET ?"
    ))
    .bind(like_pattern(filter.album_name.as_deref()))
    .bind(like_pattern(filter.artist_name.as_deref()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_album).collect())
}

fn like_pattern(value: Option<&str>) -> String {
    match value {
        Some(v) => format!("%{v}%"),
        None => "%".to_string(),
    }
}

/// Write the derived rating fields. Only the review slice should call
/// this; everything else treats the fields as read-only.
pub(crate) async fn set_rating_aggregates(
    pool: &SqlitePool,
    id: AlbumId,
    average_rating: i64,
    num_of_reviews: i64,
) -> Result<()> {
    sqlx::query("UPDATE albums SET average_rating = ?, num_of_reviews = ? WHERE id = ?")
        .bind(average_rating)
        .bind(num_of_reviews)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
