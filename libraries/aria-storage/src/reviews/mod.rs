//! Review queries and album rating aggregation
//!
//! Every write path here recomputes the owning album's `average_rating`
//! and `num_of_reviews` so the derived fields never drift from the
//! review table.

use crate::error::{Result, StorageError};
use aria_core::types::{AlbumId, CreateReview, Review, ReviewId, UpdateReview, UserId};
use sqlx::{Row, SqlitePool};

const REVIEW_COLUMNS: &str = "id, album_id, user_id, rating, title, comment, created_at";

fn map_review(row: &sqlx::sqlite::SqliteRow) -> Review {
    Review {
        id: row.get("id"),
        album_id: row.get("album_id"),
        user_id: row.get("user_id"),
        rating: row.get("rating"),
        title: row.get("title"),
        comment: row.get("comment"),
        created_at: row.get("created_at"),
    }
}

pub async fn create(pool: &SqlitePool, user_id: UserId, review: CreateReview) -> Result<Review> {
    let result = sqlx::query(
        "INSERT INTO reviews (album_id, user_id, rating, title, comment)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(review.album_id)
    .bind(user_id)
    .bind(review.rating)
    .bind(&review.title)
    .bind(&review.comment)
    .execute(pool)
    .await
    .map_err(|e| StorageError::from_sqlx(e, "user has already reviewed this album"))?;

    let id = result.last_insert_rowid();
    recompute_album_aggregates(pool, review.album_id).await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Review", id))
}

pub async fn get(pool: &SqlitePool, id: ReviewId) -> Result<Option<Review>> {
    let row = sqlx::query(&format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_review))
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Review>> {
    let rows = sqlx::query(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_review).collect())
}

pub async fn for_album(pool: &SqlitePool, album_id: AlbumId) -> Result<Vec<Review>> {
    let rows = sqlx::query(&format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE album_id = ? ORDER BY created_at DESC"
    ))
    .bind(album_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_review).collect())
}

pub async fn update(pool: &SqlitePool, id: ReviewId, update: UpdateReview) -> Result<Review> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Review", id))?;

    sqlx::query("UPDATE reviews SET rating = ?, title = ?, comment = ? WHERE id = ?")
        .bind(update.rating.unwrap_or(current.rating))
        .bind(update.title.unwrap_or(current.title))
        .bind(update.comment.unwrap_or(current.comment))
        .bind(id)
        .execute(pool)
        .await?;

    recompute_album_aggregates(pool, current.album_id).await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Review", id))
}

pub async fn delete(pool: &SqlitePool, id: ReviewId) -> Result<()> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Review", id))?;

    sqlx::query("DELETE FROM reviews WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    recompute_album_aggregates(pool, current.album_id).await?;
    Ok(())
}

/// Recompute `average_rating` (rounded mean) and `num_of_reviews` for an
/// album. Zero reviews resets both to 0.
pub async fn recompute_album_aggregates(pool: &SqlitePool, album_id: AlbumId) -> Result<()> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS num, COALESCE(AVG(rating), 0.0) AS avg_rating
         FROM reviews WHERE album_id = ?",
    )
    .bind(album_id)
    .fetch_one(pool)
    .await?;

    let num: i64 = row.get("num");
    let avg: f64 = row.get("avg_rating");
    let average_rating = if num == 0 { 0 } else { avg.round() as i64 };

    crate::albums::set_rating_aggregates(pool, album_id, average_rating, num).await
}
