//! Listening history, purchases, and recommendations

use crate::error::Result;
use aria_core::types::{Album, AlbumId, UserId};
use sqlx::{Row, SqlitePool};

const ALBUM_COLUMNS: &str = "a.id, a.artist_name, a.album_name, a.price_cents, a.image, \
     a.release_date, a.category, a.spotify_url, a.average_rating, a.num_of_reviews, a.created_at";

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

/// Record that a user started listening to an album.
pub async fn record_listen(pool: &SqlitePool, user_id: UserId, album_id: AlbumId) -> Result<()> {
    sqlx::query("INSERT INTO recently_listened (user_id, album_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(album_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Albums a user listened to most recently, newest first, deduplicated.
pub async fn recent_for_user(
    pool: &SqlitePool,
    user_id: UserId,
    limit: i64,
) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS}, MAX(rl.listened_at) AS last_listen
         FROM recently_listened rl
         INNER JOIN albums a ON a.id = rl.album_id
         WHERE rl.user_id = ?
         GROUP BY a.id
         ORDER BY last_listen DESC
         LIMIT ?"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_album).collect())
}

/// Record purchases for a completed order's albums. Idempotent per
/// (user, album) pair.
pub async fn record_purchases(
    pool: &SqlitePool,
    user_id: UserId,
    album_ids: &[AlbumId],
) -> Result<()> {
    for album_id in album_ids {
        sqlx::query("INSERT OR IGNORE INTO purchased_albums (user_id, album_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(album_id)
            .execute(pool)
            .await?;
    }
    Ok(())
}

pub async fn purchased_for_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<AlbumId>> {
    let rows = sqlx::query(
        "SELECT album_id FROM purchased_albums WHERE user_id = ? ORDER BY purchased_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("album_id")).collect())
}

/// Replace a user's recommendation set with freshly scored entries.
pub async fn set_recommendations(
    pool: &SqlitePool,
    user_id: UserId,
    scored: &[(AlbumId, f64)],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM album_recommendations WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for (album_id, score) in scored {
        sqlx::query("INSERT INTO album_recommendations (user_id, album_id, score) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(album_id)
            .bind(score)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Rebuild a user's recommendation set from other users' listening
/// activity: each candidate album is scored by its play count, and
/// albums the user already owns are skipped. Returns the number of
/// recommendations written.
pub async fn refresh_recommendations(pool: &SqlitePool, user_id: UserId) -> Result<usize> {
    let rows = sqlx::query(
        "SELECT rl.album_id, COUNT(*) AS plays
         FROM recently_listened rl
         WHERE rl.user_id != ?
           AND rl.album_id NOT IN (SELECT album_id FROM purchased_albums WHERE user_id = ?)
         GROUP BY rl.album_id
         ORDER BY plays DESC",
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let scored: Vec<(AlbumId, f64)> = rows
        .iter()
        .map(|row| (row.get("album_id"), row.get::<i64, _>("plays") as f64))
        .collect();

    set_recommendations(pool, user_id, &scored).await?;
    Ok(scored.len())
}

/// Recommended albums for a user, best score first, excluding albums the
/// user already owns.
pub async fn recommendations_for_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Album>> {
    let rows = sqlx::query(&format!(
        "SELECT {ALBUM_COLUMNS}
         FROM album_recommendations ar
         INNER JOIN albums a ON a.id = ar.album_id
         WHERE ar.user_id = ?
           AND a.id NOT IN (SELECT album_id FROM purchased_albums WHERE user_id = ?)
         ORDER BY ar.score DESC"
    ))
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_album).collect())
}
