//! Album chat history
//!
//! The history behaves like a capped collection: appends evict the oldest
//! rows once the overall table exceeds [`CHAT_HISTORY_CAP`].

use crate::error::{Result, StorageError};
use aria_core::types::{AlbumId, ChatMessage, UserId, CHAT_HISTORY_CAP};
use sqlx::{Row, SqlitePool};

fn map_message(row: &sqlx::sqlite::SqliteRow) -> ChatMessage {
    ChatMessage {
        id: row.get("id"),
        album_id: row.get("album_id"),
        user_id: row.get("user_id"),
        message: row.get("message"),
        created_at: row.get("created_at"),
    }
}

/// Append a message and evict anything beyond the newest
/// `CHAT_HISTORY_CAP` rows.
pub async fn append(
    pool: &SqlitePool,
    album_id: AlbumId,
    user_id: UserId,
    message: &str,
) -> Result<ChatMessage> {
    let result = sqlx::query("INSERT INTO chat_messages (album_id, user_id, message) VALUES (?, ?, ?)")
        .bind(album_id)
        .bind(user_id)
        .bind(message)
        .execute(pool)
        .await?;

    let id = result.last_insert_rowid();

    sqlx::query(
        "DELETE FROM chat_messages WHERE id NOT IN (
             SELECT id FROM chat_messages ORDER BY id DESC LIMIT ?
         )",
    )
    .bind(CHAT_HISTORY_CAP)
    .execute(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("ChatMessage", id))
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<ChatMessage>> {
    let row = sqlx::query(
        "SELECT id, album_id, user_id, message, created_at FROM chat_messages WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(map_message))
}

/// Most recent messages for an album room, oldest first.
pub async fn recent_for_album(
    pool: &SqlitePool,
    album_id: AlbumId,
    limit: i64,
) -> Result<Vec<ChatMessage>> {
    let rows = sqlx::query(
        "SELECT id, album_id, user_id, message, created_at FROM (
             SELECT id, album_id, user_id, message, created_at
             FROM chat_messages WHERE album_id = ?
             ORDER BY id DESC LIMIT ?
         ) ORDER BY id ASC",
    )
    .bind(album_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_message).collect())
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
