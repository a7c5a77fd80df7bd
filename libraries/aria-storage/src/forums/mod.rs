//! Forum queries

use crate::error::{Result, StorageError};
use aria_core::types::{Forum, ForumId, UserId};
use sqlx::{Row, SqlitePool};

async fn participants_for(pool: &SqlitePool, forum_id: ForumId) -> Result<Vec<UserId>> {
    let rows = sqlx::query(
        "SELECT user_id FROM forum_participants WHERE forum_id = ? ORDER BY joined_at",
    )
    .bind(forum_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("user_id")).collect())
}

pub async fn create(pool: &SqlitePool, name: &str) -> Result<Forum> {
    let result = sqlx::query("INSERT INTO forums (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await
        .map_err(|e| StorageError::from_sqlx(e, "forum name already taken"))?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Forum", id))
}

pub async fn get(pool: &SqlitePool, id: ForumId) -> Result<Option<Forum>> {
    let row = sqlx::query("SELECT id, name, created_at FROM forums WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let participant_ids = participants_for(pool, row.get("id")).await?;
            Ok(Some(Forum {
                id: row.get("id"),
                name: row.get("name"),
                participant_ids,
                created_at: row.get("created_at"),
            }))
        }
        None => Ok(None),
    }
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Forum>> {
    let rows = sqlx::query("SELECT id, name, created_at FROM forums ORDER BY name")
        .fetch_all(pool)
        .await?;

    let mut forums = Vec::with_capacity(rows.len());
    for row in &rows {
        let participant_ids = participants_for(pool, row.get("id")).await?;
        forums.push(Forum {
            id: row.get("id"),
            name: row.get("name"),
            participant_ids,
            created_at: row.get("created_at"),
        });
    }
    Ok(forums)
}

/// Idempotent join; joining a forum twice is a no-op.
pub async fn join(pool: &SqlitePool, forum_id: ForumId, user_id: UserId) -> Result<Forum> {
    sqlx::query("INSERT OR IGNORE INTO forum_participants (forum_id, user_id) VALUES (?, ?)")
        .bind(forum_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    get(pool, forum_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Forum", forum_id))
}
