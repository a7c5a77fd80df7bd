//! User account queries

use crate::error::{Result, StorageError};
use aria_core::types::{Role, User, UserId};
use sqlx::{Row, SqlitePool};

const USER_COLUMNS: &str = "id, name, username, email, password_hash, role, profile_image, \
     credit_card_hash, created_at";

fn map_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let role_str = row.get::<String, _>("role");
    let role = Role::parse(&role_str)
        .ok_or_else(|| StorageError::InvalidInput(format!("invalid role: {role_str}")))?;

    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role,
        profile_image: row.get("profile_image"),
        credit_card_hash: row.get("credit_card_hash"),
        created_at: row.get("created_at"),
    })
}

/// Fields for registering a new account; the password arrives pre-hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Profile fields a user may change about themselves
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_image: Option<String>,
    pub credit_card_hash: Option<String>,
}

pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    let result = sqlx::query(
        "INSERT INTO users (name, username, email, password_hash, role)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&user.name)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .execute(pool)
    .await
    .map_err(|e| StorageError::from_sqlx(e, "email already registered"))?;

    let id = result.last_insert_rowid();
    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id))
}

pub async fn get(pool: &SqlitePool, id: UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_user).transpose()
}

pub async fn get_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(map_user).transpose()
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY name"))
        .fetch_all(pool)
        .await?;

    rows.iter().map(map_user).collect()
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn update_profile(pool: &SqlitePool, id: UserId, update: ProfileUpdate) -> Result<User> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id))?;

    sqlx::query(
        "UPDATE users SET name = ?, username = ?, email = ?, profile_image = ?,
                credit_card_hash = ?
         WHERE id = ?",
    )
    .bind(update.name.unwrap_or(current.name))
    .bind(update.username.unwrap_or(current.username))
    .bind(update.email.unwrap_or(current.email))
    .bind(update.profile_image.or(current.profile_image))
    .bind(update.credit_card_hash.or(current.credit_card_hash))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| StorageError::from_sqlx(e, "email already registered"))?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", id))
}

pub async fn set_password_hash(pool: &SqlitePool, id: UserId, password_hash: &str) -> Result<()> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id));
    }
    Ok(())
}

/// Store a password-reset token and its expiry for the account behind
/// `email`. Returns the matched user, or `None` when the email is unknown
/// (callers deliberately do not reveal which).
pub async fn set_reset_token(
    pool: &SqlitePool,
    email: &str,
    token: &str,
    expires_at: i64,
) -> Result<Option<User>> {
    let user = get_by_email(pool, email).await?;
    let Some(user) = user else {
        return Ok(None);
    };

    sqlx::query(
        "UPDATE users SET password_reset_token = ?, password_reset_expires = ? WHERE id = ?",
    )
    .bind(token)
    .bind(expires_at)
    .bind(user.id)
    .execute(pool)
    .await?;

    Ok(Some(user))
}

/// Look up a user by an unexpired reset token.
pub async fn get_by_reset_token(pool: &SqlitePool, token: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users
         WHERE password_reset_token = ? AND password_reset_expires > ?"
    ))
    .bind(token)
    .bind(crate::now_ts())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_user).transpose()
}

pub async fn clear_reset_token(pool: &SqlitePool, id: UserId) -> Result<()> {
    sqlx::query(
        "UPDATE users SET password_reset_token = NULL, password_reset_expires = NULL
         WHERE id = ?",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("User", id));
    }
    Ok(())
}
