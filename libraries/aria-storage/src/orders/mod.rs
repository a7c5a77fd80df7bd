//! Order queries and lifecycle transitions
//!
//! Status changes go through [`update_status`], which re-reads the stored
//! status and rejects moves outside the transition graph defined on
//! [`OrderStatus`]. The stale-pending sweep and the cancelled-order purge
//! live here as bulk variants of the same rules.

use crate::error::{Result, StorageError};
use aria_core::types::{Order, OrderId, OrderItem, OrderStatus, UserId};
use sqlx::{Row, SqlitePool};

const ORDER_COLUMNS: &str =
    "id, user_id, status, subtotal_cents, tax, total_cents, payment_intent_id, created_at";

fn map_order(row: &sqlx::sqlite::SqliteRow, items: Vec<OrderItem>) -> Result<Order> {
    let status_str = row.get::<String, _>("status");
    let status = OrderStatus::parse(&status_str)
        .ok_or_else(|| StorageError::InvalidInput(format!("invalid order status: {status_str}")))?;

    Ok(Order {
        id: row.get("id"),
        user_id: row.get("user_id"),
        status,
        subtotal_cents: row.get("subtotal_cents"),
        tax: row.get("tax"),
        total_cents: row.get("total_cents"),
        payment_intent_id: row.get("payment_intent_id"),
        order_items: items,
        created_at: row.get("created_at"),
    })
}

async fn items_for(pool: &SqlitePool, order_id: OrderId) -> Result<Vec<OrderItem>> {
    let rows = sqlx::query("SELECT album_id, quantity FROM order_items WHERE order_id = ?")
        .bind(order_id)
        .fetch_all(pool)
        .await?;

    Ok(rows
        .iter()
        .map(|row| OrderItem {
            album_id: row.get("album_id"),
            quantity: row.get("quantity"),
        })
        .collect())
}

/// Persist a new `pending` order and its items in one transaction.
pub async fn create(
    pool: &SqlitePool,
    user_id: UserId,
    items: &[OrderItem],
    subtotal_cents: i64,
    tax: f64,
    total_cents: i64,
) -> Result<Order> {
    if items.is_empty() {
        return Err(StorageError::InvalidInput(
            "order must contain at least one item".to_string(),
        ));
    }

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO orders (user_id, status, subtotal_cents, tax, total_cents)
         VALUES (?, 'pending', ?, ?, ?)",
    )
    .bind(user_id)
    .bind(subtotal_cents)
    .bind(tax)
    .bind(total_cents)
    .execute(&mut *tx)
    .await?;

    let order_id = result.last_insert_rowid();

    for item in items {
        sqlx::query("INSERT INTO order_items (order_id, album_id, quantity) VALUES (?, ?, ?)")
            .bind(order_id)
            .bind(item.album_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    get(pool, order_id)
        .await?
        .ok_or_else(|| StorageError::not_found("Order", order_id))
}

pub async fn get(pool: &SqlitePool, id: OrderId) -> Result<Option<Order>> {
    let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let items = items_for(pool, row.get("id")).await?;
            Ok(Some(map_order(&row, items)?))
        }
        None => Ok(None),
    }
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Order>> {
    let rows = sqlx::query(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in &rows {
        let items = items_for(pool, row.get("id")).await?;
        orders.push(map_order(row, items)?);
    }
    Ok(orders)
}

pub async fn get_for_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Order>> {
    let rows = sqlx::query(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in &rows {
        let items = items_for(pool, row.get("id")).await?;
        orders.push(map_order(row, items)?);
    }
    Ok(orders)
}

pub async fn set_payment_intent(pool: &SqlitePool, id: OrderId, intent_id: &str) -> Result<()> {
    let result = sqlx::query("UPDATE orders SET payment_intent_id = ? WHERE id = ?")
        .bind(intent_id)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Order", id));
    }
    Ok(())
}

/// Apply a status transition, rejecting moves the graph does not allow.
pub async fn update_status(pool: &SqlitePool, id: OrderId, next: OrderStatus) -> Result<Order> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT status FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StorageError::not_found("Order", id))?;

    let current_str = row.get::<String, _>("status");
    let current = OrderStatus::parse(&current_str).ok_or_else(|| {
        StorageError::InvalidInput(format!("invalid order status: {current_str}"))
    })?;

    if !current.can_transition_to(next) {
        return Err(StorageError::InvalidInput(format!(
            "illegal order status transition: {} -> {}",
            current.as_str(),
            next.as_str()
        )));
    }

    sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
        .bind(next.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get(pool, id)
        .await?
        .ok_or_else(|| StorageError::not_found("Order", id))
}

/// Bulk-cancel `pending` orders created at or before `now - max_age_secs`.
/// Returns (order id, owner) pairs so callers can notify the owners.
pub async fn cancel_stale(
    pool: &SqlitePool,
    max_age_secs: i64,
) -> Result<Vec<(OrderId, UserId)>> {
    let cutoff = crate::now_ts() - max_age_secs;

    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "SELECT id, user_id FROM orders WHERE status = 'pending' AND created_at <= ?",
    )
    .bind(cutoff)
    .fetch_all(&mut *tx)
    .await?;

    let stale: Vec<(OrderId, UserId)> = rows
        .iter()
        .map(|row| (row.get("id"), row.get("user_id")))
        .collect();

    if !stale.is_empty() {
        sqlx::query(
            "UPDATE orders SET status = 'cancelled' WHERE status = 'pending' AND created_at <= ?",
        )
        .bind(cutoff)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(stale)
}

/// Delete cancelled orders older than the retention window. Items go with
/// them via `ON DELETE CASCADE`. Returns the number of orders removed.
pub async fn purge_cancelled(pool: &SqlitePool, retention_secs: i64) -> Result<u64> {
    let cutoff = crate::now_ts() - retention_secs;

    let result = sqlx::query("DELETE FROM orders WHERE status = 'cancelled' AND created_at <= ?")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Test/maintenance helper: backdate an order's creation timestamp.
pub async fn set_created_at(pool: &SqlitePool, id: OrderId, created_at: i64) -> Result<()> {
    sqlx::query("UPDATE orders SET created_at = ? WHERE id = ?")
        .bind(created_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
