/// Order lifecycle service
///
/// Owns the path from checkout to completion: validation, persistence,
/// payment-intent creation, stale-order reconciliation, and the side
/// effects of completing an order.
use crate::error::{Result, ServerError};
use crate::realtime::{Room, RoomRegistry, ServerEvent};
use crate::services::{Mailer, PaymentClient};
use aria_core::types::{CreateOrder, Order, OrderId, OrderStatus, UserId};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct OrderService {
    pool: SqlitePool,
    payment: Arc<PaymentClient>,
    mailer: Arc<Mailer>,
    rooms: Arc<RoomRegistry>,
    currency: String,
    stale_after_secs: i64,
    cancelled_retention_secs: i64,
}

/// A freshly created order together with the provider's client secret
#[derive(Debug)]
pub struct CheckoutResult {
    pub order: Order,
    pub client_secret: String,
}

impl OrderService {
    pub fn new(
        pool: SqlitePool,
        payment: Arc<PaymentClient>,
        mailer: Arc<Mailer>,
        rooms: Arc<RoomRegistry>,
        currency: String,
        stale_after_secs: i64,
        cancelled_retention_secs: i64,
    ) -> Self {
        Self {
            pool,
            payment,
            mailer,
            rooms,
            currency,
            stale_after_secs,
            cancelled_retention_secs,
        }
    }

    /// Create a `pending` order and request a payment intent for it.
    /// Storage failures on this path classify as payment-initiation
    /// errors alongside provider failures; only rejected input gets a 400.
    pub async fn create_order(&self, user_id: UserId, req: CreateOrder) -> Result<CheckoutResult> {
        req.validate().map_err(|e| ServerError::BadRequest(e.to_string()))?;

        // Every referenced album must exist
        for item in &req.order_items {
            if aria_storage::albums::get(&self.pool, item.album_id)
                .await
                .map_err(Self::checkout_error)?
                .is_none()
            {
                return Err(ServerError::BadRequest(format!(
                    "unknown album: {}",
                    item.album_id
                )));
            }
        }

        let total_cents = req.total_cents();
        let order = aria_storage::orders::create(
            &self.pool,
            user_id,
            &req.order_items,
            req.subtotal_cents,
            req.tax,
            total_cents,
        )
        .await
        .map_err(Self::checkout_error)?;

        let intent = self
            .payment
            .create_intent(order.id, total_cents, &self.currency)
            .await?;
        aria_storage::orders::set_payment_intent(&self.pool, order.id, &intent.id)
            .await
            .map_err(Self::checkout_error)?;

        let order = aria_storage::orders::get(&self.pool, order.id)
            .await
            .map_err(Self::checkout_error)?
            .ok_or_else(|| {
                ServerError::PaymentInitiation(format!("order {} missing after intent", order.id))
            })?;

        tracing::info!(
            "Order {} created for user {} ({} cents)",
            order.id,
            user_id,
            total_cents
        );

        Ok(CheckoutResult {
            order,
            client_secret: intent.client_secret,
        })
    }

    fn checkout_error(err: aria_storage::StorageError) -> ServerError {
        ServerError::PaymentInitiation(err.to_string())
    }

    /// Cancel pending orders older than the stale window and notify their
    /// owners. Runs on the sweeper tick and before every order read, so a
    /// read never observes a stale `pending` order.
    pub async fn reconcile_stale_orders(&self) -> Result<usize> {
        let cancelled = aria_storage::orders::cancel_stale(&self.pool, self.stale_after_secs).await?;

        for (order_id, owner) in &cancelled {
            tracing::info!("Order {} auto-cancelled (stale pending)", order_id);
            self.rooms.emit(
                Room::User(*owner),
                ServerEvent::OrderCancelled { order_id: *order_id }.to_payload(),
            );
        }

        Ok(cancelled.len())
    }

    /// Delete cancelled orders past the retention window.
    pub async fn purge_expired_cancelled(&self) -> Result<u64> {
        let removed =
            aria_storage::orders::purge_cancelled(&self.pool, self.cancelled_retention_secs)
                .await?;
        if removed > 0 {
            tracing::info!("Purged {} expired cancelled orders", removed);
        }
        Ok(removed)
    }

    /// Apply a status transition. Completing an order records the
    /// purchased albums and emails the buyer.
    pub async fn update_status(&self, order_id: OrderId, next: OrderStatus) -> Result<Order> {
        let order = aria_storage::orders::update_status(&self.pool, order_id, next).await?;

        if next == OrderStatus::Complete {
            let album_ids: Vec<_> = order.order_items.iter().map(|i| i.album_id).collect();
            aria_storage::listening::record_purchases(&self.pool, order.user_id, &album_ids)
                .await?;

            if let Some(user) = aria_storage::users::get(&self.pool, order.user_id).await? {
                if let Err(e) = self.mailer.send_order_completed(&user.email, order.id).await {
                    // Email failure must not roll back the completed order
                    tracing::warn!("Order completion email failed: {}", e);
                }
            }
        }

        Ok(order)
    }
}
