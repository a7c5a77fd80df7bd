/// Shared application state
use crate::realtime::RoomRegistry;
use crate::services::{AuthService, Mailer, OrderService, PaymentClient};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub payment: Arc<PaymentClient>,
    pub mailer: Arc<Mailer>,
    pub orders: Arc<OrderService>,
    pub rooms: Arc<RoomRegistry>,
    /// How long password-reset tokens stay valid, in seconds
    pub reset_token_ttl_secs: i64,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        payment: Arc<PaymentClient>,
        mailer: Arc<Mailer>,
        orders: Arc<OrderService>,
        rooms: Arc<RoomRegistry>,
        reset_token_ttl_secs: i64,
    ) -> Self {
        Self {
            pool,
            auth_service,
            payment,
            mailer,
            orders,
            rooms,
            reset_token_ttl_secs,
        }
    }
}
