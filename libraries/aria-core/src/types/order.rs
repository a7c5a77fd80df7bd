//! Order types and the status transition graph

use super::{AlbumId, UserId};
use serde::{Deserialize, Serialize};

pub type OrderId = i64;

/// Order lifecycle status.
///
/// Transitions form a strict directed graph enforced by
/// [`OrderStatus::can_transition_to`]; callers may not set arbitrary
/// statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    PaymentSuccessful,
    PaymentFailed,
    Cancelled,
    Complete,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::PaymentSuccessful => "payment_successful",
            OrderStatus::PaymentFailed => "payment_failed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Complete => "complete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "payment_successful" => Some(OrderStatus::PaymentSuccessful),
            "payment_failed" => Some(OrderStatus::PaymentFailed),
            "cancelled" => Some(OrderStatus::Cancelled),
            "complete" => Some(OrderStatus::Complete),
            _ => None,
        }
    }

    /// Legal transitions:
    ///
    /// - pending -> payment_successful | payment_failed | cancelled
    /// - payment_successful -> complete | cancelled
    /// - payment_failed -> pending | cancelled
    /// - cancelled, complete -> (terminal)
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, PaymentSuccessful)
                | (Pending, PaymentFailed)
                | (Pending, Cancelled)
                | (PaymentSuccessful, Complete)
                | (PaymentSuccessful, Cancelled)
                | (PaymentFailed, Pending)
                | (PaymentFailed, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Complete)
    }
}

/// An (album, quantity) pair within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Accepts `album` as an alias for clients that send the raw reference
    #[serde(alias = "album")]
    pub album_id: AlbumId,
    pub quantity: i64,
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    #[serde(rename = "orderStatus")]
    pub status: OrderStatus,
    /// Subtotal in integer cents
    #[serde(rename = "subtotal")]
    pub subtotal_cents: i64,
    /// Tax rate in [0, 1]
    pub tax: f64,
    /// `subtotal + round(subtotal * tax)`, computed at creation
    #[serde(rename = "total")]
    pub total_cents: i64,
    pub payment_intent_id: Option<String>,
    pub order_items: Vec<OrderItem>,
    pub created_at: i64,
}

/// Input for order creation; totals are computed server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub order_items: Vec<OrderItem>,
    #[serde(rename = "subtotal")]
    pub subtotal_cents: i64,
    pub tax: f64,
}

impl CreateOrder {
    pub fn validate(&self) -> crate::Result<()> {
        if self.order_items.is_empty() {
            return Err(crate::AriaError::invalid_input(
                "order must contain at least one item",
            ));
        }
        if self.order_items.iter().any(|item| item.quantity < 1) {
            return Err(crate::AriaError::invalid_input(
                "item quantity must be at least 1",
            ));
        }
        if self.subtotal_cents < 0 {
            return Err(crate::AriaError::invalid_input(
                "subtotal must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.tax) {
            return Err(crate::AriaError::invalid_input(
                "tax rate must be between 0 and 1",
            ));
        }
        Ok(())
    }

    /// Total in cents: subtotal plus tax, rounded to the nearest cent.
    pub fn total_cents(&self) -> i64 {
        self.subtotal_cents + (self.subtotal_cents as f64 * self.tax).round() as i64
    }
}
