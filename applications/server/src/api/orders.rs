/// Order API routes
///
/// Every read path reconciles stale pending orders first, so clients
/// never observe an order the sweeper would have cancelled.
use crate::{
    error::{Result, ServerError},
    middleware::{require_admin, AuthenticatedUser},
    state::AppState,
};
use aria_core::types::{CreateOrder, Order, OrderId, OrderStatus};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub client_secret: String,
    pub order: Order,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(rename = "orderStatus", alias = "status")]
    pub status: OrderStatus,
}

/// POST /api/orders - Checkout
pub async fn create_order(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Json(req): Json<CreateOrder>,
) -> Result<Json<CheckoutResponse>> {
    let result = state.orders.create_order(auth.user_id, req).await?;

    Ok(Json(CheckoutResponse {
        client_secret: result.client_secret,
        order: result.order,
    }))
}

/// GET /api/orders - All orders (admin only)
pub async fn list_orders(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    require_admin(&auth)?;

    state.orders.reconcile_stale_orders().await?;
    let orders = aria_storage::orders::get_all(&state.pool).await?;
    Ok(Json(orders))
}

/// GET /api/orders/mine
pub async fn list_my_orders(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    state.orders.reconcile_stale_orders().await?;
    let orders = aria_storage::orders::get_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - Owner or admin
pub async fn get_order(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    state.orders.reconcile_stale_orders().await?;

    let order = aria_storage::orders::get(&state.pool, id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("Order {id}")))?;

    if order.user_id != auth.user_id && !auth.is_admin() {
        return Err(ServerError::Forbidden(
            "Cannot view another user's order".to_string(),
        ));
    }

    Ok(Json(order))
}

/// PATCH /api/orders/:id/status (admin only)
pub async fn update_order_status(
    auth: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    require_admin(&auth)?;

    let order = state.orders.update_status(id, req.status).await?;
    Ok(Json(order))
}
