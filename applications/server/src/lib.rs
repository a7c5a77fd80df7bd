//! Aria Store Server Library
//!
//! Digital album storefront backend: catalog, reviews, wishlists, orders
//! with payment intents, and a realtime gateway for chat and notifications.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod jobs;
pub mod middleware;
pub mod realtime;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{auth::AuthService, mailer::Mailer, orders::OrderService, payment::PaymentClient};
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application router.
pub fn create_router(app_state: AppState) -> Router {
    let auth_service = Arc::clone(&app_state.auth_service);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/refresh", post(api::auth::refresh))
        .route("/auth/forgot_password", post(api::auth::forgot_password))
        .route("/auth/reset_password", post(api::auth::reset_password))
        .route("/albums", get(api::albums::list_albums))
        .route("/albums/filter", get(api::albums::filter_albums))
        .route("/albums/:id", get(api::albums::get_album))
        .route("/reviews/album/:album_id", get(api::reviews::reviews_for_album))
        .route("/ws", get(realtime::ws_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Catalog management
        .route("/albums", post(api::albums::create_album))
        .route("/albums/:id", patch(api::albums::update_album))
        // Orders
        .route("/orders", post(api::orders::create_order))
        .route("/orders", get(api::orders::list_orders))
        .route("/orders/mine", get(api::orders::list_my_orders))
        .route("/orders/:id", get(api::orders::get_order))
        .route("/orders/:id/status", patch(api::orders::update_order_status))
        // Reviews
        .route("/reviews", get(api::reviews::list_reviews))
        .route("/reviews", post(api::reviews::create_review))
        .route("/reviews/:id", patch(api::reviews::update_review))
        .route("/reviews/:id", delete(api::reviews::delete_review))
        // Wishlists
        .route("/wishlists", post(api::wishlists::get_or_create))
        .route(
            "/wishlists/:id/add_album/:album_id",
            patch(api::wishlists::add_album),
        )
        .route(
            "/wishlists/:id/remove_album/:album_id",
            patch(api::wishlists::remove_album),
        )
        // Users
        .route("/users", get(api::users::list_users))
        .route(
            "/users/update_current_user",
            patch(api::users::update_current_user),
        )
        .route("/users/update_password", patch(api::users::update_password))
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id", delete(api::users::delete_user))
        // Forums
        .route("/forums", get(api::forums::list_forums))
        .route("/forums", post(api::forums::create_forum))
        .route("/forums/:id/join", post(api::forums::join_forum))
        // Listening history and recommendations
        .route(
            "/recently-listened/:user_id",
            get(api::listening::recently_listened),
        )
        .route(
            "/recommendations/:user_id",
            get(api::listening::recommendations),
        )
        .layer(axum_middleware::from_fn_with_state(
            auth_service,
            middleware::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
