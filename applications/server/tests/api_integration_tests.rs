/// API integration tests
/// Tests complete HTTP request/response cycles with a real database
mod common;

use aria_core::types::Role;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{create_album, create_test_app, create_user_with_token, TEST_PASSWORD};
use tower::util::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(uri: &str, method: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;

    let response = app.router.oneshot(get_request("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_first_registered_user_is_admin() {
    let app = create_test_app().await;

    let body = serde_json::json!({
        "name": "First",
        "username": "first",
        "email": "first@example.com",
        "password": TEST_PASSWORD,
    });
    let response = app
        .router
        .clone()
        .oneshot(json_request("/api/auth/register", "POST", None, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    // Second registration is a regular user
    let body = serde_json::json!({
        "name": "Second",
        "username": "second",
        "email": "second@example.com",
        "password": TEST_PASSWORD,
    });
    let response = app
        .router
        .oneshot(json_request("/api/auth/register", "POST", None, body))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = create_test_app().await;
    create_user_with_token(&app, "dup@example.com", Role::User).await;

    let body = serde_json::json!({
        "name": "Dup",
        "username": "dup",
        "email": "dup@example.com",
        "password": TEST_PASSWORD,
    });
    let response = app
        .router
        .oneshot(json_request("/api/auth/register", "POST", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let app = create_test_app().await;

    let body = serde_json::json!({
        "name": "Shorty",
        "username": "shorty",
        "email": "shorty@example.com",
        "password": "abc",
    });
    let response = app
        .router
        .oneshot(json_request("/api/auth/register", "POST", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_flow() {
    let app = create_test_app().await;
    create_user_with_token(&app, "login@example.com", Role::User).await;

    let body = serde_json::json!({
        "email": "login@example.com",
        "password": TEST_PASSWORD,
    });
    let response = app
        .router
        .clone()
        .oneshot(json_request("/api/auth/login", "POST", None, body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let token = body["access_token"].as_str().unwrap().to_string();

    // Token opens protected routes
    let response = app
        .router
        .oneshot(get_request("/api/orders/mine", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app().await;
    create_user_with_token(&app, "login@example.com", Role::User).await;

    let body = serde_json::json!({
        "email": "login@example.com",
        "password": "wrong-password",
    });
    let response = app
        .router
        .oneshot(json_request("/api/auth/login", "POST", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unauthenticated_error_body_is_json() {
    let app = create_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/orders/mine", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["error"].is_string());

    // A garbage token gets the same shape
    let response = app
        .router
        .oneshot(get_request("/api/orders/mine", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = create_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/orders/mine", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .oneshot(json_request(
            "/api/orders",
            "POST",
            None,
            serde_json::json!({"orderItems": [], "subtotal": 0, "tax": 0.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_listing_is_admin_only_and_has_no_password() {
    let app = create_test_app().await;
    let (_, user_token) = create_user_with_token(&app, "user@example.com", Role::User).await;
    let (_, admin_token) = create_user_with_token(&app, "admin@example.com", Role::Admin).await;

    let response = app
        .router
        .clone()
        .oneshot(get_request("/api/users", Some(&user_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .router
        .oneshot(get_request("/api/users", Some(&admin_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("password_hash").is_none());
    }
}

#[tokio::test]
async fn test_album_management_is_admin_only() {
    let app = create_test_app().await;
    let (_, user_token) = create_user_with_token(&app, "user@example.com", Role::User).await;
    let (_, admin_token) = create_user_with_token(&app, "admin@example.com", Role::Admin).await;

    let album = serde_json::json!({
        "artistName": "Kraftwerk",
        "albumName": "Computer World",
        "price": 1099,
    });

    let response = app
        .router
        .clone()
        .oneshot(json_request("/api/albums", "POST", Some(&user_token), album.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .router
        .clone()
        .oneshot(json_request("/api/albums", "POST", Some(&admin_token), album))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["albumName"], "Computer World");
    assert_eq!(created["price"], 1099);

    // The catalog is public
    let response = app
        .router
        .oneshot(get_request("/api/albums", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let albums = body_json(response).await;
    assert_eq!(albums.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_missing_album_is_404() {
    let app = create_test_app().await;

    let response = app
        .router
        .oneshot(get_request("/api/albums/999", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_album_filter_is_public() {
    let app = create_test_app().await;
    create_album(&app, "Kraftwerk", "Autobahn", 999).await;
    create_album(&app, "Neu!", "Neu! 75", 999).await;

    let response = app
        .router
        .oneshot(get_request("/api/albums/filter?artistName=kraft", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let albums = body_json(response).await;
    assert_eq!(albums.as_array().unwrap().len(), 1);
    assert_eq!(albums[0]["albumName"], "Autobahn");
}

#[tokio::test]
async fn test_create_order_empty_items_is_400() {
    let app = create_test_app().await;
    let (_, token) = create_user_with_token(&app, "buyer@example.com", Role::User).await;

    let body = serde_json::json!({
        "orderItems": [],
        "subtotal": 0,
        "tax": 0.0,
    });
    let response = app
        .router
        .oneshot(json_request("/api/orders", "POST", Some(&token), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing persisted
    let orders = aria_storage::orders::get_all(&app.state.pool).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_create_order_unreachable_provider_is_500() {
    let app = create_test_app().await;
    let (_, token) = create_user_with_token(&app, "buyer@example.com", Role::User).await;
    let album = create_album(&app, "Cluster", "Zuckerzeit", 1000).await;

    let body = serde_json::json!({
        "orderItems": [{"album": album, "quantity": 1}],
        "subtotal": 100,
        "tax": 0.1,
    });
    let response = app
        .router
        .oneshot(json_request("/api/orders", "POST", Some(&token), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Payment initiation failed");

    // The order was persisted pending with the computed total; the
    // sweeper owns its cleanup
    let orders = aria_storage::orders::get_all(&app.state.pool).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].subtotal_cents, 100);
    assert_eq!(orders[0].total_cents, 110);
}

#[tokio::test]
async fn test_order_reads_reconcile_stale_pending() {
    let app = create_test_app().await;
    let (user_id, token) = create_user_with_token(&app, "buyer@example.com", Role::User).await;
    let album = create_album(&app, "Harmonia", "Musik von Harmonia", 999).await;

    let order = aria_storage::orders::create(
        &app.state.pool,
        user_id,
        &[aria_core::types::OrderItem {
            album_id: album,
            quantity: 1,
        }],
        999,
        0.0,
        999,
    )
    .await
    .unwrap();

    // Backdate past the one-hour test window
    aria_storage::orders::set_created_at(&app.state.pool, order.id, aria_storage::now_ts() - 7200)
        .await
        .unwrap();

    let response = app
        .router
        .oneshot(get_request("/api/orders/mine", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let orders = body_json(response).await;
    assert_eq!(orders[0]["orderStatus"], "cancelled");
}

#[tokio::test]
async fn test_order_visibility_owner_or_admin() {
    let app = create_test_app().await;
    let (owner_id, owner_token) = create_user_with_token(&app, "owner@example.com", Role::User).await;
    let (_, other_token) = create_user_with_token(&app, "other@example.com", Role::User).await;
    let (_, admin_token) = create_user_with_token(&app, "admin@example.com", Role::Admin).await;
    let album = create_album(&app, "Can", "Future Days", 999).await;

    let order = aria_storage::orders::create(
        &app.state.pool,
        owner_id,
        &[aria_core::types::OrderItem {
            album_id: album,
            quantity: 1,
        }],
        999,
        0.0,
        999,
    )
    .await
    .unwrap();
    let uri = format!("/api/orders/{}", order.id);

    let response = app
        .router
        .clone()
        .oneshot(get_request(&uri, Some(&owner_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(get_request(&uri, Some(&other_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .router
        .oneshot(get_request(&uri, Some(&admin_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_review_is_409() {
    let app = create_test_app().await;
    let (_, token) = create_user_with_token(&app, "reviewer@example.com", Role::User).await;
    let album = create_album(&app, "Faust", "Faust IV", 999).await;

    let review = serde_json::json!({
        "album": album,
        "rating": 5,
        "title": "Great",
        "comment": "Still great",
    });

    let response = app
        .router
        .clone()
        .oneshot(json_request("/api/reviews", "POST", Some(&token), review.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(json_request("/api/reviews", "POST", Some(&token), review))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_review_update_is_author_only() {
    let app = create_test_app().await;
    let (author_id, _) = create_user_with_token(&app, "author@example.com", Role::User).await;
    let (_, other_token) = create_user_with_token(&app, "other@example.com", Role::User).await;
    let album = create_album(&app, "Popol Vuh", "Hosianna Mantra", 999).await;

    let review = aria_storage::reviews::create(
        &app.state.pool,
        author_id,
        aria_core::types::CreateReview {
            album_id: album,
            rating: 4,
            title: "Nice".to_string(),
            comment: "Very nice".to_string(),
        },
    )
    .await
    .unwrap();

    let response = app
        .router
        .oneshot(json_request(
            &format!("/api/reviews/{}", review.id),
            "PATCH",
            Some(&other_token),
            serde_json::json!({"rating": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_reviews_by_album_is_public() {
    let app = create_test_app().await;
    let (author_id, _) = create_user_with_token(&app, "author@example.com", Role::User).await;
    let album = create_album(&app, "Tangerine Dream", "Phaedra", 999).await;

    aria_storage::reviews::create(
        &app.state.pool,
        author_id,
        aria_core::types::CreateReview {
            album_id: album,
            rating: 5,
            title: "Classic".to_string(),
            comment: "A classic".to_string(),
        },
    )
    .await
    .unwrap();

    let response = app
        .router
        .oneshot(get_request(&format!("/api/reviews/album/{album}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let reviews = body_json(response).await;
    assert_eq!(reviews.as_array().unwrap().len(), 1);
    assert_eq!(reviews[0]["rating"], 5);
}

#[tokio::test]
async fn test_wishlist_flow_and_ownership() {
    let app = create_test_app().await;
    let (_, owner_token) = create_user_with_token(&app, "owner@example.com", Role::User).await;
    let (_, other_token) = create_user_with_token(&app, "other@example.com", Role::User).await;
    let album = create_album(&app, "Ash Ra Tempel", "Ash Ra Tempel", 999).await;

    // Lazily created on first request
    let response = app
        .router
        .clone()
        .oneshot(json_request("/api/wishlists", "POST", Some(&owner_token), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let wishlist = body_json(response).await;
    let wishlist_id = wishlist["id"].as_i64().unwrap();
    assert_eq!(wishlist["albums"].as_array().unwrap().len(), 0);

    let add_uri = format!("/api/wishlists/{wishlist_id}/add_album/{album}");
    let response = app
        .router
        .clone()
        .oneshot(json_request(&add_uri, "PATCH", Some(&owner_token), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let wishlist = body_json(response).await;
    assert_eq!(wishlist["albums"][0], album);

    // Someone else's wishlist is off limits
    let response = app
        .router
        .clone()
        .oneshot(json_request(&add_uri, "PATCH", Some(&other_token), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Unknown albums are rejected
    let response = app
        .router
        .oneshot(json_request(
            &format!("/api/wishlists/{wishlist_id}/add_album/999"),
            "PATCH",
            Some(&owner_token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_password_requires_old_password() {
    let app = create_test_app().await;
    let (_, token) = create_user_with_token(&app, "user@example.com", Role::User).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "/api/users/update_password",
            "PATCH",
            Some(&token),
            serde_json::json!({"oldPassword": "wrong", "newPassword": "new-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .oneshot(json_request(
            "/api/users/update_password",
            "PATCH",
            Some(&token),
            serde_json::json!({"oldPassword": TEST_PASSWORD, "newPassword": "new-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_password_does_not_reveal_accounts() {
    let app = create_test_app().await;

    let response = app
        .router
        .oneshot(json_request(
            "/api/auth/forgot_password",
            "POST",
            None,
            serde_json::json!({"email": "ghost@example.com"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app().await;

    let request = Request::builder()
        .uri("/api/auth/login")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not valid json"))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
