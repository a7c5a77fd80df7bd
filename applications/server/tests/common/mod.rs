/// Common test utilities and fixtures
use aria_core::types::Role;
use aria_server::{
    create_router,
    realtime::RoomRegistry,
    services::{AuthService, Mailer, OrderService, PaymentClient},
    state::AppState,
};
use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Everything a router test needs. The temp dir keeps the database file
/// alive for the duration of the test.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

/// Build a full application with a fresh database. The payment provider
/// points at an unreachable address, so checkout exercises the payment
/// error path unless a test overrides it.
pub async fn create_test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let pool = aria_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    aria_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let auth_service = Arc::new(AuthService::new(
        "test-secret-key".to_string(),
        1, // 1 hour access
        1, // 1 day refresh
    ));

    let payment = Arc::new(PaymentClient::new(
        "http://127.0.0.1:1".to_string(),
        "sk_test".to_string(),
    ));

    let email = aria_server::ServerConfig::default().email; // disabled
    let mailer = Arc::new(Mailer::new(&email).expect("Failed to build mailer"));

    let rooms = Arc::new(RoomRegistry::new());

    let orders = Arc::new(OrderService::new(
        pool.clone(),
        Arc::clone(&payment),
        Arc::clone(&mailer),
        Arc::clone(&rooms),
        "usd".to_string(),
        3600,
        86_400,
    ));

    let state = AppState::new(pool, auth_service, payment, mailer, orders, rooms, 900);
    let router = create_router(state.clone());

    TestApp {
        router,
        state,
        _temp_dir: temp_dir,
    }
}

/// Create a user directly in storage and mint an access token.
pub async fn create_user_with_token(
    app: &TestApp,
    email: &str,
    role: Role,
) -> (aria_core::types::UserId, String) {
    let password_hash = app
        .state
        .auth_service
        .hash_password(TEST_PASSWORD)
        .expect("Failed to hash password");

    let user = aria_storage::users::create(
        &app.state.pool,
        aria_storage::users::NewUser {
            name: "Test User".to_string(),
            username: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password_hash,
            role,
        },
    )
    .await
    .expect("Failed to create test user");

    let token = app
        .state
        .auth_service
        .create_access_token(user.id, user.role)
        .expect("Failed to create token");

    (user.id, token)
}

/// Create a catalog album directly in storage.
pub async fn create_album(app: &TestApp, artist: &str, name: &str, price_cents: i64) -> i64 {
    aria_storage::albums::create(
        &app.state.pool,
        aria_core::types::CreateAlbum {
            artist_name: artist.to_string(),
            album_name: name.to_string(),
            price_cents,
            image: None,
            release_date: None,
            category: None,
            spotify_url: None,
        },
    )
    .await
    .expect("Failed to create test album")
    .id
}
