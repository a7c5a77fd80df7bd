//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using real SQLite files (not
//! in-memory) to match production behavior and properly test migrations,
//! constraints, and indexes.

use aria_core::types::{CreateAlbum, Role, UserId};
use aria_storage::users::NewUser;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = aria_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        aria_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: create a user account
pub async fn create_test_user(pool: &SqlitePool, email: &str, role: Role) -> UserId {
    let user = aria_storage::users::create(
        pool,
        NewUser {
            name: "Test User".to_string(),
            username: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$test-hash".to_string(),
            role,
        },
    )
    .await
    .expect("Failed to create test user");

    user.id
}

/// Test fixture: create a catalog album
pub async fn create_test_album(pool: &SqlitePool, artist: &str, name: &str, price_cents: i64) -> i64 {
    let album = aria_storage::albums::create(
        pool,
        CreateAlbum {
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
    .expect("Failed to create test album");

    album.id
}
