//! Listening-history types: recently listened, purchases, recommendations

use super::{AlbumId, UserId};
use serde::{Deserialize, Serialize};

/// A playback event recorded when a user starts listening to an album
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyListened {
    pub id: i64,
    pub user_id: UserId,
    pub album_id: AlbumId,
    pub listened_at: i64,
}

/// Join record linking a user to an album they have bought. Written when
/// an order completes; distinct from a wishlist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedAlbum {
    pub user_id: UserId,
    pub album_id: AlbumId,
    pub purchased_at: i64,
}

/// A scored album recommendation for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRecommendation {
    pub user_id: UserId,
    pub album_id: AlbumId,
    pub score: f64,
}
