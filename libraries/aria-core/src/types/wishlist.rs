//! Wishlist types

use super::{AlbumId, UserId};
use serde::{Deserialize, Serialize};

pub type WishlistId = i64;

/// A user's wishlist. One per user; created lazily on first request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub id: WishlistId,
    pub user_id: UserId,
    #[serde(rename = "albums")]
    pub album_ids: Vec<AlbumId>,
    pub created_at: i64,
}
