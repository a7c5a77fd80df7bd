//! Album chat types

use super::{AlbumId, UserId};
use serde::{Deserialize, Serialize};

/// Maximum number of chat messages retained across all albums; the oldest
/// rows are evicted once the cap is exceeded.
pub const CHAT_HISTORY_CAP: i64 = 1000;

/// A single album-room chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub album_id: AlbumId,
    pub user_id: UserId,
    pub message: String,
    pub created_at: i64,
}
