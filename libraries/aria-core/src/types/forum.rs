//! Forum types

use super::UserId;
use serde::{Deserialize, Serialize};

pub type ForumId = i64;

/// A discussion forum; names are unique
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    pub id: ForumId,
    pub name: String,
    #[serde(rename = "participants")]
    pub participant_ids: Vec<UserId>,
    pub created_at: i64,
}
