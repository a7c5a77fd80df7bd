//! Review types

use super::{AlbumId, UserId};
use serde::{Deserialize, Serialize};

pub type ReviewId = i64;

/// An album review. At most one per (album, user) pair, enforced by a
/// database unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub album_id: AlbumId,
    pub user_id: UserId,
    /// Star rating in [1, 5]
    pub rating: i64,
    pub title: String,
    pub comment: String,
    pub created_at: i64,
}

/// Data for creating a review; the author comes from the session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    #[serde(alias = "album")]
    pub album_id: AlbumId,
    pub rating: i64,
    pub title: String,
    pub comment: String,
}

impl CreateReview {
    pub fn validate(&self) -> crate::Result<()> {
        validate_rating(self.rating)
    }
}

/// Partial review update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReview {
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl UpdateReview {
    pub fn validate(&self) -> crate::Result<()> {
        match self.rating {
            Some(rating) => validate_rating(rating),
            None => Ok(()),
        }
    }
}

fn validate_rating(rating: i64) -> crate::Result<()> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(crate::AriaError::invalid_input(
            "rating must be between 1 and 5",
        ))
    }
}
