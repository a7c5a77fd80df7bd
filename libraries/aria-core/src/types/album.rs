//! Album catalog types

use serde::{Deserialize, Serialize};

pub type AlbumId = i64;

/// Spotify URLs must live under this prefix to be accepted.
pub const SPOTIFY_URL_PREFIX: &str = "https://open.spotify.com/";

/// A catalog album
///
/// `average_rating` and `num_of_reviews` are derived from the review table
/// and recomputed whenever a review is created, updated, or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    pub artist_name: String,
    pub album_name: String,
    /// Price in integer cents, never negative
    #[serde(rename = "price")]
    pub price_cents: i64,
    pub image: Option<String>,
    pub release_date: Option<String>,
    pub category: Option<String>,
    pub spotify_url: Option<String>,
    pub average_rating: i64,
    pub num_of_reviews: i64,
    pub created_at: i64,
}

/// Data for creating a new album
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbum {
    pub artist_name: String,
    pub album_name: String,
    #[serde(rename = "price")]
    pub price_cents: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

impl CreateAlbum {
    /// Field-level validation shared by create and update paths.
    pub fn validate(&self) -> crate::Result<()> {
        validate_album_fields(
            &self.artist_name,
            &self.album_name,
            self.price_cents,
            self.spotify_url.as_deref(),
        )
    }
}

/// Partial album update; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbum {
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default, rename = "price")]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub spotify_url: Option<String>,
}

/// Sort direction for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filter parameters for `GET /albums/filter`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumFilter {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub order: Option<SortOrder>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
}

fn validate_album_fields(
    artist_name: &str,
    album_name: &str,
    price_cents: i64,
    spotify_url: Option<&str>,
) -> crate::Result<()> {
    if artist_name.trim().is_empty() {
        return Err(crate::AriaError::invalid_input("artist name is required"));
    }
    if album_name.trim().is_empty() {
        return Err(crate::AriaError::invalid_input("album name is required"));
    }
    if price_cents < 0 {
        return Err(crate::AriaError::invalid_input("price must not be negative"));
    }
    if let Some(url) = spotify_url {
        if !url.starts_with(SPOTIFY_URL_PREFIX) {
            return Err(crate::AriaError::invalid_input(
                "spotify url must start with https://open.spotify.com/",
            ));
        }
    }
    Ok(())
}

impl UpdateAlbum {
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(price) = self.price_cents {
            if price < 0 {
                return Err(crate::AriaError::invalid_input("price must not be negative"));
            }
        }
        if let Some(url) = self.spotify_url.as_deref() {
            if !url.starts_with(SPOTIFY_URL_PREFIX) {
                return Err(crate::AriaError::invalid_input(
                    "spotify url must start with https://open.spotify.com/",
                ));
            }
        }
        Ok(())
    }
}
