//! Aria Store Core
//!
//! Platform-agnostic domain types and error handling for the Aria Store
//! backend.
//!
//! This crate defines:
//! - **Domain Types**: `User`, `Album`, `Order`, `Review`, etc.
//! - **Closed Enums**: `Role` and `OrderStatus` with explicit capability and
//!   transition rules
//! - **Error Handling**: Unified `AriaError` and `Result` types

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{AriaError, Result};

pub use types::{
    // User
    Role, User, UserId,
    // Catalog
    Album, AlbumFilter, AlbumId, CreateAlbum, SortOrder, UpdateAlbum,
    // Orders
    CreateOrder, Order, OrderId, OrderItem, OrderStatus,
    // Reviews
    CreateReview, Review, ReviewId, UpdateReview,
    // Wishlists
    Wishlist, WishlistId,
    // Chat / forum
    ChatMessage, Forum, ForumId,
    // Listening history
    AlbumRecommendation, PurchasedAlbum, RecentlyListened,
};
