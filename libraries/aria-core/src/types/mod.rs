mod album;
mod chat;
mod forum;
mod listening;
mod order;
mod review;
mod user;
mod wishlist;

pub use album::{Album, AlbumFilter, AlbumId, CreateAlbum, SortOrder, UpdateAlbum};
pub use chat::{ChatMessage, CHAT_HISTORY_CAP};
pub use forum::{Forum, ForumId};
pub use listening::{AlbumRecommendation, PurchasedAlbum, RecentlyListened};
pub use order::{CreateOrder, Order, OrderId, OrderItem, OrderStatus};
pub use review::{CreateReview, Review, ReviewId, UpdateReview};
pub use user::{Role, User, UserId};
pub use wishlist::{Wishlist, WishlistId};
