/// API route modules
pub mod albums;
pub mod auth;
pub mod forums;
pub mod health;
pub mod listening;
pub mod orders;
pub mod reviews;
pub mod users;
pub mod wishlists;
