/// Realtime WebSocket gateway
pub mod rooms;
pub mod ws;

pub use rooms::{Room, RoomRegistry};
pub use ws::{ws_handler, ServerEvent};
