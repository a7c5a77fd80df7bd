/// Room registry for realtime fan-out
///
/// Rooms are lazily created broadcast channels. Delivery is best-effort
/// at-most-once; receivers that lag are dropped by broadcast semantics
/// and simply miss messages.
use aria_core::types::{AlbumId, UserId};
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;

const ROOM_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Room {
    /// Per-user notification room (order cancellations etc.)
    User(UserId),
    /// Per-album chat room
    Album(AlbumId),
}

pub struct RoomRegistry {
    rooms: RwLock<HashMap<Room, broadcast::Sender<String>>>,
    /// Playback signals go to every connected client
    global: broadcast::Sender<String>,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomRegistry {
    pub fn new() -> Self {
        let (global, _) = broadcast::channel(ROOM_CAPACITY);
        Self {
            rooms: RwLock::new(HashMap::new()),
            global,
        }
    }

    fn sender(&self, room: Room) -> broadcast::Sender<String> {
        if let Some(sender) = self.rooms.read().expect("room lock poisoned").get(&room) {
            return sender.clone();
        }

        let mut rooms = self.rooms.write().expect("room lock poisoned");
        rooms
            .entry(room)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .clone()
    }

    /// Subscribe to a room, creating it on first use.
    pub fn subscribe(&self, room: Room) -> broadcast::Receiver<String> {
        self.sender(room).subscribe()
    }

    /// Subscribe to the global channel.
    pub fn subscribe_global(&self) -> broadcast::Receiver<String> {
        self.global.subscribe()
    }

    /// Send a payload to a room. A room with no subscribers swallows the
    /// message.
    pub fn emit(&self, room: Room, payload: String) {
        let _ = self.sender(room).send(payload);
    }

    /// Broadcast a payload to every connected client.
    pub fn emit_global(&self, payload: String) {
        let _ = self.global.send(payload);
    }
}
