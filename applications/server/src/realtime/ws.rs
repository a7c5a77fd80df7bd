/// WebSocket endpoint for chat, notifications, and listening signals
///
/// Client -> Server (JSON):
/// ```json
/// {"event": "join:user_notifications"}
/// {"event": "join:album_chat", "data": {"albumId": 1}}
/// {"event": "chat:album", "data": {"albumId": 1, "message": "hi"}}
/// {"event": "listening-to-album-play", "data": {"albumId": 1}}
/// ```
///
/// Server -> Client (JSON):
/// ```json
/// {"event": "chat:history", "data": [ ... ]}
/// {"event": "chat:album", "data": { ... }}
/// {"event": "orders:cancelled", "data": {"orderId": 9}}
/// ```
///
/// Browsers cannot set headers on WebSocket requests, so the access token
/// rides in the `?token=` query parameter instead.
use crate::error::{Result, ServerError};
use crate::realtime::{Room, RoomRegistry};
use crate::state::AppState;
use aria_core::types::{AlbumId, ChatMessage, OrderId, UserId};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tokio::sync::{broadcast, mpsc};

const CHAT_HISTORY_LIMIT: i64 = 100;

/// Events the client may send
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data")]
enum ClientEvent {
    #[serde(rename = "join:user_notifications")]
    JoinUserNotifications,
    #[serde(rename = "join:album_chat")]
    JoinAlbumChat(AlbumRef),
    #[serde(rename = "chat:album")]
    ChatAlbum(ChatPayload),
    #[serde(rename = "listening-to-album-play")]
    ListeningPlay(AlbumRef),
    #[serde(rename = "listening-to-album-pause")]
    ListeningPause(AlbumRef),
    #[serde(rename = "listening-to-album-leave")]
    ListeningLeave(AlbumRef),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumRef {
    album_id: AlbumId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatPayload {
    album_id: AlbumId,
    message: String,
}

/// Events the server pushes to clients
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "chat:album")]
    ChatAlbum(ChatMessage),
    #[serde(rename = "chat:history")]
    ChatHistory(Vec<ChatMessage>),
    #[serde(rename = "orders:cancelled")]
    #[serde(rename_all = "camelCase")]
    OrderCancelled { order_id: OrderId },
    #[serde(rename = "listening-to-album-play")]
    #[serde(rename_all = "camelCase")]
    ListeningPlay { album_id: AlbumId, user_id: UserId },
    #[serde(rename = "listening-to-album-pause")]
    #[serde(rename_all = "camelCase")]
    ListeningPause { album_id: AlbumId, user_id: UserId },
    #[serde(rename = "listening-to-album-leave")]
    #[serde(rename_all = "camelCase")]
    ListeningLeave { album_id: AlbumId, user_id: UserId },
}

impl ServerEvent {
    /// Serialize to the wire payload. Serialization of these shapes
    /// cannot fail.
    pub fn to_payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct WsParams {
    token: String,
}

/// WebSocket upgrade handler. Authenticates before upgrading.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> Result<Response> {
    let identity = state
        .auth_service
        .verify_access_token(&params.token)
        .map_err(|_| ServerError::Auth("Invalid token".to_string()))?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity.user_id)))
}

/// Handle an individual WebSocket connection.
///
/// One task forwards outbound payloads from an mpsc channel to the
/// socket; joining a room spawns a task that pipes that room's broadcast
/// receiver into the same channel. A room is joined at most once per
/// connection, so a re-sent join never duplicates deliveries. The
/// receive loop below reads client events until the socket closes.
async fn handle_socket(socket: WebSocket, state: AppState, user_id: UserId) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (tx, mut rx) = mpsc::channel::<String>(64);
    let mut joined: HashSet<Room> = HashSet::new();

    let sender_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    // Playback signals are global; every connection hears them
    let mut forward_tasks = vec![spawn_forwarder(state.rooms.subscribe_global(), tx.clone())];

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let event: ClientEvent = match serde_json::from_str(&text) {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!("invalid WebSocket event: {e}");
                        continue;
                    }
                };

                match event {
                    ClientEvent::JoinUserNotifications => {
                        join_room(
                            &mut joined,
                            &state.rooms,
                            Room::User(user_id),
                            &tx,
                            &mut forward_tasks,
                        );
                    }
                    ClientEvent::JoinAlbumChat(album) => {
                        let room = Room::Album(album.album_id);
                        if !join_room(&mut joined, &state.rooms, room, &tx, &mut forward_tasks) {
                            continue;
                        }

                        match aria_storage::chat::recent_for_album(
                            &state.pool,
                            album.album_id,
                            CHAT_HISTORY_LIMIT,
                        )
                        .await
                        {
                            Ok(history) => {
                                let payload = ServerEvent::ChatHistory(history).to_payload();
                                if tx.send(payload).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => tracing::error!("failed to load chat history: {e}"),
                        }
                    }
                    ClientEvent::ChatAlbum(chat) => {
                        match aria_storage::chat::append(
                            &state.pool,
                            chat.album_id,
                            user_id,
                            &chat.message,
                        )
                        .await
                        {
                            Ok(message) => {
                                let album_id = message.album_id;
                                state.rooms.emit(
                                    Room::Album(album_id),
                                    ServerEvent::ChatAlbum(message).to_payload(),
                                );
                            }
                            Err(e) => tracing::error!("failed to persist chat message: {e}"),
                        }
                    }
                    ClientEvent::ListeningPlay(album) => {
                        if let Err(e) =
                            aria_storage::listening::record_listen(&state.pool, user_id, album.album_id)
                                .await
                        {
                            tracing::error!("failed to record listen: {e}");
                        }
                        state.rooms.emit_global(
                            ServerEvent::ListeningPlay {
                                album_id: album.album_id,
                                user_id,
                            }
                            .to_payload(),
                        );
                    }
                    ClientEvent::ListeningPause(album) => {
                        state.rooms.emit_global(
                            ServerEvent::ListeningPause {
                                album_id: album.album_id,
                                user_id,
                            }
                            .to_payload(),
                        );
                    }
                    ClientEvent::ListeningLeave(album) => {
                        state.rooms.emit_global(
                            ServerEvent::ListeningLeave {
                                album_id: album.album_id,
                                user_id,
                            }
                            .to_payload(),
                        );
                    }
                }
            }
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping (handled by the protocol layer)
        }
    }

    // Cleanup
    for task in forward_tasks {
        task.abort();
    }
    sender_task.abort();
}

/// Join a room for this connection, wiring its broadcast receiver into
/// the outbound channel. Returns false (and does nothing) if the
/// connection already joined the room.
fn join_room(
    joined: &mut HashSet<Room>,
    rooms: &RoomRegistry,
    room: Room,
    tx: &mpsc::Sender<String>,
    forward_tasks: &mut Vec<tokio::task::JoinHandle<()>>,
) -> bool {
    if !joined.insert(room) {
        return false;
    }
    forward_tasks.push(spawn_forwarder(rooms.subscribe(room), tx.clone()));
    true
}

/// Pipe a room's broadcast receiver into the connection's outbound
/// channel. Lagged receivers skip ahead and keep going.
fn spawn_forwarder(
    mut room_rx: broadcast::Receiver<String>,
    tx: mpsc::Sender<String>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match room_rx.recv().await {
                Ok(payload) => {
                    if tx.send(payload).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("WebSocket receiver lagged, skipped {skipped} messages");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
