//! Room registry: lobby membership, host/ready flags, connection status.
//!
//! Every mutation follows read-modify-publish: fetch the latest room
//! snapshot, compute the next one purely, persist it, then publish it on
//! `room:<code>` so every process fans it out. Two concurrent mutators
//! race last-write-wins; the window only covers membership operations.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::state::Avatar;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::store::{self, SetPolicy, SharedStore, ROOM_TTL_SECONDS};

const ROOM_CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const ROOM_CODE_LEN: usize = 6;
const ROOM_CAPACITY: usize = 3;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomClient {
    pub id: Uuid,
    pub name: String,
    pub avatar: Avatar,
    pub is_host: bool,
    pub is_ready: bool,
    pub status: ConnectionStatus,
}

/// A lobby grouping connected clients around one match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: String,
    pub connected_clients: Vec<RoomClient>,
    pub is_game_started: bool,
    pub is_game_over: bool,
}

fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Create an empty room under a fresh 6-character code, rejecting on
/// collision with an existing stored room.
pub async fn create_room(store: &dyn SharedStore) -> Result<String, DomainError> {
    let code = generate_room_code();
    let key = store::room_key(&code);

    if store.get(&key).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::RoomCodeCollision,
            "Error creating room code. Duplicate found.",
        ));
    }

    let room = Room {
        code: code.clone(),
        connected_clients: Vec::new(),
        is_game_started: false,
        is_game_over: false,
    };
    store::put_json(store, &key, &room, SetPolicy::Expire(ROOM_TTL_SECONDS)).await?;

    info!(room_code = %code, "room created");
    Ok(code)
}

pub async fn fetch_room(store: &dyn SharedStore, code: &str) -> Result<Room, DomainError> {
    store::get_json(store, &store::room_key(code))
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Room, format!("Room {code} not found")))
}

/// Persist the room snapshot with a fresh idle TTL and publish it on
/// the room channel. Any mutation pushes the expiry out, so only an
/// abandoned lobby ever lapses.
pub async fn save_and_publish_room(
    store: &dyn SharedStore,
    room: &Room,
) -> Result<(), DomainError> {
    let key = store::room_key(&room.code);
    store::put_json(store, &key, room, SetPolicy::Expire(ROOM_TTL_SECONDS)).await?;
    let payload = serde_json::to_string(room).map_err(|err| {
        DomainError::infra(
            crate::errors::domain::InfraErrorKind::Serde,
            format!("Failed to encode room payload: {err}"),
        )
    })?;
    store.publish(&key, &payload).await
}

/// Join a room, or reconnect a previously disconnected client.
///
/// A fresh joiner gets `Player N` and the default avatar when the join
/// omits them; the first joiner becomes host.
pub async fn join_room(
    store: &dyn SharedStore,
    code: &str,
    client_id: Uuid,
    name: Option<String>,
    avatar: Option<Avatar>,
) -> Result<Room, DomainError> {
    let mut room = fetch_room(store, code).await?;

    if let Some(existing) = room
        .connected_clients
        .iter_mut()
        .find(|c| c.id == client_id)
    {
        if existing.status == ConnectionStatus::Connected {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyConnected,
                "User is already connected.",
            ));
        }
        existing.status = ConnectionStatus::Connected;
        info!(room_code = %code, client_id = %client_id, "client reconnected");
        save_and_publish_room(store, &room).await?;
        return Ok(room);
    }

    if room.connected_clients.len() >= ROOM_CAPACITY {
        return Err(DomainError::conflict(
            ConflictKind::RoomFull,
            "Room is already full.",
        ));
    }

    let join_position = room.connected_clients.len() + 1;
    room.connected_clients.push(RoomClient {
        id: client_id,
        name: name.unwrap_or_else(|| format!("Player {join_position}")),
        avatar: avatar.unwrap_or_default(),
        is_host: room.connected_clients.is_empty(),
        is_ready: false,
        status: ConnectionStatus::Connected,
    });

    info!(room_code = %code, client_id = %client_id, "client joined");
    save_and_publish_room(store, &room).await?;
    Ok(room)
}

pub async fn update_ready_state(
    store: &dyn SharedStore,
    code: &str,
    client_id: Uuid,
    is_ready: bool,
) -> Result<Room, DomainError> {
    let mut room = fetch_room(store, code).await?;

    let client = room
        .connected_clients
        .iter_mut()
        .find(|c| c.id == client_id)
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Client,
                format!("Could not find client {client_id} in room {code}"),
            )
        })?;
    client.is_ready = is_ready;

    save_and_publish_room(store, &room).await?;
    Ok(room)
}

/// Remove a client from the room, reassigning host to the first
/// remaining client when the host left. An emptied room persists empty
/// until its idle TTL lapses.
pub async fn leave_room(
    store: &dyn SharedStore,
    code: &str,
    client_id: Uuid,
) -> Result<Room, DomainError> {
    let mut room = fetch_room(store, code).await?;

    let before = room.connected_clients.len();
    room.connected_clients.retain(|c| c.id != client_id);
    if room.connected_clients.len() == before {
        warn!(room_code = %code, client_id = %client_id, "leave for unknown client");
    }

    if let Some(first) = room.connected_clients.first_mut() {
        if !first.is_host {
            first.is_host = true;
        }
    }

    info!(room_code = %code, client_id = %client_id, "client left");
    save_and_publish_room(store, &room).await?;
    Ok(room)
}

/// Mark a client disconnected without removal, enabling rejoin.
pub async fn disconnect_client(
    store: &dyn SharedStore,
    code: &str,
    client_id: Uuid,
) -> Result<Room, DomainError> {
    let mut room = fetch_room(store, code).await?;

    let client = room
        .connected_clients
        .iter_mut()
        .find(|c| c.id == client_id)
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Client,
                format!("Could not find connected client {client_id}"),
            )
        })?;
    client.status = ConnectionStatus::Disconnected;

    info!(room_code = %code, client_id = %client_id, "client disconnected");
    save_and_publish_room(store, &room).await?;
    Ok(room)
}
