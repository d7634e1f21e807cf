//! Wire protocol: closed tagged unions over the `{type, payload}`
//! envelope, matched exhaustively so a new message kind fails to compile
//! until every dispatcher handles it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::player_view::PlayerGameState;
use crate::domain::state::Avatar;
use crate::domain::Card;
use crate::services::rooms::Room;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    pub room_code: String,
    /// Previous client id, supplied on rejoin.
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<Avatar>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetReadyPayload {
    pub is_ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayMovePayload {
    #[serde(rename = "move")]
    pub mov: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientMsg {
    Join(JoinPayload),
    SetReady(SetReadyPayload),
    StartGame,
    ConnectToGame,
    PlayMove(PlayMovePayload),
}

/// Produced error categories; the wire strings match what the client
/// surfaces to users.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "Invalid Move")]
    InvalidMove,
    #[serde(rename = "Internal Server Error")]
    Generic,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerMsg {
    #[serde(rename_all = "camelCase")]
    RoomUpdated { client_id: Uuid, room: Room },
    #[serde(rename_all = "camelCase")]
    GameUpdated { game_state: PlayerGameState },
    Error {
        #[serde(rename = "type")]
        error_type: ErrorType,
        message: String,
    },
}
