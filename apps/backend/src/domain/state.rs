//! Authoritative match state: players in fixed turn order, the hand in
//! play, the turn counter, and the append-only event history.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cards::Card;
use super::hands::HandType;
use crate::errors::domain::{DomainError, ValidationKind};

/// Selectable player avatars.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Avatar {
    #[default]
    Astro,
    Astrobear,
    Gorilla,
    Mouse,
}

/// One seat at the table. The hand is exclusively owned by the match;
/// other players only ever see it through the per-viewer projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub avatar: Avatar,
    pub hand: Vec<Card>,
    pub has_passed: bool,
    /// Leftover card(s) granted at deal time, when 52 does not divide
    /// evenly by the player count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_cards: Option<Vec<Card>>,
}

/// The most recently played, not-yet-beaten hand on the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InPlay {
    pub owner_id: Uuid,
    pub cards: Vec<Card>,
    #[serde(rename = "type")]
    pub hand_type: HandType,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameAction {
    Received,
    Played,
    Passed,
}

/// One append-only history entry per accepted transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub player_id: Uuid,
    pub action: GameAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub hand_type: Option<HandType>,
}

/// The authoritative server-side record of one in-progress match.
///
/// The player list order is the turn order, fixed once at deal time;
/// `turn_number` only ever increases and indexes into it modulo the
/// player count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub players: Vec<Player>,
    pub in_play: Option<InPlay>,
    pub turn_number: u32,
    pub history: Vec<GameEvent>,
    pub winners: Vec<Uuid>,
}

impl GameState {
    /// Seat index of the player expected to act.
    pub fn current_player_index(&self) -> usize {
        self.turn_number as usize % self.players.len()
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index()]
    }

    pub fn require_player(&self, client_id: Uuid) -> Result<&Player, DomainError> {
        self.players.iter().find(|p| p.id == client_id).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::UnknownPlayer,
                format!("Client {client_id} not found in game state"),
            )
        })
    }
}
