//! Per-viewer projection of the full game state. Other players' hands
//! only ever leave the server as a `cards_left` count.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cards::Card;
use super::state::{Avatar, GameEvent, GameState, InPlay};
use crate::errors::domain::DomainError;

/// A player's public-facing state: everything but the hand contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPlayer {
    pub id: Uuid,
    pub name: String,
    pub avatar: Avatar,
    pub cards_left: usize,
    pub has_passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_cards: Option<Vec<Card>>,
}

/// What one connected client is allowed to see of the match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerGameState {
    pub id: Uuid,
    pub hand: Vec<Card>,
    pub players: Vec<PublicPlayer>,
    pub in_play: Option<InPlay>,
    pub turn_number: u32,
    pub history: Vec<GameEvent>,
    pub winners: Vec<Uuid>,
}

/// Project the full state for one viewer. Fails when the viewer is not a
/// player in this match.
pub fn project(client_id: Uuid, state: &GameState) -> Result<PlayerGameState, DomainError> {
    let viewer = state.require_player(client_id)?;

    let players = state
        .players
        .iter()
        .map(|p| PublicPlayer {
            id: p.id,
            name: p.name.clone(),
            avatar: p.avatar,
            cards_left: p.hand.len(),
            has_passed: p.has_passed,
            middle_cards: p.middle_cards.clone(),
        })
        .collect();

    Ok(PlayerGameState {
        id: client_id,
        hand: viewer.hand.clone(),
        players,
        in_play: state.in_play.clone(),
        turn_number: state.turn_number,
        history: state.history.clone(),
        winners: state.winners.clone(),
    })
}
