//! Move validation: every user-facing rejection comes back as a
//! structured `MoveValidity`, never as an error. Only genuine invariant
//! violations (actor missing from the player list) are fatal.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cards::Card;
use super::hands::{classify, score};
use super::state::GameState;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoveValidity {
    pub is_valid: bool,
    pub error_message: String,
}

impl MoveValidity {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: String::new(),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: message.into(),
        }
    }
}

/// Check a proposed move (ordered card list; empty = pass) against the
/// current state and acting client. Checks run in a fixed order and the
/// first failure wins.
pub fn check_move(
    state: &GameState,
    client_id: Uuid,
    mov: &[Card],
) -> Result<MoveValidity, DomainError> {
    // 1. Turn check.
    if state.current_player().id != client_id {
        return Ok(MoveValidity::rejected("it is not your turn"));
    }

    // 2. Ownership check. Hands hold distinct cards, so a move that
    // repeats a card can never be covered by the hand. The actor being
    // absent from the player list is an invariant violation, not a user
    // rejection.
    let player = state.require_player(client_id)?;
    let repeats_a_card = mov
        .iter()
        .enumerate()
        .any(|(i, card)| mov[..i].contains(card));
    if repeats_a_card || !mov.iter().all(|card| player.hand.contains(card)) {
        return Ok(MoveValidity::rejected(
            "you do not have the cards for this move",
        ));
    }

    // 3. The opening move of the match must include the 3 of Diamonds.
    if state.turn_number == 0 && !mov.contains(&Card::THREE_OF_DIAMONDS) {
        return Ok(MoveValidity::rejected(
            "the first move must include the 3 of diamonds",
        ));
    }

    let is_new_round = state.in_play.is_none();
    let is_pass = mov.is_empty();

    // 4. A fresh round cannot open with a pass.
    if is_new_round && is_pass {
        return Ok(MoveValidity::rejected(
            "cannot pass at a start of a new round",
        ));
    }
    if is_pass {
        return Ok(MoveValidity::valid());
    }

    // 5. A non-empty move must classify.
    let Some(move_type) = classify(mov) else {
        return Ok(MoveValidity::rejected("this is not a valid hand"));
    };

    // 6. A follow move must match the in-play size and strictly outscore it.
    if let Some(in_play) = &state.in_play {
        if in_play.cards.len() != mov.len() {
            return Ok(MoveValidity::rejected(
                "the move cannot be played on top of the hand in play",
            ));
        }

        let in_play_score = score(in_play.hand_type, &in_play.cards)?;
        let move_score = score(move_type, mov)?;
        if move_score <= in_play_score {
            return Ok(MoveValidity::rejected(
                "the move must be bigger than the hand in play",
            ));
        }
    }

    Ok(MoveValidity::valid())
}
