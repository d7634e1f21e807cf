//! The single authoritative transition: apply a pre-validated move,
//! advance the turn, detect round resets and wins.

use tracing::debug;

use super::cards::Card;
use super::hands::classify;
use super::state::{GameAction, GameEvent, GameState, InPlay};
use crate::errors::domain::{DomainError, ValidationKind};

/// The match ends exactly when all players but one have emptied their
/// hands.
pub fn is_game_over(state: &GameState) -> bool {
    state.winners.len() == state.players.len() - 1
}

/// Apply a validated move (empty = pass) for the current player.
///
/// Mutation order: record the play, advance the turn counter past passed
/// and emptied seats, then reset the round if the scan comes back to the
/// in-play owner. A transition that ends the match also clears the table.
pub fn apply_move(state: &mut GameState, mov: &[Card]) -> Result<(), DomainError> {
    let cur_idx = state.current_player_index();
    let cur_id = state.players[cur_idx].id;
    let is_pass = mov.is_empty();

    let move_type = if is_pass {
        None
    } else {
        // Pre-validated by check_move; a non-classifiable move here means
        // the caller skipped validation.
        let t = classify(mov).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::UnclassifiableMove,
                "apply_move called with an unclassifiable move",
            )
        })?;
        Some(t)
    };

    if is_pass {
        state.players[cur_idx].has_passed = true;
    } else {
        let hand = &mut state.players[cur_idx].hand;
        hand.retain(|c| !mov.contains(c));
        state.in_play = Some(InPlay {
            owner_id: cur_id,
            cards: mov.to_vec(),
            // move_type is Some on every non-pass path
            hand_type: move_type.ok_or_else(|| {
                DomainError::validation(ValidationKind::UnclassifiableMove, "missing hand type")
            })?,
        });
    }

    if state.players[cur_idx].hand.is_empty() && !state.winners.contains(&cur_id) {
        debug!(player_id = %cur_id, placement = state.winners.len() + 1, "player emptied hand");
        state.winners.push(cur_id);
    }

    state.history.push(GameEvent {
        player_id: cur_id,
        action: if is_pass {
            GameAction::Passed
        } else {
            GameAction::Played
        },
        cards: (!is_pass).then(|| mov.to_vec()),
        hand_type: move_type,
    });

    advance_turn(state);

    // A finished match leaves a clean table; the landing seat stops
    // mattering once a single player holds cards.
    if is_game_over(state) {
        reset_round(state);
    }
    Ok(())
}

/// Scan forward from `turn_number + 1`, skipping players who passed or
/// emptied their hand. If the scan returns to the in-play owner, everyone
/// else is out of the round: clear the table and the pass flags.
fn advance_turn(state: &mut GameState) {
    let len = state.players.len() as u32;
    let eligible = (1..=len).map(|step| state.turn_number + step).find(|&t| {
        let p = &state.players[t as usize % len as usize];
        !p.has_passed && !p.hand.is_empty()
    });

    match eligible {
        Some(next) => {
            let next_id = state.players[next as usize % len as usize].id;
            if state
                .in_play
                .as_ref()
                .is_some_and(|in_play| in_play.owner_id == next_id)
            {
                debug!(owner_id = %next_id, "round reset, table cleared");
                reset_round(state);
            }
            state.turn_number = next;
        }
        None => {
            // The last two active players can exit in the same round (the
            // owner goes out, the rest pass). Reset rather than panic and
            // land on the first seat still holding cards.
            debug!("no eligible player in scan, resetting round");
            reset_round(state);
            let fallback = (1..=len)
                .map(|step| state.turn_number + step)
                .find(|&t| !state.players[t as usize % len as usize].hand.is_empty())
                .unwrap_or(state.turn_number + 1);
            state.turn_number = fallback;
        }
    }
}

fn reset_round(state: &mut GameState) {
    state.in_play = None;
    for p in &mut state.players {
        p.has_passed = false;
    }
}
