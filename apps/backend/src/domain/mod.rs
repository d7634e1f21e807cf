//! Domain layer: pure game rules, no I/O.

pub mod cards;
pub mod dealing;
pub mod fixtures;
pub mod hands;
pub mod player_view;
pub mod state;
pub mod transition;
pub mod validate;

#[cfg(test)]
mod test_gens;

#[cfg(test)]
mod tests_cards;
#[cfg(test)]
mod tests_dealing;
#[cfg(test)]
mod tests_props;
#[cfg(test)]
mod tests_validate;

// Re-exports for ergonomics
pub use cards::{ordered_deck, try_parse_cards, Card, Rank, Suit};
pub use hands::{classify, representative_card, score, HandType};
pub use player_view::{project, PlayerGameState, PublicPlayer};
pub use state::{Avatar, GameAction, GameEvent, GameState, InPlay, Player};
pub use transition::{apply_move, is_game_over};
pub use validate::{check_move, MoveValidity};
