//! Shuffle, round-robin deal, and turn-order determination.

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use super::cards::{ordered_deck, Card};
use super::state::{Avatar, GameAction, GameEvent, GameState, Player};
use crate::errors::domain::{DomainError, ValidationKind};

/// Lobby client identity carried into the deal.
#[derive(Debug, Clone)]
pub struct SeatProfile {
    pub id: Uuid,
    pub name: String,
    pub avatar: Avatar,
}

/// Uniformly random permutation of the full 52-card deck.
pub fn shuffled_deck() -> Vec<Card> {
    let mut rng = rand::rng();
    shuffled_deck_with(&mut rng)
}

/// Fisher-Yates over the ordered deck with a caller-supplied RNG, so
/// tests can shuffle deterministically.
pub fn shuffled_deck_with<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = ordered_deck();
    deck.shuffle(rng);
    deck
}

/// Round-robin distribute `floor(len/n)*n` cards into `n` equal hands.
/// The remainder is returned separately, never dropped.
pub fn deal(deck: &[Card], n: usize) -> (Vec<Vec<Card>>, Vec<Card>) {
    let mut hands: Vec<Vec<Card>> = vec![Vec::with_capacity(deck.len() / n + 1); n];
    let cutoff = deck.len() - deck.len() % n;

    for (i, &card) in deck[..cutoff].iter().enumerate() {
        hands[i % n].push(card);
    }

    (hands, deck[cutoff..].to_vec())
}

/// Rotate the player list so the holder of the 3 of Diamonds sits first,
/// preserving the relative cyclic order of the rest.
pub fn determine_turn_order(players: Vec<Player>) -> Result<Vec<Player>, DomainError> {
    let first = players
        .iter()
        .position(|p| p.hand.contains(&Card::THREE_OF_DIAMONDS))
        .ok_or_else(|| {
            DomainError::validation(
                ValidationKind::Other,
                "No player holds the 3 of Diamonds",
            )
        })?;

    let len = players.len();
    let mut ordered = Vec::with_capacity(len);
    let mut rotated: Vec<Option<Player>> = players.into_iter().map(Some).collect();
    for i in first..first + len {
        if let Some(p) = rotated[i % len].take() {
            ordered.push(p);
        }
    }
    Ok(ordered)
}

/// Shuffle, deal, grant the leftover to the 3-of-Diamonds holder, and
/// rotate the turn order. Accepts exactly 3 or 4 players.
pub fn init_game(clients: &[SeatProfile]) -> Result<GameState, DomainError> {
    init_game_from_deck(clients, shuffled_deck())
}

/// Deterministic variant of [`init_game`] over a pre-shuffled deck.
pub fn init_game_from_deck(
    clients: &[SeatProfile],
    deck: Vec<Card>,
) -> Result<GameState, DomainError> {
    if !(3..=4).contains(&clients.len()) {
        return Err(DomainError::validation(
            ValidationKind::InvalidPlayerCount,
            format!(
                "Error initializing game: invalid number of players found ({})",
                clients.len()
            ),
        ));
    }

    let (mut hands, leftover) = deal(&deck, clients.len());

    // The 3 of Diamonds can itself land in the leftover; granting the
    // leftover to the first hand then guarantees a holder exists.
    let holder = hands
        .iter()
        .position(|h| h.contains(&Card::THREE_OF_DIAMONDS))
        .unwrap_or(0);

    let players: Vec<Player> = clients
        .iter()
        .enumerate()
        .map(|(idx, client)| {
            let mut hand = std::mem::take(&mut hands[idx]);
            let middle_cards = if idx == holder && !leftover.is_empty() {
                hand.extend_from_slice(&leftover);
                Some(leftover.clone())
            } else {
                None
            };
            Player {
                id: client.id,
                name: client.name.clone(),
                avatar: client.avatar,
                hand,
                has_passed: false,
                middle_cards,
            }
        })
        .collect();

    let ordered = determine_turn_order(players)?;
    let first_player = ordered[0].id;

    Ok(GameState {
        players: ordered,
        in_play: None,
        turn_number: 0,
        history: vec![GameEvent {
            player_id: first_player,
            action: GameAction::Received,
            cards: Some(leftover),
            hand_type: None,
        }],
        winners: Vec::new(),
    })
}
