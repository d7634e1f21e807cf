use uuid::Uuid;

use crate::domain::cards::{ordered_deck, Card};
use crate::domain::dealing::{deal, determine_turn_order, init_game_from_deck, SeatProfile};
use crate::domain::fixtures::CardFixtures;
use crate::domain::state::{Avatar, GameAction, Player};
use crate::errors::domain::{DomainError, ValidationKind};

fn seats(n: usize) -> Vec<SeatProfile> {
    (0..n)
        .map(|i| SeatProfile {
            id: Uuid::new_v4(),
            name: format!("Player {}", i + 1),
            avatar: Avatar::Astro,
        })
        .collect()
}

fn player_with_hand(tokens: &[&str]) -> Player {
    Player {
        id: Uuid::new_v4(),
        name: "p".to_string(),
        avatar: Avatar::Astro,
        hand: CardFixtures::parse_hardcoded(tokens),
        has_passed: false,
        middle_cards: None,
    }
}

#[test]
fn deal_splits_evenly_and_returns_remainder() {
    let deck = ordered_deck();

    let (hands, leftover) = deal(&deck, 4);
    assert_eq!(hands.len(), 4);
    assert!(hands.iter().all(|h| h.len() == 13));
    assert!(leftover.is_empty());

    let (hands, leftover) = deal(&deck, 3);
    assert!(hands.iter().all(|h| h.len() == 17));
    assert_eq!(leftover.len(), 1);

    // Nothing dropped, nothing duplicated
    let mut all: Vec<Card> = hands.into_iter().flatten().chain(leftover).collect();
    all.sort();
    let mut expected = ordered_deck();
    expected.sort();
    assert_eq!(all, expected);
}

#[test]
fn turn_order_rotates_to_three_of_diamonds_holder() {
    let players = vec![
        player_with_hand(&["AS", "KH"]),
        player_with_hand(&["4C", "5H"]),
        player_with_hand(&["3D", "9C"]),
        player_with_hand(&["2S", "8D"]),
    ];
    let ids: Vec<Uuid> = players.iter().map(|p| p.id).collect();

    let ordered = determine_turn_order(players).unwrap();
    let ordered_ids: Vec<Uuid> = ordered.iter().map(|p| p.id).collect();

    // Holder first, cyclic order preserved
    assert_eq!(ordered_ids, vec![ids[2], ids[3], ids[0], ids[1]]);
}

#[test]
fn turn_order_fails_without_the_three_of_diamonds() {
    let players = vec![player_with_hand(&["AS"]), player_with_hand(&["KH"])];
    let err = determine_turn_order(players).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::Other, _)
    ));
}

#[test]
fn init_game_rejects_bad_player_counts() {
    for n in [0, 1, 2, 5] {
        let err = init_game_from_deck(&seats(n), ordered_deck()).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::InvalidPlayerCount, _)
        ));
    }
}

#[test]
fn init_game_four_players_deals_thirteen_each() {
    let state = init_game_from_deck(&seats(4), ordered_deck()).unwrap();

    assert_eq!(state.players.len(), 4);
    assert!(state.players.iter().all(|p| p.hand.len() == 13));
    assert!(state.players.iter().all(|p| p.middle_cards.is_none()));
    assert_eq!(state.turn_number, 0);
    assert!(state.in_play.is_none());
    assert!(state.winners.is_empty());

    // First in turn order holds the opening card
    assert!(state.players[0].hand.contains(&Card::THREE_OF_DIAMONDS));
}

#[test]
fn init_game_three_players_grants_leftover_to_opener() {
    let state = init_game_from_deck(&seats(3), ordered_deck()).unwrap();

    // Round-robin over the ordered deck puts the 3 of Diamonds and the
    // single leftover card in the same hand.
    let opener = &state.players[0];
    assert!(opener.hand.contains(&Card::THREE_OF_DIAMONDS));
    assert_eq!(opener.hand.len(), 18);
    assert_eq!(
        opener.middle_cards.as_deref(),
        Some(&["2S".parse::<Card>().unwrap()][..])
    );
    assert!(state.players[1..].iter().all(|p| p.hand.len() == 17));

    // The deal is recorded as the opening history event
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].action, GameAction::Received);
    assert_eq!(state.history[0].player_id, opener.id);
}
