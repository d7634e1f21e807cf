use uuid::Uuid;

use crate::domain::fixtures::CardFixtures;
use crate::domain::hands::HandType;
use crate::domain::state::{Avatar, GameState, InPlay, Player};
use crate::domain::validate::check_move;

fn make_state(hands: &[&[&str]]) -> GameState {
    let players = hands
        .iter()
        .enumerate()
        .map(|(i, tokens)| Player {
            id: Uuid::new_v4(),
            name: format!("Player {}", i + 1),
            avatar: Avatar::Astro,
            hand: CardFixtures::parse_hardcoded(tokens),
            has_passed: false,
            middle_cards: None,
        })
        .collect();
    GameState {
        players,
        in_play: None,
        turn_number: 0,
        history: Vec::new(),
        winners: Vec::new(),
    }
}

fn set_in_play(state: &mut GameState, owner: usize, tokens: &[&str], hand_type: HandType) {
    state.in_play = Some(InPlay {
        owner_id: state.players[owner].id,
        cards: CardFixtures::parse_hardcoded(tokens),
        hand_type,
    });
}

#[test]
fn rejects_out_of_turn_moves() {
    let state = make_state(&[&["3D", "4C"], &["5H", "6S"], &["7D", "8C"]]);
    let late = state.players[1].id;
    let mov = CardFixtures::parse_hardcoded(&["5H"]);

    let validity = check_move(&state, late, &mov).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(validity.error_message, "it is not your turn");
}

#[test]
fn rejects_cards_the_player_does_not_hold() {
    let state = make_state(&[&["3D", "4C"], &["5H", "6S"], &["7D", "8C"]]);
    let actor = state.players[0].id;
    let mov = CardFixtures::parse_hardcoded(&["5H"]);

    let validity = check_move(&state, actor, &mov).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(
        validity.error_message,
        "you do not have the cards for this move"
    );
}

#[test]
fn rejects_a_move_that_repeats_a_held_card() {
    let mut state = make_state(&[&["3D", "9S"], &["5H", "6S"], &["7D", "8C"]]);
    state.turn_number = 3; // past the opening move, seat 0 again
    let actor = state.players[0].id;

    // A single 9S cannot be spent twice to fake a pair.
    let mov = CardFixtures::parse_hardcoded(&["9S", "9S"]);
    let validity = check_move(&state, actor, &mov).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(
        validity.error_message,
        "you do not have the cards for this move"
    );
}

#[test]
fn stranger_is_rejected_as_out_of_turn() {
    let state = make_state(&[&["3D", "4C"], &["5H", "6S"], &["7D", "8C"]]);
    let stranger = Uuid::new_v4();

    let validity = check_move(&state, stranger, &[]).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(validity.error_message, "it is not your turn");
}

#[test]
fn opening_move_must_include_the_three_of_diamonds() {
    let state = make_state(&[&["3D", "4C"], &["5H", "6S"], &["7D", "8C"]]);
    let opener = state.players[0].id;

    let without = CardFixtures::parse_hardcoded(&["4C"]);
    let validity = check_move(&state, opener, &without).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(
        validity.error_message,
        "the first move must include the 3 of diamonds"
    );

    let with = CardFixtures::parse_hardcoded(&["3D"]);
    assert!(check_move(&state, opener, &with).unwrap().is_valid);
}

#[test]
fn cannot_pass_when_opening_a_round() {
    let mut state = make_state(&[&["3D", "4C"], &["5H", "6S"], &["7D", "8C"]]);
    state.turn_number = 3; // past the opening move, seat 0 again
    let actor = state.players[0].id;

    let validity = check_move(&state, actor, &[]).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(
        validity.error_message,
        "cannot pass at a start of a new round"
    );
}

#[test]
fn pass_is_valid_mid_round() {
    let mut state = make_state(&[&["3D", "4C"], &["5H", "6S"], &["7D", "8C"]]);
    state.turn_number = 1;
    set_in_play(&mut state, 0, &["3D"], HandType::Single);
    let actor = state.players[1].id;

    assert!(check_move(&state, actor, &[]).unwrap().is_valid);
}

#[test]
fn rejects_unclassifiable_card_groups() {
    let mut state = make_state(&[&["3D", "4C"], &["5H", "6S"], &["7D", "8C"]]);
    state.turn_number = 3;
    let actor = state.players[0].id;
    let mov = CardFixtures::parse_hardcoded(&["3D", "4C"]);

    let validity = check_move(&state, actor, &mov).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(validity.error_message, "this is not a valid hand");
}

#[test]
fn follow_move_must_match_size() {
    let mut state = make_state(&[&["3D", "4C"], &["5H", "5S"], &["7D", "8C"]]);
    state.turn_number = 1;
    set_in_play(&mut state, 0, &["3D"], HandType::Single);
    let actor = state.players[1].id;
    let mov = CardFixtures::parse_hardcoded(&["5H", "5S"]);

    let validity = check_move(&state, actor, &mov).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(
        validity.error_message,
        "the move cannot be played on top of the hand in play"
    );
}

#[test]
fn follow_move_must_outscore_the_table() {
    let mut state = make_state(&[&["3D", "9S"], &["5H", "6S"], &["7D", "8C"]]);
    state.turn_number = 1;
    set_in_play(&mut state, 0, &["9S"], HandType::Single);
    let actor = state.players[1].id;

    let weaker = CardFixtures::parse_hardcoded(&["5H"]);
    let validity = check_move(&state, actor, &weaker).unwrap();
    assert!(!validity.is_valid);
    assert_eq!(
        validity.error_message,
        "the move must be bigger than the hand in play"
    );
}

#[test]
fn stronger_follow_move_is_accepted() {
    let mut state = make_state(&[&["3D", "9S"], &["TH", "6S"], &["7D", "8C"]]);
    state.turn_number = 1;
    set_in_play(&mut state, 0, &["9S"], HandType::Single);
    let actor = state.players[1].id;
    let mov = CardFixtures::parse_hardcoded(&["TH"]);

    assert!(check_move(&state, actor, &mov).unwrap().is_valid);
}
