use std::collections::HashSet;

use crate::domain::cards::{ordered_deck, try_parse_cards, Card, Rank, Suit};
use crate::domain::fixtures::CardFixtures;
use crate::errors::domain::{DomainError, ValidationKind};

#[test]
fn parse_and_display_agree() {
    for token in ["3D", "TC", "JH", "QS", "KD", "AC", "2S"] {
        let card = token.parse::<Card>().unwrap();
        assert_eq!(card.to_string(), token);
    }
}

#[test]
fn parse_rejects_bad_tokens() {
    for token in ["", "3", "3DX", "1D", "3X", "d3", "10D"] {
        let err = token.parse::<Card>().unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::ParseCard, _)
        ));
    }
}

#[test]
fn rank_dominates_suit_in_ordering() {
    let low = "2D".parse::<Card>().unwrap();
    let high = "2S".parse::<Card>().unwrap();
    assert!(low < high);

    // Any Two beats any Ace
    let ace_of_spades = "AS".parse::<Card>().unwrap();
    assert!(ace_of_spades < low);

    // Three of Diamonds is the global minimum
    let deck = ordered_deck();
    assert_eq!(
        deck.iter().min().copied().unwrap(),
        Card::THREE_OF_DIAMONDS
    );
    assert_eq!(deck.iter().max().copied().unwrap(), high);
}

#[test]
fn ordered_deck_is_52_unique_cards() {
    let deck = ordered_deck();
    assert_eq!(deck.len(), 52);
    let unique: HashSet<Card> = deck.into_iter().collect();
    assert_eq!(unique.len(), 52);
}

#[test]
fn serde_uses_two_char_tokens() {
    let cards = CardFixtures::parse_hardcoded(&["3D", "2S"]);
    let json = serde_json::to_string(&cards).unwrap();
    assert_eq!(json, r#"["3D","2S"]"#);

    let back: Vec<Card> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cards);

    assert!(serde_json::from_str::<Card>(r#""ZZ""#).is_err());
}

#[test]
fn try_parse_cards_fails_on_first_bad_token() {
    assert_eq!(try_parse_cards(["3D", "4C"]).unwrap().len(), 2);
    assert!(try_parse_cards(["3D", "??"]).is_err());
}

#[test]
fn rank_indices_follow_game_order() {
    assert_eq!(Rank::Three.index(), 0);
    assert_eq!(Rank::Ace.index(), 11);
    assert_eq!(Rank::Two.index(), 12);
    assert_eq!(Suit::Diamonds.index(), 0);
    assert_eq!(Suit::Spades.index(), 3);
}
