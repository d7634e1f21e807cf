// Proptest generators for domain types.
// Card sets are drawn from the ordered deck, so generated groups never
// contain duplicates.

use proptest::prelude::*;

use crate::domain::{ordered_deck, Card, Rank, Suit};

/// Generate a random Suit
pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Diamonds),
        Just(Suit::Clubs),
        Just(Suit::Hearts),
        Just(Suit::Spades),
    ]
}

/// Generate a random Rank
pub fn rank() -> impl Strategy<Value = Rank> {
    prop_oneof![
        Just(Rank::Three),
        Just(Rank::Four),
        Just(Rank::Five),
        Just(Rank::Six),
        Just(Rank::Seven),
        Just(Rank::Eight),
        Just(Rank::Nine),
        Just(Rank::Ten),
        Just(Rank::Jack),
        Just(Rank::Queen),
        Just(Rank::King),
        Just(Rank::Ace),
        Just(Rank::Two),
    ]
}

/// Generate a single Card
pub fn card() -> impl Strategy<Value = Card> {
    (rank(), suit()).prop_map(|(rank, suit)| Card { rank, suit })
}

/// Generate `n` distinct cards in a random order
pub fn unique_cards(n: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::sample::subsequence(ordered_deck(), n).prop_shuffle()
}

/// Generate a full 52-card deck permutation
pub fn deck() -> impl Strategy<Value = Vec<Card>> {
    Just(ordered_deck()).prop_shuffle()
}
