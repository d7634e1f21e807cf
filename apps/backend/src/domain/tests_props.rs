use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::cards::{ordered_deck, Card};
use crate::domain::dealing::{deal, shuffled_deck_with};
use crate::domain::fixtures::CardFixtures;
use crate::domain::hands::{classify, score, HandType};
use crate::domain::test_gens;

/// Weak and strong sample hands for every hand type, for cross-type
/// score comparisons.
fn classified_hands() -> Vec<(HandType, Vec<Card>)> {
    let table: &[(HandType, &[&str])] = &[
        (HandType::Single, &["3D"]),
        (HandType::Single, &["2S"]),
        (HandType::Pair, &["5H", "5S"]),
        (HandType::Pair, &["KD", "KC"]),
        (HandType::Triple, &["7D", "7C", "7H"]),
        (HandType::Triple, &["AD", "AC", "AS"]),
        (HandType::Quad, &["4D", "4C", "4H", "4S"]),
        (HandType::Quad, &["9D", "9C", "9H", "9S"]),
        (HandType::Straight, &["3D", "4C", "5H", "6S", "7D"]),
        (HandType::Straight, &["TD", "JC", "QH", "KS", "AD"]),
        (HandType::Flush, &["3H", "6H", "9H", "JH", "KH"]),
        (HandType::Flush, &["4S", "7S", "8S", "QS", "2S"]),
        (HandType::FullHouse, &["6D", "6C", "6H", "8C", "8S"]),
        (HandType::FullHouse, &["QD", "QC", "QH", "3C", "3S"]),
        (HandType::FourPlusOne, &["5D", "5C", "5H", "5S", "9D"]),
        (HandType::FourPlusOne, &["TD", "TC", "TH", "TS", "3C"]),
        (HandType::StraightFlush, &["3H", "4H", "5H", "6H", "7H"]),
        (HandType::StraightFlush, &["9C", "TC", "JC", "QC", "KC"]),
    ];
    table
        .iter()
        .map(|(t, tokens)| (*t, CardFixtures::parse_hardcoded(tokens)))
        .collect()
}

fn classified_hand() -> impl Strategy<Value = (HandType, Vec<Card>)> {
    prop::sample::select(classified_hands())
}

proptest! {
    #[test]
    fn shuffle_is_a_permutation_of_the_deck(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut shuffled = shuffled_deck_with(&mut rng);
        shuffled.sort();

        let mut expected = ordered_deck();
        expected.sort();
        prop_assert_eq!(shuffled, expected);
    }

    #[test]
    fn deal_conserves_every_card(deck in test_gens::deck(), n in 3usize..=4) {
        let (hands, leftover) = deal(&deck, n);

        prop_assert_eq!(hands.len(), n);
        let per_hand = 52 / n;
        prop_assert!(hands.iter().all(|h| h.len() == per_hand));
        prop_assert_eq!(leftover.len(), 52 % n);

        let mut all: Vec<_> = hands.into_iter().flatten().chain(leftover).collect();
        all.sort();
        let mut expected = ordered_deck();
        expected.sort();
        prop_assert_eq!(all, expected);
    }

    #[test]
    fn classified_hands_always_score(cards in test_gens::unique_cards(5)) {
        if let Some(hand_type) = classify(&cards) {
            prop_assert!(score(hand_type, &cards).is_ok());
        }
    }

    #[test]
    fn singles_always_classify(card in test_gens::card()) {
        prop_assert_eq!(classify(&[card]), Some(HandType::Single));
    }

    #[test]
    fn pairs_require_matching_ranks(cards in test_gens::unique_cards(2)) {
        let expected = if cards[0].rank == cards[1].rank {
            Some(HandType::Pair)
        } else {
            None
        };
        prop_assert_eq!(classify(&cards), expected);
    }

    #[test]
    fn scores_are_monotonic_across_hand_types(
        (type_a, hand_a) in classified_hand(),
        (type_b, hand_b) in classified_hand(),
    ) {
        prop_assume!(type_a != type_b);

        // Each sample hand classifies as the type it is tabled under.
        prop_assert_eq!(classify(&hand_a), Some(type_a));
        prop_assert_eq!(classify(&hand_b), Some(type_b));

        let score_a = score(type_a, &hand_a).unwrap();
        let score_b = score(type_b, &hand_b).unwrap();
        prop_assert_eq!(type_a < type_b, score_a < score_b);
    }

    #[test]
    fn single_scores_follow_card_order(cards in test_gens::unique_cards(2)) {
        let low = cards.iter().min().copied().unwrap();
        let high = cards.iter().max().copied().unwrap();
        let low_score = score(HandType::Single, &[low]).unwrap();
        let high_score = score(HandType::Single, &[high]).unwrap();
        prop_assert!(low_score < high_score);
    }
}
