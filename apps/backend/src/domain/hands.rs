//! Hand evaluation: classification of card groups into the nine legal
//! hand types, plus representative-card extraction and scoring.

use serde::{Deserialize, Serialize};

use super::cards::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

const HAND_TYPE_MULTIPLIER: i32 = 1000;
const RANK_MULTIPLIER: i32 = 10;

/// The nine legal hand types, declared in ascending strength order so the
/// discriminant doubles as the scoring ordinal.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandType {
    Single,
    Pair,
    Triple,
    Quad,
    Straight,
    Flush,
    FullHouse,
    FourPlusOne,
    StraightFlush,
}

impl HandType {
    pub fn ordinal(self) -> i32 {
        self as i32
    }
}

/// Straight detection over a 14-slot rank frequency line:
/// [A 2 3 4 5 6 7 8 9 T J Q K A]. An Ace occupies both end slots, so it
/// can anchor the low run A-2-3-4-5 and the high run T-J-Q-K-A, while a
/// run can never wrap past King through Ace into 2.
///
/// Returns the top card of the run when the five cards form a straight.
pub fn check_for_straight(cards: &[Card]) -> Option<Card> {
    if cards.len() != 5 {
        return None;
    }

    let mut freq_line: [Option<Card>; 14] = [None; 14];
    for &card in cards {
        let slots: &[usize] = match card.rank {
            Rank::Ace => &[0, 13],
            Rank::Two => &[1],
            Rank::Three => &[2],
            Rank::Four => &[3],
            Rank::Five => &[4],
            Rank::Six => &[5],
            Rank::Seven => &[6],
            Rank::Eight => &[7],
            Rank::Nine => &[8],
            Rank::Ten => &[9],
            Rank::Jack => &[10],
            Rank::Queen => &[11],
            Rank::King => &[12],
        };
        for &slot in slots {
            // Duplicate ranks leave fewer than 5 occupied slots, so keeping
            // the first card per slot never fakes a straight.
            freq_line[slot].get_or_insert(card);
        }
    }

    // A run of 5 occupied slots may start no later than the Ten slot.
    for start in 0..=9 {
        if freq_line[start..start + 5].iter().all(Option::is_some) {
            return freq_line[start + 4];
        }
    }

    None
}

/// Classify an ordered card group into a hand type, or `None` when the
/// group is not a legal hand.
pub fn classify(cards: &[Card]) -> Option<HandType> {
    let same_rank = match cards.first() {
        Some(first) => cards.iter().all(|c| c.rank == first.rank),
        None => false,
    };

    match cards.len() {
        1 => Some(HandType::Single),
        2 if same_rank => Some(HandType::Pair),
        3 if same_rank => Some(HandType::Triple),
        4 if same_rank => Some(HandType::Quad),
        5 => {
            let is_straight = check_for_straight(cards).is_some();
            let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
            let rank_counts = rank_group_sizes(cards);

            if is_straight && is_flush {
                Some(HandType::StraightFlush)
            } else if rank_counts[0] == 4 {
                Some(HandType::FourPlusOne)
            } else if rank_counts[0] == 3 && rank_counts[1] == 2 {
                Some(HandType::FullHouse)
            } else if is_flush {
                Some(HandType::Flush)
            } else if is_straight {
                Some(HandType::Straight)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Group sizes per rank, largest first.
fn rank_group_sizes(cards: &[Card]) -> Vec<usize> {
    let mut counts = [0usize; 13];
    for c in cards {
        counts[c.rank.index()] += 1;
    }
    let mut sizes: Vec<usize> = counts.into_iter().filter(|&n| n > 0).collect();
    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

/// The single card used to compare two hands of the same type.
///
/// Assumes `cards` is a valid hand of `hand_type`; callers classify first.
pub fn representative_card(hand_type: HandType, cards: &[Card]) -> Result<Card, DomainError> {
    let highest = |cs: &[Card]| -> Result<Card, DomainError> {
        cs.iter().max().copied().ok_or_else(|| {
            DomainError::validation(ValidationKind::UnclassifiableMove, "Empty card group")
        })
    };

    match hand_type {
        HandType::Single
        | HandType::Pair
        | HandType::Triple
        | HandType::Quad
        | HandType::Flush => highest(cards),
        HandType::FullHouse | HandType::FourPlusOne => {
            // Dominant same-rank group decides the comparison.
            let mut groups: [Vec<Card>; 13] = Default::default();
            for &c in cards {
                groups[c.rank.index()].push(c);
            }
            let largest = groups
                .iter()
                .max_by_key(|g| g.len())
                .ok_or_else(|| {
                    DomainError::validation(ValidationKind::UnclassifiableMove, "Empty card group")
                })?;
            highest(largest)
        }
        HandType::Straight | HandType::StraightFlush => {
            check_for_straight(cards).ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::UnclassifiableMove,
                    "Cards do not form a straight",
                )
            })
        }
    }
}

fn card_score(card: Card) -> i32 {
    card.rank.index() as i32 * RANK_MULTIPLIER + card.suit.index() as i32
}

/// Total ordering over all legal hands: hand type dominates, then the
/// representative card's rank, then its suit.
pub fn score(hand_type: HandType, cards: &[Card]) -> Result<i32, DomainError> {
    let rep = representative_card(hand_type, cards)?;
    Ok(hand_type.ordinal() * HAND_TYPE_MULTIPLIER + card_score(rep))
}

impl std::fmt::Display for HandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandType::Single => "single",
            HandType::Pair => "pair",
            HandType::Triple => "triple",
            HandType::Quad => "quad",
            HandType::Straight => "straight",
            HandType::Flush => "flush",
            HandType::FullHouse => "fullhouse",
            HandType::FourPlusOne => "fourplusone",
            HandType::StraightFlush => "straightflush",
        };
        f.write_str(s)
    }
}
