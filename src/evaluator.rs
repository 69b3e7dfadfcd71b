use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank, ensure_distinct};
use crate::error::EngineError;

/// Bits below the category reserved for kicker information.
pub const CATEGORY_SHIFT: u32 = 20;

const MIN_CARDS: usize = 2;
const MAX_CARDS: usize = 7;
const ACE_INDEX: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    pub fn value(self) -> u32 {
        self as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            HandCategory::HighCard => "high card",
            HandCategory::OnePair => "one pair",
            HandCategory::TwoPair => "two pair",
            HandCategory::ThreeOfAKind => "three of a kind",
            HandCategory::Straight => "straight",
            HandCategory::Flush => "flush",
            HandCategory::FullHouse => "full house",
            HandCategory::FourOfAKind => "four of a kind",
            HandCategory::StraightFlush => "straight flush",
        }
    }
}

impl Display for HandCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Packed strength: category in the high bits, kickers below
/// [`CATEGORY_SHIFT`]. Plain integer order is hand order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandStrength(u32);

impl HandStrength {
    /// One past the strongest encodable value.
    pub const CEILING: u32 = 9 << CATEGORY_SHIFT;

    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn category_floor(category: HandCategory) -> Self {
        Self(category.value() << CATEGORY_SHIFT)
    }

    pub fn kicker_bits(self) -> u32 {
        self.0 & ((1 << CATEGORY_SHIFT) - 1)
    }
}

/// How kicker bits are packed below the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KickerMode {
    /// Counting evaluator with kicker bits on high-card hands only; hands of
    /// any other category tie within their category.
    #[default]
    Reference,
    /// Best five-card hand with all five ranks packed as kickers.
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEvaluation {
    pub category: HandCategory,
    pub strength: HandStrength,
}

/// Classifies 2 to 7 distinct cards.
pub fn evaluate(cards: &[Card], mode: KickerMode) -> Result<HandEvaluation, EngineError> {
    if !(MIN_CARDS..=MAX_CARDS).contains(&cards.len()) {
        return Err(EngineError::InvalidHand(format!(
            "expected {MIN_CARDS} to {MAX_CARDS} cards, got {}",
            cards.len()
        )));
    }
    ensure_distinct(cards)?;

    Ok(match mode {
        KickerMode::Reference => evaluate_reference(cards),
        KickerMode::Full => evaluate_full(cards),
    })
}

pub fn evaluate_hand(
    hole: &[Card],
    board: &[Card],
    mode: KickerMode,
) -> Result<HandEvaluation, EngineError> {
    let cards: Vec<Card> = hole.iter().chain(board.iter()).copied().collect();
    evaluate(&cards, mode)
}

struct Tally {
    suit_masks: [u16; 4],
    counts: [u8; 13],
}

impl Tally {
    fn new(cards: &[Card]) -> Self {
        let mut suit_masks = [0u16; 4];
        let mut counts = [0u8; 13];
        for card in cards {
            suit_masks[card.suit.index()] |= 1 << card.rank.index();
            counts[card.rank.index()] += 1;
        }
        Self { suit_masks, counts }
    }

    fn has_flush(&self) -> bool {
        self.suit_masks.iter().any(|mask| mask.count_ones() >= 5)
    }

    fn has_straight(&self) -> bool {
        let present = |index: usize| self.counts[index] > 0;
        let window = (0..=ACE_INDEX - 4)
            .rev()
            .any(|low| (low..low + 5).all(present));
        window || [ACE_INDEX, 0, 1, 2, 3].into_iter().all(present)
    }

    fn has_count(&self, count: u8) -> bool {
        self.counts.contains(&count)
    }

    fn category(&self) -> HandCategory {
        let flush = self.has_flush();
        let straight = self.has_straight();
        let trips = self.counts.iter().position(|&count| count == 3);
        let pairs = self.counts.iter().filter(|&&count| count == 2).count();

        if straight && flush {
            return HandCategory::StraightFlush;
        }
        if self.has_count(4) {
            return HandCategory::FourOfAKind;
        }
        if let Some(trip_index) = trips {
            let filler = self
                .counts
                .iter()
                .enumerate()
                .any(|(index, &count)| index != trip_index && count >= 2);
            if filler {
                return HandCategory::FullHouse;
            }
        }
        if flush {
            return HandCategory::Flush;
        }
        if straight {
            return HandCategory::Straight;
        }
        if trips.is_some() {
            return HandCategory::ThreeOfAKind;
        }
        match pairs {
            2 => HandCategory::TwoPair,
            0 => HandCategory::HighCard,
            _ => HandCategory::OnePair,
        }
    }
}

fn evaluate_reference(cards: &[Card]) -> HandEvaluation {
    let tally = Tally::new(cards);
    let category = tally.category();
    let mut strength = category.value() << CATEGORY_SHIFT;

    if category == HandCategory::HighCard {
        for index in (0..=ACE_INDEX).rev() {
            let count = tally.counts[index] as u32;
            if count > 0 {
                strength |= (index as u32) << (4 * (4 - count));
            }
        }
    }

    HandEvaluation {
        category,
        strength: HandStrength(strength),
    }
}

fn evaluate_full(cards: &[Card]) -> HandEvaluation {
    let (category, ranks) = if cards.len() <= 5 {
        rank_group(cards)
    } else {
        cards
            .iter()
            .copied()
            .combinations(5)
            .map(|combo| rank_group(&combo))
            .max()
            .unwrap_or((HandCategory::HighCard, [0; 5]))
    };

    let kickers = ranks
        .iter()
        .fold(0u32, |packed, &rank| (packed << 4) | rank as u32);
    HandEvaluation {
        category,
        strength: HandStrength((category.value() << CATEGORY_SHIFT) | kickers),
    }
}

fn fill(mut values: Vec<u8>) -> [u8; 5] {
    values.resize(5, 0);
    [values[0], values[1], values[2], values[3], values[4]]
}

/// Category and tiebreak ranks of at most five cards.
fn rank_group(cards: &[Card]) -> (HandCategory, [u8; 5]) {
    let mut counts = [0u8; 15];
    let mut suits = [0u8; 4];
    let mut sorted_cards: Vec<u8> = cards.iter().map(|c| c.rank_value()).collect();
    sorted_cards.sort_unstable_by(|a, b| b.cmp(a));

    for card in cards {
        counts[card.rank_value() as usize] += 1;
        suits[card.suit.index()] += 1;
    }

    let is_flush = suits.contains(&5);

    let mut mask: u32 = 0;
    for rank_value in 2u8..=14 {
        if counts[rank_value as usize] > 0 {
            mask |= 1 << rank_value as u32;
            if rank_value == Rank::Ace.value() {
                mask |= 1 << 1;
            }
        }
    }

    let straight_high = (5u8..=14).rev().find(|&high| {
        let needed = (0..5u8).fold(0u32, |acc, i| acc | 1 << (high - i) as u32);
        mask & needed == needed
    });

    let mut groups: Vec<(u8, u8)> = (2..=14u8)
        .filter(|&rank| counts[rank as usize] > 0)
        .map(|rank| (counts[rank as usize], rank))
        .collect();
    groups.sort_unstable_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    let singles = || -> Vec<u8> {
        groups
            .iter()
            .filter(|(count, _)| *count == 1)
            .map(|(_, rank)| *rank)
            .collect()
    };
    let run = |high: u8| fill(vec![high, high - 1, high - 2, high - 3, high - 4]);

    if is_flush && let Some(high) = straight_high {
        return (HandCategory::StraightFlush, run(high));
    }

    let (top_count, top_rank) = groups.first().copied().unwrap_or((0, 0));
    let second = groups.get(1).copied();

    if top_count == 4 {
        let kicker = singles().first().copied().unwrap_or(0);
        return (HandCategory::FourOfAKind, fill(vec![top_rank, kicker]));
    }
    if top_count == 3 && let Some((2, pair_rank)) = second {
        return (HandCategory::FullHouse, fill(vec![top_rank, pair_rank]));
    }
    if is_flush {
        return (HandCategory::Flush, fill(sorted_cards));
    }
    if let Some(high) = straight_high {
        return (HandCategory::Straight, run(high));
    }

    match (top_count, second) {
        (3, _) => {
            let mut values = vec![top_rank];
            values.extend(singles());
            (HandCategory::ThreeOfAKind, fill(values))
        }
        (2, Some((2, second_pair))) => {
            let kicker = singles().first().copied().unwrap_or(0);
            (
                HandCategory::TwoPair,
                fill(vec![top_rank, second_pair, kicker]),
            )
        }
        (2, _) => {
            let mut values = vec![top_rank];
            values.extend(singles());
            (HandCategory::OnePair, fill(values))
        }
        _ => (HandCategory::HighCard, fill(sorted_cards)),
    }
}
