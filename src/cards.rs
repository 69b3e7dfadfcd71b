use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Clubs => "♣",
            Suit::Diamonds => "♦",
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
        }
    }

    /// Single upper-case letter used on the wire (`C`, `D`, `H`, `S`).
    pub fn letter(self) -> &'static str {
        match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Face value, 2 through 14.
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based slot, 0 for a deuce through 12 for an ace.
    pub fn index(self) -> usize {
        (self.value() - Rank::Two.value()) as usize
    }

    pub fn short_label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "T",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_label())
    }
}

impl FromStr for Rank {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "2" => Ok(Rank::Two),
            "3" => Ok(Rank::Three),
            "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "T" | "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            _ => Err(EngineError::parse(s, "unknown rank")),
        }
    }
}

impl FromStr for Suit {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" | "♣" => Ok(Suit::Clubs),
            "d" | "♦" => Ok(Suit::Diamonds),
            "h" | "♥" => Ok(Suit::Hearts),
            "s" | "♠" => Ok(Suit::Spades),
            _ => Err(EngineError::parse(s, "unknown suit")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn rank_value(&self) -> u8 {
        self.rank.value()
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn notation(&self) -> String {
        format!("{}{}", self.rank.short_label(), self.suit.symbol())
    }

    /// Suit-first code as exchanged with the game runner, e.g. `HA`.
    pub fn code(&self) -> String {
        format!("{}{}", self.suit.letter(), self.rank.short_label())
    }

    /// One bit per card in a 52-card deck.
    fn bit(&self) -> u64 {
        1 << (self.suit.index() * 13 + self.rank.index())
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.notation())
    }
}

/// Accepts suit-first codes (`HA`, `D10`) and rank-first codes (`Ah`, `10d`, `A♥`).
impl FromStr for Card {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let (first_end, _) = code
            .char_indices()
            .nth(1)
            .ok_or_else(|| EngineError::parse(s, "expected a rank and a suit"))?;
        let (last_start, _) = code
            .char_indices()
            .last()
            .ok_or_else(|| EngineError::parse(s, "expected a rank and a suit"))?;

        let suit_first = code[..first_end].parse::<Suit>().ok().and_then(|suit| {
            code[first_end..]
                .parse::<Rank>()
                .ok()
                .map(|rank| Card::new(rank, suit))
        });
        if let Some(card) = suit_first {
            return Ok(card);
        }

        let rank = code[..last_start]
            .parse::<Rank>()
            .map_err(|_| EngineError::parse(s, "unknown rank"))?;
        let suit = code[last_start..]
            .parse::<Suit>()
            .map_err(|_| EngineError::parse(s, "unknown suit"))?;
        Ok(Card::new(rank, suit))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

pub(crate) fn ensure_distinct(cards: &[Card]) -> Result<(), EngineError> {
    let mut seen = 0u64;
    for card in cards {
        if seen & card.bit() != 0 {
            return Err(EngineError::InvalidHand(format!(
                "card {} appears more than once",
                card.code()
            )));
        }
        seen |= card.bit();
    }
    Ok(())
}

/// The two private cards dealt to the acting player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCards([Card; 2]);

impl HoleCards {
    pub fn new(cards: [Card; 2]) -> Result<Self, EngineError> {
        ensure_distinct(&cards)?;
        Ok(Self(cards))
    }

    pub fn from_slice(cards: &[Card]) -> Result<Self, EngineError> {
        match cards {
            [first, second] => Self::new([*first, *second]),
            _ => Err(EngineError::InvalidHand(format!(
                "expected 2 hole cards, got {}",
                cards.len()
            ))),
        }
    }

    pub fn cards(&self) -> &[Card; 2] {
        &self.0
    }

    pub fn suited(&self) -> bool {
        self.0[0].suit == self.0[1].suit
    }

    /// Both ranks, highest first.
    pub fn ranks_desc(&self) -> (Rank, Rank) {
        let (a, b) = (self.0[0].rank, self.0[1].rank);
        if a >= b { (a, b) } else { (b, a) }
    }
}

/// Shared board: empty preflop, then 3, 4 or 5 cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityCards(Vec<Card>);

impl CommunityCards {
    pub fn new(cards: Vec<Card>) -> Result<Self, EngineError> {
        if !matches!(cards.len(), 0 | 3 | 4 | 5) {
            return Err(EngineError::InvalidHand(format!(
                "a board holds 0, 3, 4 or 5 cards, got {}",
                cards.len()
            )));
        }
        ensure_distinct(&cards)?;
        Ok(Self(cards))
    }

    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn standard_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}

pub fn deal_unique_cards<R: Rng>(rng: &mut R, count: usize) -> Vec<Card> {
    let mut deck = standard_deck();
    deck.shuffle(rng);
    deck.into_iter().take(count).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_runner_and_human_codes() {
        let expected = Card::new(Rank::Ace, Suit::Hearts);
        for code in ["HA", "ha", "Ah", "A♥", " HA "] {
            assert_eq!(code.parse::<Card>().unwrap(), expected, "code={code}");
        }
        assert_eq!("D10".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!("10d".parse::<Card>().unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
        assert_eq!("ST".parse::<Card>().unwrap().code(), "ST");
    }

    #[test]
    fn rejects_malformed_codes() {
        for code in ["", "A", "XA", "H1", "Ax", "HAA"] {
            assert!(
                matches!(code.parse::<Card>(), Err(EngineError::Parse { .. })),
                "code={code}"
            );
        }
    }

    #[test]
    fn hole_cards_reject_duplicates() {
        let ace = Card::new(Rank::Ace, Suit::Spades);
        assert!(matches!(
            HoleCards::new([ace, ace]),
            Err(EngineError::InvalidHand(_))
        ));
        assert!(HoleCards::from_slice(&[ace]).is_err());
    }

    #[test]
    fn board_length_is_checked() {
        let deck = standard_deck();
        assert!(CommunityCards::new(deck[..2].to_vec()).is_err());
        assert!(CommunityCards::new(deck[..6].to_vec()).is_err());
        assert_eq!(CommunityCards::new(deck[..4].to_vec()).unwrap().len(), 4);
    }

    #[test]
    fn deck_is_unique() {
        let deck = standard_deck();
        assert_eq!(deck.len(), 52);
        assert!(ensure_distinct(&deck).is_ok());
    }
}
