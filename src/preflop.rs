use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::cards::{HoleCards, Rank};
use crate::error::EngineError;
use crate::game::{Decision, ValidActions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeatPosition {
    Utg,
    Mp,
    Co,
    Btn,
    Sb,
    Bb,
}

impl SeatPosition {
    /// Labels in offset order from the dealer button.
    pub const TABLE: [SeatPosition; 6] = [
        SeatPosition::Utg,
        SeatPosition::Mp,
        SeatPosition::Co,
        SeatPosition::Btn,
        SeatPosition::Sb,
        SeatPosition::Bb,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SeatPosition::Utg => "UTG",
            SeatPosition::Mp => "MP",
            SeatPosition::Co => "CO",
            SeatPosition::Btn => "BTN",
            SeatPosition::Sb => "SB",
            SeatPosition::Bb => "BB",
        }
    }

    /// Seats that may speculate with medium holdings.
    pub fn is_late(self) -> bool {
        matches!(self, SeatPosition::Btn | SeatPosition::Co | SeatPosition::Sb)
    }
}

impl Display for SeatPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Locates `player_id` relative to the dealer button.
///
/// Tables shorter than six seats take the first labels of
/// [`SeatPosition::TABLE`]; larger tables are rejected.
pub fn position<S: AsRef<str>>(
    seats: &[S],
    dealer_button: usize,
    player_id: &str,
) -> Result<SeatPosition, EngineError> {
    let seat_count = seats.len();
    if !(2..=SeatPosition::TABLE.len()).contains(&seat_count) {
        return Err(EngineError::UnsupportedTable(format!(
            "position labels cover 2 to {} seats, table has {seat_count}",
            SeatPosition::TABLE.len()
        )));
    }
    if dealer_button >= seat_count {
        return Err(EngineError::UnsupportedTable(format!(
            "dealer button {dealer_button} is outside a {seat_count}-seat table"
        )));
    }

    let index = seats
        .iter()
        .position(|seat| seat.as_ref() == player_id)
        .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_string()))?;
    let offset = (index + seat_count - dealer_button) % seat_count;
    Ok(SeatPosition::TABLE[offset])
}

/// Five coarse preflop buckets, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PreflopRank {
    Other = 4,
    HighCards = 5,
    Suited = 6,
    HighSuited = 7,
    Pair = 8,
}

impl PreflopRank {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn is_premium(self) -> bool {
        matches!(self, PreflopRank::Pair | PreflopRank::HighSuited)
    }

    pub fn is_medium(self) -> bool {
        matches!(self, PreflopRank::Suited | PreflopRank::HighCards)
    }
}

pub fn preflop_rank(hole: &HoleCards) -> PreflopRank {
    let (high, low) = hole.ranks_desc();
    let has_high_card = high > Rank::Nine || low > Rank::Nine;

    if high == low {
        PreflopRank::Pair
    } else if hole.suited() && has_high_card {
        PreflopRank::HighSuited
    } else if hole.suited() {
        PreflopRank::Suited
    } else if has_high_card {
        PreflopRank::HighCards
    } else {
        PreflopRank::Other
    }
}

/// Raises premium hands to the cap, calls medium hands from late position
/// and folds the rest.
pub fn preflop_action(
    valid_actions: &ValidActions,
    rank: PreflopRank,
    position: SeatPosition,
) -> Result<Decision, EngineError> {
    if rank.is_premium() {
        return match valid_actions.raise_range() {
            Ok(range) => Ok(Decision::raise(range.max)),
            Err(_) => valid_actions.call_amount().map(Decision::call),
        };
    }
    if position.is_late() && rank.is_medium() {
        return valid_actions.call_amount().map(Decision::call);
    }
    Ok(Decision::fold())
}
