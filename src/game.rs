use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::error::EngineError;

/// Chip amounts as the game runner reports them. Signed because the runner
/// marks an impossible raise with `-1` bounds.
pub type Chips = i64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn is_preflop(self) -> bool {
        self == Street::Preflop
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Call,
    Raise,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaiseRange {
    pub min: Chips,
    pub max: Chips,
}

impl RaiseRange {
    pub fn is_open(&self) -> bool {
        self.min >= 0 && self.max >= self.min
    }

    pub fn clamp(&self, amount: Chips) -> Chips {
        amount.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ActionAmount {
    Fixed(Chips),
    Range(RaiseRange),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidAction {
    pub action: ActionKind,
    pub amount: ActionAmount,
}

impl ValidAction {
    pub fn fold() -> Self {
        Self {
            action: ActionKind::Fold,
            amount: ActionAmount::Fixed(0),
        }
    }

    pub fn call(amount: Chips) -> Self {
        Self {
            action: ActionKind::Call,
            amount: ActionAmount::Fixed(amount),
        }
    }

    pub fn raise(min: Chips, max: Chips) -> Self {
        Self {
            action: ActionKind::Raise,
            amount: ActionAmount::Range(RaiseRange { min, max }),
        }
    }
}

/// The legal moves offered at one decision point, looked up by kind rather
/// than by position.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidActions(Vec<ValidAction>);

impl ValidActions {
    pub fn new(actions: Vec<ValidAction>) -> Self {
        Self(actions)
    }

    /// The usual fold / call / raise triple.
    pub fn standard(call: Chips, raise_min: Chips, raise_max: Chips) -> Self {
        Self(vec![
            ValidAction::fold(),
            ValidAction::call(call),
            ValidAction::raise(raise_min, raise_max),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidAction> {
        self.0.iter()
    }

    pub fn find(&self, kind: ActionKind) -> Option<&ValidAction> {
        self.0.iter().find(|entry| entry.action == kind)
    }

    pub fn call_amount(&self) -> Result<Chips, EngineError> {
        match self.find(ActionKind::Call).map(|entry| entry.amount) {
            Some(ActionAmount::Fixed(amount)) if amount >= 0 => Ok(amount),
            Some(_) => Err(EngineError::MalformedActionSet(
                "call entry must carry a non-negative fixed amount".into(),
            )),
            None => Err(EngineError::MalformedActionSet("no call entry".into())),
        }
    }

    pub fn raise_range(&self) -> Result<RaiseRange, EngineError> {
        match self.find(ActionKind::Raise).map(|entry| entry.amount) {
            Some(ActionAmount::Range(range)) if range.is_open() => Ok(range),
            Some(ActionAmount::Range(range)) => Err(EngineError::MalformedActionSet(format!(
                "raise range [{}, {}] is empty",
                range.min, range.max
            ))),
            Some(ActionAmount::Fixed(_)) => Err(EngineError::MalformedActionSet(
                "raise entry must carry a min/max range".into(),
            )),
            None => Err(EngineError::MalformedActionSet("no raise entry".into())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decision {
    pub action: ActionKind,
    pub amount: Chips,
}

impl Decision {
    pub fn fold() -> Self {
        Self {
            action: ActionKind::Fold,
            amount: 0,
        }
    }

    pub fn call(amount: Chips) -> Self {
        Self {
            action: ActionKind::Call,
            amount,
        }
    }

    pub fn raise(amount: Chips) -> Self {
        Self {
            action: ActionKind::Raise,
            amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seat {
    pub uuid: String,
    pub stack: Chips,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MainPot {
    pub amount: Chips,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SidePot {
    pub amount: Chips,
    #[serde(default)]
    pub eligibles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Pot {
    pub main: MainPot,
    #[serde(default)]
    pub side: Vec<SidePot>,
}

/// Table snapshot the runner hands over with every decision request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundState {
    pub street: Street,
    #[serde(default, rename = "community_card")]
    pub community_cards: Vec<Card>,
    pub seats: Vec<Seat>,
    #[serde(rename = "dealer_btn")]
    pub dealer_button: usize,
    pub small_blind_amount: Chips,
    #[serde(default)]
    pub pot: Pot,
}

impl RoundState {
    pub fn big_blind(&self) -> Result<Chips, EngineError> {
        self.small_blind_amount.checked_mul(2).ok_or_else(|| {
            EngineError::UnsupportedTable(format!(
                "small blind {} has no representable big blind",
                self.small_blind_amount
            ))
        })
    }

    pub fn seat_ids(&self) -> Vec<&str> {
        self.seats.iter().map(|seat| seat.uuid.as_str()).collect()
    }

    pub fn stack_of(&self, player_id: &str) -> Result<Chips, EngineError> {
        self.seats
            .iter()
            .find(|seat| seat.uuid == player_id)
            .map(|seat| seat.stack)
            .ok_or_else(|| EngineError::PlayerNotFound(player_id.to_string()))
    }
}
