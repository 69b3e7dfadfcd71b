use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cards::{Card, CommunityCards, HoleCards};
use crate::error::EngineError;
use crate::evaluator::{KickerMode, evaluate_hand};
use crate::game::{Decision, RoundState, ValidActions};
use crate::policy::{PolicyConfig, PostflopContext, RandomSource, StrengthScale, act, assess};
use crate::preflop::{position, preflop_action, preflop_rank};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub kicker_mode: KickerMode,
    pub strength_scale: StrengthScale,
    pub stack_guard_big_blinds: f64,
    pub raise_multiplier: i64,
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let policy = PolicyConfig::default();
        Self {
            kicker_mode: KickerMode::Reference,
            strength_scale: policy.strength_scale,
            stack_guard_big_blinds: policy.stack_guard_big_blinds,
            raise_multiplier: policy.raise_multiplier,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            strength_scale: self.strength_scale,
            stack_guard_big_blinds: self.stack_guard_big_blinds,
            raise_multiplier: self.raise_multiplier,
        }
    }
}

/// Everything the runner sends when it is our turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub valid_actions: ValidActions,
    pub hole_card: Vec<Card>,
    pub round_state: RoundState,
}

/// One seat's decision maker. Holds only its identity, configuration and
/// its own random source; every table fact arrives with the request.
pub struct Agent<R = StdRng> {
    player_id: String,
    config: AgentConfig,
    source: R,
}

impl Agent<StdRng> {
    pub fn new(player_id: impl Into<String>, config: AgentConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_source(player_id, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Agent<R> {
    pub fn with_source(player_id: impl Into<String>, config: AgentConfig, source: R) -> Self {
        Self {
            player_id: player_id.into(),
            config,
            source,
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn respond(&mut self, request: &DecisionRequest) -> Result<Decision, EngineError> {
        let hole = HoleCards::from_slice(&request.hole_card)?;
        self.declare_action(&request.valid_actions, &hole, &request.round_state)
    }

    pub fn declare_action(
        &mut self,
        valid_actions: &ValidActions,
        hole: &HoleCards,
        round_state: &RoundState,
    ) -> Result<Decision, EngineError> {
        if round_state.street.is_preflop() {
            self.preflop_strategy(valid_actions, hole, round_state)
        } else {
            self.postflop_strategy(valid_actions, hole, round_state)
        }
    }

    fn preflop_strategy(
        &self,
        valid_actions: &ValidActions,
        hole: &HoleCards,
        round_state: &RoundState,
    ) -> Result<Decision, EngineError> {
        let seat = position(
            &round_state.seat_ids(),
            round_state.dealer_button,
            &self.player_id,
        )?;
        let rank = preflop_rank(hole);
        let decision = preflop_action(valid_actions, rank, seat)?;
        debug!(
            player = %self.player_id,
            position = %seat,
            bucket = rank.value(),
            action = ?decision.action,
            amount = decision.amount,
            "preflop decision"
        );
        Ok(decision)
    }

    fn postflop_strategy(
        &mut self,
        valid_actions: &ValidActions,
        hole: &HoleCards,
        round_state: &RoundState,
    ) -> Result<Decision, EngineError> {
        let board = CommunityCards::new(round_state.community_cards.clone())?;
        let evaluation = evaluate_hand(hole.cards(), board.cards(), self.config.kicker_mode)?;
        let context = PostflopContext {
            strength: evaluation.strength,
            stack: round_state.stack_of(&self.player_id)?,
            big_blind: round_state.big_blind()?,
        };
        let policy = self.config.policy();
        let assessment = assess(&context, valid_actions, &policy)?;
        let decision = act(
            &assessment,
            context.stack,
            context.big_blind,
            valid_actions,
            &policy,
            &mut self.source,
        )?;
        debug!(
            player = %self.player_id,
            street = ?round_state.street,
            category = %evaluation.category,
            strength = evaluation.strength.value(),
            stack = context.stack,
            pot_odds = assessment.pot_odds,
            rate_of_return = assessment.rate_of_return,
            tier = assessment.tier.name,
            action = ?decision.action,
            amount = decision.amount,
            "postflop decision"
        );
        Ok(decision)
    }
}
