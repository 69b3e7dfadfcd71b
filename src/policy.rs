use rand::RngCore;
use rand::distributions::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::evaluator::HandStrength;
use crate::game::{ActionAmount, ActionKind, Chips, Decision, ValidActions};

/// Supplier of uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R: RngCore> RandomSource for R {
    fn next_uniform(&mut self) -> f64 {
        Uniform::new(0.0f64, 1.0f64).sample(self)
    }
}

/// Always returns the same draw. Pins the mixed strategy to one branch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDraw(pub f64);

impl RandomSource for FixedDraw {
    fn next_uniform(&mut self) -> f64 {
        self.0
    }
}

/// Scale on which the packed strength enters pot-odds arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthScale {
    /// The packed integer as is.
    #[default]
    Packed,
    /// Packed value divided by [`HandStrength::CEILING`], in `[0, 1)`.
    Normalized,
}

impl StrengthScale {
    pub fn apply(self, strength: HandStrength) -> f64 {
        match self {
            StrengthScale::Packed => strength.value() as f64,
            StrengthScale::Normalized => strength.value() as f64 / HandStrength::CEILING as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub strength_scale: StrengthScale,
    /// Fold weak hands once the stack would drop below this many big blinds.
    pub stack_guard_big_blinds: f64,
    /// Postflop raises are this multiple of the minimum raise.
    pub raise_multiplier: Chips,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            strength_scale: StrengthScale::Packed,
            stack_guard_big_blinds: 4.0,
            raise_multiplier: 2,
        }
    }
}

const GUARD_STRENGTH: f64 = 0.5;

/// Band of rate-of-return values sharing one mixed strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceTier {
    pub name: &'static str,
    pub raise_probability: f64,
    pub fallback: ActionKind,
}

impl ConfidenceTier {
    pub fn resolve(rate_of_return: f64) -> Self {
        if rate_of_return < 0.8 {
            Self {
                name: "weak",
                raise_probability: 0.05,
                fallback: ActionKind::Fold,
            }
        } else if rate_of_return < 1.0 {
            Self {
                name: "marginal",
                raise_probability: 0.15,
                fallback: ActionKind::Fold,
            }
        } else if rate_of_return < 1.3 {
            Self {
                name: "solid",
                raise_probability: 0.40,
                fallback: ActionKind::Call,
            }
        } else {
            Self {
                name: "strong",
                raise_probability: 0.70,
                fallback: ActionKind::Call,
            }
        }
    }
}

/// What the policy knows about the acting player after the flop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostflopContext {
    pub strength: HandStrength,
    pub stack: Chips,
    pub big_blind: Chips,
}

/// Price of calling relative to the call plus every call and raise amount on
/// offer. A closed raise contributes nothing.
pub fn pot_odds(valid_actions: &ValidActions) -> Result<f64, EngineError> {
    let call = valid_actions.call_amount()?;
    let pot = valid_actions
        .iter()
        .filter_map(|entry| match (entry.action, entry.amount) {
            (ActionKind::Call, ActionAmount::Fixed(amount)) => Some(amount),
            (ActionKind::Raise, ActionAmount::Range(range)) if range.is_open() => Some(range.min),
            _ => None,
        })
        .try_fold(call, |total, amount| total.checked_add(amount))
        .ok_or_else(|| EngineError::MalformedActionSet("offered amounts overflow the pot".into()))?;
    if pot == 0 {
        return Ok(0.0);
    }
    Ok(call as f64 / pot as f64)
}

pub fn rate_of_return(strength: f64, pot_odds: f64) -> f64 {
    if pot_odds > 0.0 {
        strength / pot_odds
    } else {
        0.0
    }
}

/// Scaled strength priced against the pot, and the tier it lands in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub strength: f64,
    pub pot_odds: f64,
    pub rate_of_return: f64,
    pub tier: ConfidenceTier,
}

impl Assessment {
    pub fn new(strength: f64, pot_odds: f64) -> Self {
        let rate = rate_of_return(strength, pot_odds);
        Self {
            strength,
            pot_odds,
            rate_of_return: rate,
            tier: ConfidenceTier::resolve(rate),
        }
    }
}

pub fn assess(
    context: &PostflopContext,
    valid_actions: &ValidActions,
    config: &PolicyConfig,
) -> Result<Assessment, EngineError> {
    let strength = config.strength_scale.apply(context.strength);
    Ok(Assessment::new(strength, pot_odds(valid_actions)?))
}

pub fn decide_postflop<S: RandomSource + ?Sized>(
    context: &PostflopContext,
    valid_actions: &ValidActions,
    config: &PolicyConfig,
    source: &mut S,
) -> Result<Decision, EngineError> {
    let assessment = assess(context, valid_actions, config)?;
    act(&assessment, context.stack, context.big_blind, valid_actions, config, source)
}

pub fn decide_with_odds<S: RandomSource + ?Sized>(
    strength: f64,
    pot_odds: f64,
    stack: Chips,
    big_blind: Chips,
    valid_actions: &ValidActions,
    config: &PolicyConfig,
    source: &mut S,
) -> Result<Decision, EngineError> {
    let assessment = Assessment::new(strength, pot_odds);
    act(&assessment, stack, big_blind, valid_actions, config, source)
}

/// Stack guard first, then one draw against the tier's raise probability.
pub fn act<S: RandomSource + ?Sized>(
    assessment: &Assessment,
    stack: Chips,
    big_blind: Chips,
    valid_actions: &ValidActions,
    config: &PolicyConfig,
    source: &mut S,
) -> Result<Decision, EngineError> {
    let guard = config.stack_guard_big_blinds * big_blind as f64;
    if stack as f64 - assessment.rate_of_return < guard && assessment.strength < GUARD_STRENGTH {
        return Ok(Decision::fold());
    }

    let tier = assessment.tier;
    if source.next_uniform() < tier.raise_probability
        && let Ok(range) = valid_actions.raise_range()
    {
        let target = range.min.saturating_mul(config.raise_multiplier);
        return Ok(Decision::raise(range.clamp(target)));
    }

    match tier.fallback {
        ActionKind::Call => valid_actions.call_amount().map(Decision::call),
        _ => Ok(Decision::fold()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ValidAction;

    #[test]
    fn tiers_are_monotone() {
        let rates = [0.0, 0.79, 0.8, 0.99, 1.0, 1.29, 1.3, 50.0];
        let probabilities: Vec<f64> = rates
            .iter()
            .map(|&rate| ConfidenceTier::resolve(rate).raise_probability)
            .collect();
        assert!(probabilities.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(ConfidenceTier::resolve(1.0).fallback, ActionKind::Call);
        assert_eq!(ConfidenceTier::resolve(0.99).fallback, ActionKind::Fold);
    }

    #[test]
    fn pot_odds_counts_call_twice_and_raise_min() {
        let actions = ValidActions::standard(10, 20, 100);
        let odds = pot_odds(&actions).unwrap();
        assert!((odds - 0.25).abs() < 1e-12, "odds={odds}");
    }

    #[test]
    fn pot_odds_ignores_closed_raise() {
        let actions = ValidActions::standard(10, -1, -1);
        assert!((pot_odds(&actions).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn oversized_amounts_are_rejected_not_summed() {
        let actions = ValidActions::standard(i64::MAX / 2 + 1, -1, -1);
        assert!(matches!(
            pot_odds(&actions),
            Err(EngineError::MalformedActionSet(_))
        ));
    }

    #[test]
    fn assessment_names_its_tier() {
        let assessment = Assessment::new(0.81, 0.9);
        assert!((assessment.rate_of_return - 0.9).abs() < 1e-9);
        assert_eq!(assessment.tier.name, "marginal");
        assert_eq!(Assessment::new(1.0, 0.0).tier.name, "weak");
    }

    #[test]
    fn raise_is_clamped_to_max() {
        let actions = ValidActions::standard(10, 60, 100);
        let decision =
            decide_with_odds(5.0, 0.5, 1_000, 10, &actions, &PolicyConfig::default(), &mut FixedDraw(0.0))
                .unwrap();
        assert_eq!(decision, Decision::raise(100));
    }

    #[test]
    fn closed_raise_falls_back_to_tier_action() {
        let actions = ValidActions::new(vec![ValidAction::fold(), ValidAction::call(10)]);
        let config = PolicyConfig::default();
        let strong = decide_with_odds(2.0, 0.5, 1_000, 10, &actions, &config, &mut FixedDraw(0.0)).unwrap();
        let weak = decide_with_odds(0.6, 1.0, 1_000, 10, &actions, &config, &mut FixedDraw(0.0)).unwrap();
        assert_eq!(strong, Decision::call(10));
        assert_eq!(weak, Decision::fold());
    }

    #[test]
    fn rng_draws_stay_in_unit_interval() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..1_000 {
            let draw = rng.next_uniform();
            assert!((0.0..1.0).contains(&draw));
        }
    }

    #[test]
    fn normalized_scale_stays_below_one() {
        let top = HandStrength::from_raw(HandStrength::CEILING - 1);
        assert!(StrengthScale::Normalized.apply(top) < 1.0);
        assert_eq!(StrengthScale::Packed.apply(top), (HandStrength::CEILING - 1) as f64);
    }
}
