use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use holdem_agent::agent::{Agent, AgentConfig, DecisionRequest};
use holdem_agent::game::{ActionKind, Street};
use holdem_agent::policy::FixedDraw;
use holdem_agent::{EngineError, KickerMode};

fn request(street: &str, hole: [&str; 2], board: &[&str]) -> DecisionRequest {
    serde_json::from_value(json!({
        "valid_actions": [
            {"action": "fold", "amount": 0},
            {"action": "call", "amount": 20},
            {"action": "raise", "amount": {"min": 40, "max": 980}}
        ],
        "hole_card": hole,
        "round_state": {
            "street": street,
            "community_card": board,
            "seats": [
                {"uuid": "alpha", "stack": 1000, "name": "alpha", "state": "participating"},
                {"uuid": "bravo", "stack": 980, "name": "bravo", "state": "participating"},
                {"uuid": "charlie", "stack": 1000, "name": "charlie", "state": "participating"},
                {"uuid": "delta", "stack": 1000, "name": "delta", "state": "participating"},
                {"uuid": "echo", "stack": 1000, "name": "echo", "state": "participating"},
                {"uuid": "foxtrot", "stack": 1000, "name": "foxtrot", "state": "participating"}
            ],
            "dealer_btn": 3,
            "small_blind_amount": 10,
            "pot": {"main": {"amount": 30}, "side": []}
        }
    }))
    .expect("request parses")
}

#[test]
fn pocket_aces_shove_preflop() {
    let mut agent = Agent::with_source("alpha", AgentConfig::default(), FixedDraw(0.99));
    let decision = agent
        .respond(&request("preflop", ["HA", "DA"], &[]))
        .expect("decision");

    insta::assert_json_snapshot!(decision, @r#"
    {
      "action": "raise",
      "amount": 980
    }
    "#);
}

#[test]
fn late_position_calls_suited_connectors() {
    // dealer_btn 3: charlie sits at offset 5 (BB), alpha at offset 3 (BTN).
    let mut agent = Agent::with_source("alpha", AgentConfig::default(), FixedDraw(0.99));
    let decision = agent.respond(&request("preflop", ["H8", "H7"], &[])).unwrap();
    assert_eq!(decision.action, ActionKind::Call);
    assert_eq!(decision.amount, 20);

    let mut early = Agent::with_source("echo", AgentConfig::default(), FixedDraw(0.99));
    let decision = early.respond(&request("preflop", ["H8", "H7"], &[])).unwrap();
    assert_eq!(decision.action, ActionKind::Fold);
}

#[test]
fn full_house_on_the_river_never_folds() {
    let req = request("river", ["H7", "D2"], &["S7", "C7", "H2", "D9", "C3"]);
    assert_eq!(req.round_state.street, Street::River);

    for draw in [0.0, 0.5, 0.69, 0.7, 0.99] {
        let mut agent = Agent::with_source("bravo", AgentConfig::default(), FixedDraw(draw));
        let decision = agent.respond(&req).unwrap();
        assert_ne!(decision.action, ActionKind::Fold, "draw={draw}");
        if draw < 0.7 {
            assert_eq!(decision.action, ActionKind::Raise);
            assert_eq!(decision.amount, 80);
        } else {
            assert_eq!(decision.amount, 20);
        }
    }
}

#[test]
fn seeded_agents_repeat_themselves() {
    let config = AgentConfig {
        seed: Some(99),
        ..AgentConfig::default()
    };
    let req = request("turn", ["SK", "D4"], &["C9", "H6", "S2", "DJ"]);

    let mut first = Agent::new("alpha", config.clone());
    let mut second = Agent::new("alpha", config);
    for _ in 0..50 {
        assert_eq!(first.respond(&req).unwrap(), second.respond(&req).unwrap());
    }
}

#[test]
fn injected_generator_drives_postflop_mix() {
    let req = request("flop", ["SK", "D4"], &["C9", "H6", "S2"]);
    let mut agent = Agent::with_source(
        "alpha",
        AgentConfig {
            kicker_mode: KickerMode::Full,
            ..AgentConfig::default()
        },
        ChaCha8Rng::seed_from_u64(8),
    );

    let mut actions = Vec::new();
    for _ in 0..200 {
        actions.push(agent.respond(&req).unwrap().action);
    }
    assert!(actions.contains(&ActionKind::Raise));
    assert!(actions.contains(&ActionKind::Call));
    assert!(!actions.contains(&ActionKind::Fold));
}

#[test]
fn malformed_requests_surface_engine_errors() {
    let mut agent = Agent::with_source("alpha", AgentConfig::default(), FixedDraw(0.5));

    let mut req = request("flop", ["SK", "D4"], &["C9", "H6", "S2"]);
    req.hole_card.pop();
    assert!(matches!(agent.respond(&req), Err(EngineError::InvalidHand(_))));

    let duplicated = request("flop", ["SK", "D4"], &["SK", "H6", "S2"]);
    assert!(matches!(agent.respond(&duplicated), Err(EngineError::InvalidHand(_))));

    let bad_card = serde_json::from_value::<DecisionRequest>(json!({
        "valid_actions": [],
        "hole_card": ["XX", "DA"],
        "round_state": {
            "street": "preflop",
            "seats": [],
            "dealer_btn": 0,
            "small_blind_amount": 5
        }
    }));
    assert!(bad_card.is_err());
}

#[test]
fn oversized_call_is_rejected_without_panicking() {
    let mut req = request("flop", ["SK", "D4"], &["C9", "H6", "S2"]);
    req.valid_actions = serde_json::from_value(json!([
        {"action": "fold", "amount": 0},
        {"action": "call", "amount": 5_000_000_000_000_000_000_i64},
        {"action": "raise", "amount": {"min": -1, "max": -1}}
    ]))
    .unwrap();

    let mut agent = Agent::with_source("alpha", AgentConfig::default(), FixedDraw(0.5));
    assert!(matches!(
        agent.respond(&req),
        Err(EngineError::MalformedActionSet(_))
    ));

    let mut blinds = request("turn", ["SK", "D4"], &["C9", "H6", "S2", "DJ"]);
    blinds.round_state.small_blind_amount = i64::MAX;
    assert!(matches!(
        agent.respond(&blinds),
        Err(EngineError::UnsupportedTable(_))
    ));
}
