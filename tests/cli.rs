use std::io::Write;
use assert_cmd::Command;

use predicates::prelude::*;
use serde_json::json;

fn request_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    let body = json!({
        "player_id": "hero",
        "valid_actions": [
            {"action": "fold", "amount": 0},
            {"action": "call", "amount": 10},
            {"action": "raise", "amount": {"min": 20, "max": 300}}
        ],
        "hole_card": ["SA", "CA"],
        "round_state": {
            "street": "preflop",
            "community_card": [],
            "seats": [
                {"uuid": "villain", "stack": 300},
                {"uuid": "hero", "stack": 300}
            ],
            "dealer_btn": 0,
            "small_blind_amount": 5,
            "pot": {"main": {"amount": 15}, "side": []}
        }
    });
    write!(file, "{body}").expect("write request");
    file
}

#[test]
fn decide_prints_json_decision() {
    let file = request_file();
    let mut cmd = Command::cargo_bin("holdem-agent").expect("binary exists");
    cmd.arg("decide")
        .arg("--input")
        .arg(file.path())
        .arg("--json")
        .arg("--seed")
        .arg("7");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"{"action":"raise","amount":300}"#));
}

#[test]
fn decide_reads_stdin() {
    let file = request_file();
    let body = std::fs::read_to_string(file.path()).unwrap();
    let mut cmd = Command::cargo_bin("holdem-agent").expect("binary exists");
    cmd.arg("decide").arg("--no-color").write_stdin(body);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Decision: Raise to 300"));
}

#[test]
fn evaluate_reports_category() {
    let mut cmd = Command::cargo_bin("holdem-agent").expect("binary exists");
    cmd.args(["evaluate", "Ah", "Kh", "Qh", "Jh", "Th", "--no-color"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("straight flush"))
        .stdout(predicate::str::contains(format!("strength {}", 8 << 20)));
}

#[test]
fn evaluate_rejects_bad_cards() {
    let mut cmd = Command::cargo_bin("holdem-agent").expect("binary exists");
    cmd.args(["evaluate", "Ah", "Zz"]);

    cmd.assert().failure().stderr(predicate::str::contains("Zz"));
}

fn config_file(body: serde_json::Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{body}").expect("write config");
    file
}

#[test]
fn config_file_sets_kicker_mode() {
    let config = config_file(json!({"kicker_mode": "full", "strength_scale": "normalized"}));
    let mut cmd = Command::cargo_bin("holdem-agent").expect("binary exists");
    cmd.arg("--config")
        .arg(config.path())
        .args(["evaluate", "Ac", "Ad", "--no-color"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!("strength {}", (1 << 20) | (14 << 16))));
}

#[test]
fn flags_override_config_file() {
    let config = config_file(json!({"kicker_mode": "full"}));
    let mut cmd = Command::cargo_bin("holdem-agent").expect("binary exists");
    cmd.arg("--config")
        .arg(config.path())
        .args(["--kicker-mode", "reference", "evaluate", "Ac", "Ad", "--no-color"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!("strength {}", 1 << 20)));
}

#[test]
fn unreadable_config_fails() {
    let mut cmd = Command::cargo_bin("holdem-agent").expect("binary exists");
    cmd.args(["--config", "/nonexistent/agent.json", "evaluate", "Ac", "Ad"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("reading config"));
}
