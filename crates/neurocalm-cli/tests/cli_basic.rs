//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway config directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// Run a CLI command with `home` as the config directory and return output.
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_neurocalm-cli"))
        .args(args)
        .env("NEUROCALM_HOME", home)
        .env("NEUROCALM_LOG", "info")
        .env_remove("GEMINI_API_KEY")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_reading_show_baseline() {
    let home = tempfile::tempdir().unwrap();
    let json = run_json(home.path(), &["reading", "show"]);
    assert_eq!(json["reading"]["heartRate"], 75);
    assert_eq!(json["reading"]["bloodPressure"]["systolic"], 120);
    assert_eq!(json["reading"]["stressLevel"], "low");
    assert_eq!(json["dailyActivity"], "Completed 5000 steps.");
    assert_eq!(json["moodBand"], "excellent");
}

#[test]
fn test_reading_show_seeded_is_reproducible() {
    let home = tempfile::tempdir().unwrap();
    let a = run_json(home.path(), &["reading", "show", "--ticks", "5", "--seed", "9"]);
    let b = run_json(home.path(), &["reading", "show", "--ticks", "5", "--seed", "9"]);
    assert_eq!(a["reading"], b["reading"]);
    assert!(a["reading"]["dailySteps"].as_u64().unwrap() >= 5000);
}

#[test]
fn test_session_run_streams_events() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["session", "run", "--ticks", "2", "--interval-ms", "10", "--seed", "1"],
    );
    assert_eq!(code, 0, "session run failed: {stderr}");

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let types: Vec<&str> = events.iter().map(|v| v["type"].as_str().unwrap()).collect();
    assert_eq!(
        types,
        [
            "StateSnapshot",
            "SessionStarted",
            "ReadingUpdated",
            "ReadingUpdated",
            "SessionStopped"
        ]
    );
    assert_eq!(events[0]["devices"].as_array().unwrap().len(), 8);
    assert_eq!(events[0]["reading"]["heartRate"], 75);
    assert_eq!(events[4]["ticks"], 2);

    // Each regeneration is reported once, in order.
    let steps: Vec<u64> = events[2..4]
        .iter()
        .map(|v| v["reading"]["dailySteps"].as_u64().unwrap())
        .collect();
    assert!(steps[0] >= 5000 && steps[1] >= steps[0]);
}

#[test]
fn test_device_list_has_seed_registry() {
    let home = tempfile::tempdir().unwrap();
    let json = run_json(home.path(), &["device", "list"]);
    let devices = json.as_array().unwrap();
    assert_eq!(devices.len(), 8);
    assert_eq!(devices[2]["device"]["id"], "hrm");
    assert_eq!(devices[2]["status"], "Not Connected");
    assert_eq!(devices[0]["battery"], "full");
}

#[test]
fn test_device_toggle_unknown_is_noop() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(home.path(), &["device", "toggle", "nope"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("registry unchanged"));
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 8);
}

#[test]
fn test_device_add_after_discovery() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(
        home.path(),
        &["device", "add", "polar", "Polar H10", "--discovery-ms", "10"],
    );
    assert_eq!(code, 0, "device add failed: {stderr}");
    assert!(stdout.contains("\"DeviceAdded\""));
    assert!(stdout.contains("picsum.photos/seed/polar"));
}

#[test]
fn test_chart_vitals_single_kind() {
    let home = tempfile::tempdir().unwrap();
    let json = run_json(home.path(), &["chart", "vitals", "--kind", "spo2", "--seed", "2"]);
    let charts = json.as_array().unwrap();
    assert_eq!(charts.len(), 1);
    assert_eq!(charts[0]["title"], "Oxygen Saturation (SpO2)");
    assert_eq!(charts[0]["points"].as_array().unwrap().len(), 10);
}

#[test]
fn test_chart_rejects_unknown_wave() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(home.path(), &["chart", "eeg", "--wave", "gamma"]);
    assert_ne!(code, 0);
}

#[test]
fn test_ai_summary_falls_back_without_key() {
    let home = tempfile::tempdir().unwrap();
    let json = run_json(home.path(), &["ai", "summary"]);
    assert_eq!(
        json["summary"],
        "Could not generate your daily summary at this time."
    );
}

#[test]
fn test_ai_chat_falls_back_without_key() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, stderr, code) = run_cli(home.path(), &["ai", "chat", "hello"]);
    assert_eq!(code, 0, "ai chat failed: {stderr}");
    assert_eq!(
        stdout.trim(),
        "I'm having trouble connecting right now. Please try again later."
    );
    assert!(stderr.contains("GEMINI_API_KEY"));
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "simulation.seed", "17"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "simulation.seed"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "17");
    assert!(home.path().join("config.toml").exists());
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "nope", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_profile_show_and_validate() {
    let home = tempfile::tempdir().unwrap();
    let json = run_json(home.path(), &["profile", "show"]);
    assert_eq!(json["name"], "Jamie Appleseed");

    let json = run_json(home.path(), &["profile", "validate"]);
    assert_eq!(json["valid"], true);
}
