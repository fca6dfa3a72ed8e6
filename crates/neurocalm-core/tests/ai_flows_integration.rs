//! Integration tests for the prompt flows over the HTTP client.
//!
//! A mockito server stands in for the text-generation service; inputs are
//! assembled from a live store reading the way consumers do it.

use std::time::Duration;

use mockito::Matcher;
use neurocalm_core::ai::{
    assistant_reply, generate_daily_summary, personalized_reminders, ChatMessage,
    DailySummaryInput, GeminiClient, RemindersInput,
};
use neurocalm_core::health::{HealthDataStore, ScriptedRandom};
use neurocalm_core::profile::AssistantPersonality;
use neurocalm_core::AiError;
use serde_json::json;
use url::Url;

const PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn client(server: &mockito::Server) -> GeminiClient {
    GeminiClient::new(
        Url::parse(&server.url()).unwrap(),
        "gemini-2.0-flash",
        "test-key",
        Duration::from_secs(5),
    )
    .unwrap()
}

fn candidate(text: &str) -> String {
    json!({ "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }] })
        .to_string()
}

#[tokio::test]
async fn test_daily_summary_from_current_reading() {
    let mut store = HealthDataStore::new(Box::new(ScriptedRandom::constant(0.5)));
    store.tick();
    let input = DailySummaryInput::from_reading(store.reading());
    assert_eq!(input.daily_activity, "Completed 5010 steps.");

    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("Mood Index: 7/10".into()),
            Matcher::Regex("Completed 5010 steps.".into()),
            Matcher::Regex("application/json".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate(r#"{"summary":"A balanced day. Try a short walk."}"#))
        .create_async()
        .await;

    let out = generate_daily_summary(&client(&server), &input).await.unwrap();
    assert_eq!(out.summary, "A balanced day. Try a short walk.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_reminders_failure_surfaces_status() {
    let store = HealthDataStore::new(Box::new(ScriptedRandom::constant(0.5)));
    let input = RemindersInput::from_reading(
        store.reading(),
        vec!["stress reduction".into()],
        AssistantPersonality::Friendly,
    );

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;

    let err = personalized_reminders(&client(&server), &input)
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::Status { status: 503, .. }));
}

#[tokio::test]
async fn test_reminders_reject_prose_output() {
    let store = HealthDataStore::new(Box::new(ScriptedRandom::constant(0.5)));
    let input = RemindersInput::from_reading(store.reading(), vec![], AssistantPersonality::Calm);

    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate("Drink some water!"))
        .create_async()
        .await;

    let err = personalized_reminders(&client(&server), &input)
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::InvalidOutput { .. }));
}

#[tokio::test]
async fn test_assistant_round_trip_keeps_roles() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::PartialJson(json!({
            "contents": [
                { "role": "user", "parts": [{ "text": "I slept badly" }] },
                { "role": "model", "parts": [{ "text": "Sorry to hear that." }] },
                { "role": "user", "parts": [{ "text": "Any tips?" }] }
            ],
            "systemInstruction": { "parts": [{ "text": neurocalm_core::ai::ASSISTANT_SYSTEM_PROMPT }] }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate("Keep a regular bedtime."))
        .create_async()
        .await;

    let history = vec![
        ChatMessage::user("I slept badly"),
        ChatMessage::model("Sorry to hear that."),
        ChatMessage::user("Any tips?"),
    ];
    let reply = assistant_reply(&client(&server), &history).await.unwrap();
    assert_eq!(reply.text, "Keep a regular bedtime.");
    mock.assert_async().await;
}
