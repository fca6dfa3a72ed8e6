//! Prompt flows built on a [`TextGenerator`].
//!
//! Each flow renders a fixed prompt from a typed input and, except for the
//! conversational assistant, asks for a JSON document that is parsed into
//! the flow's output type. The returned text itself is never interpreted.

use indoc::{formatdoc, indoc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::client::{ChatMessage, GenerateRequest, TextGenerator};
use crate::error::AiError;
use crate::health::HealthReading;
use crate::profile::AssistantPersonality;

pub const SUMMARY_FALLBACK: &str = "Could not generate your daily summary at this time.";
pub const REMINDERS_FALLBACK: &str = "Could not generate reminders at this time.";
pub const ASSISTANT_FALLBACK: &str =
    "I'm having trouble connecting right now. Please try again later.";

pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are a friendly and helpful AI assistant named NeuroCalm. Your goal is to support users in their mental wellness journey.";

/// Most recent turns sent with each assistant request.
pub const HISTORY_WINDOW: usize = 10;

/// Model turns a new conversation opens with.
pub const ASSISTANT_GREETINGS: [&str; 2] = [
    "Hello! I am NeuroCalm, your personal mental wellness assistant. How are you feeling today?",
    "Based on your recent data, your stress levels seem a bit high. Would you like to try a 2-minute breathing exercise?",
];

/// History a fresh conversation starts from.
pub fn opening_turns() -> Vec<ChatMessage> {
    ASSISTANT_GREETINGS.iter().map(|&text| ChatMessage::model(text)).collect()
}

/// Strip a Markdown code fence some models wrap JSON in.
fn unfence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

async fn run_json<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    flow: &'static str,
    prompt: String,
) -> Result<T, AiError> {
    tracing::debug!(flow, "running flow");
    let text = generator.generate(GenerateRequest::prompt(prompt).json()).await?;
    serde_json::from_str(unfence(&text)).map_err(|source| AiError::InvalidOutput { flow, source })
}

// Daily summary

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummaryInput {
    pub mood_index: i32,
    pub emotional_stability_rating: i32,
    pub stress_risk_level: String,
    pub sleep_recovery_score: i32,
    pub daily_activity: String,
    pub heart_rate: i32,
    pub blood_pressure: String,
    pub oxygen_level: i32,
}

impl DailySummaryInput {
    pub fn from_reading(reading: &HealthReading) -> Self {
        Self {
            mood_index: reading.mood_index,
            emotional_stability_rating: reading.emotional_stability,
            stress_risk_level: reading.stress_level.as_str().to_string(),
            sleep_recovery_score: reading.sleep_recovery,
            daily_activity: reading.daily_activity(),
            heart_rate: reading.heart_rate,
            blood_pressure: reading.blood_pressure.to_string(),
            oxygen_level: reading.oxygen_level,
        }
    }

    fn prompt(&self) -> String {
        formatdoc! {"
            You are an AI mental health assistant. Generate a concise, insightful, and supportive daily summary of the user's mental and physical health based on the following information. Highlight trends and offer a piece of actionable advice.

            - Mood Index: {mood}/10
            - Emotional Stability Rating: {stability}/10
            - Stress Risk Level: {stress}
            - Sleep Recovery Score: {recovery}/100
            - Daily Activity: {activity}
            - Heart Rate: {hr} BPM
            - Blood Pressure: {bp} mmHg
            - Oxygen Level: {spo2}%

            Respond with a JSON object of the form {{\"summary\": string}}.",
            mood = self.mood_index,
            stability = self.emotional_stability_rating,
            stress = self.stress_risk_level,
            recovery = self.sleep_recovery_score,
            activity = self.daily_activity,
            hr = self.heart_rate,
            bp = self.blood_pressure,
            spo2 = self.oxygen_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummaryOutput {
    pub summary: String,
}

pub async fn generate_daily_summary(
    generator: &dyn TextGenerator,
    input: &DailySummaryInput,
) -> Result<DailySummaryOutput, AiError> {
    run_json(generator, "dailySummary", input.prompt()).await
}

// Personalized reminders

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemindersInput {
    pub emotional_state: String,
    pub blood_pressure: String,
    pub oxygen_level: i32,
    pub heart_rate: i32,
    pub sleep_quality: String,
    pub daily_activity: String,
    pub wellness_goals: Vec<String>,
    pub assistant_personality: String,
}

impl RemindersInput {
    pub fn from_reading(
        reading: &HealthReading,
        wellness_goals: Vec<String>,
        personality: AssistantPersonality,
    ) -> Self {
        Self {
            emotional_state: reading.emotional_state.clone(),
            blood_pressure: reading.blood_pressure.to_string(),
            oxygen_level: reading.oxygen_level,
            heart_rate: reading.heart_rate,
            sleep_quality: reading.sleep_quality.as_str().to_string(),
            daily_activity: reading.daily_activity(),
            wellness_goals,
            assistant_personality: personality.to_string(),
        }
    }

    fn prompt(&self) -> String {
        formatdoc! {"
            You are an AI assistant that provides personalized reminders to users based on their emotional state, health metrics, and wellness goals.

            Based on the user's current emotional state of {state}, blood pressure of {bp}, oxygen level of {spo2}, heart rate of {hr}, sleep quality of {sleep}, daily activity level of {activity}, wellness goals of {goals}, and your personality of {personality}, provide a list of personalized reminders to help the user manage their mental health and well-being.

            {examples}
            Respond with a JSON object of the form {{\"reminders\": [string]}}.",
            state = self.emotional_state,
            bp = self.blood_pressure,
            spo2 = self.oxygen_level,
            hr = self.heart_rate,
            sleep = self.sleep_quality,
            activity = self.daily_activity,
            goals = self.wellness_goals.join(", "),
            personality = self.assistant_personality,
            examples = REMINDER_EXAMPLES,
        }
    }
}

const REMINDER_EXAMPLES: &str = indoc! {"
    Example reminders:
    - Take a 3-minute breathing session to reduce stress.
    - It's time to wind down and prepare for sleep. Try a calming activity.
    - Remember to drink water and stay hydrated.
    - Take a short break from your work to stretch and move around.
    - Practice a short meditation.
    - Consider reframing any negative thoughts.
    - Optimize your sleep schedule for better recovery.
"};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemindersOutput {
    pub reminders: Vec<String>,
}

pub async fn personalized_reminders(
    generator: &dyn TextGenerator,
    input: &RemindersInput,
) -> Result<RemindersOutput, AiError> {
    run_json(generator, "personalizedReminders", input.prompt()).await
}

// Emotional state label

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalStateInput {
    pub blood_pressure: String,
    pub oxygen_level: i32,
    pub heart_rate: i32,
    pub sleep_quality: String,
    pub daily_activity: String,
}

impl EmotionalStateInput {
    pub fn from_reading(reading: &HealthReading) -> Self {
        Self {
            blood_pressure: reading.blood_pressure.to_string(),
            oxygen_level: reading.oxygen_level,
            heart_rate: reading.heart_rate,
            sleep_quality: reading.sleep_quality.as_str().to_string(),
            daily_activity: reading.daily_activity(),
        }
    }

    fn prompt(&self) -> String {
        formatdoc! {"
            Based on the following sensor data, generate a short, descriptive label of the user's emotional state.

            Sensor Data:
            - Blood Pressure: {bp}
            - Oxygen Level: {spo2}
            - Heart Rate: {hr}
            - Sleep Quality: {sleep}
            - Daily Activity: {activity}

            Respond with a JSON object of the form {{\"emotionalState\": string}}.",
            bp = self.blood_pressure,
            spo2 = self.oxygen_level,
            hr = self.heart_rate,
            sleep = self.sleep_quality,
            activity = self.daily_activity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalStateOutput {
    pub emotional_state: String,
}

pub async fn generate_emotional_state(
    generator: &dyn TextGenerator,
    input: &EmotionalStateInput,
) -> Result<EmotionalStateOutput, AiError> {
    run_json(generator, "emotionalState", input.prompt()).await
}

// Assistant chat

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub text: String,
}

/// Continue a conversation. `history` must end with the user's latest turn;
/// only the last [`HISTORY_WINDOW`] turns are sent.
pub async fn assistant_reply(
    generator: &dyn TextGenerator,
    history: &[ChatMessage],
) -> Result<AssistantReply, AiError> {
    let window = &history[history.len().saturating_sub(HISTORY_WINDOW)..];
    tracing::debug!(flow = "assistant", turns = history.len(), sent = window.len(), "running flow");
    let request = GenerateRequest {
        system: Some(ASSISTANT_SYSTEM_PROMPT.to_string()),
        history: window.to_vec(),
        ..GenerateRequest::default()
    };
    let text = generator.generate(request).await?;
    Ok(AssistantReply { text })
}

// Personality

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityInput {
    pub personality: String,
}

impl PersonalityInput {
    fn prompt(&self) -> String {
        formatdoc! {"
            You are an AI assistant tasked with customizing your personality based on user preferences.
            The user wants you to adopt a personality that is: {personality}.
            Confirm that you have updated your personality and provide a brief message to the user.

            Respond with a JSON object of the form {{\"success\": boolean, \"message\": string}}.",
            personality = self.personality,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityOutput {
    pub success: bool,
    pub message: String,
}

pub async fn customize_personality(
    generator: &dyn TextGenerator,
    input: &PersonalityInput,
) -> Result<PersonalityOutput, AiError> {
    run_json(generator, "customizePersonality", input.prompt()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::ai::Role;
    use std::sync::Mutex;

    /// Replies with a canned string and records every request.
    struct Canned {
        reply: String,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl Canned {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last(&self) -> GenerateRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, request: GenerateRequest) -> Result<String, AiError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn summary_input_uses_reading_fields() {
        let input = DailySummaryInput::from_reading(&HealthReading::baseline());
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["moodIndex"], 8);
        assert_eq!(json["emotionalStabilityRating"], 7);
        assert_eq!(json["stressRiskLevel"], "low");
        assert_eq!(json["sleepRecoveryScore"], 85);
        assert_eq!(json["dailyActivity"], "Completed 5000 steps.");
        assert_eq!(json["heartRate"], 75);
        assert_eq!(json["bloodPressure"], "120/80");
        assert_eq!(json["oxygenLevel"], 98);
    }

    #[tokio::test]
    async fn summary_prompt_and_parse() {
        let gen = Canned::new(r#"{"summary":"Steady day."}"#);
        let input = DailySummaryInput::from_reading(&HealthReading::baseline());
        let out = generate_daily_summary(&gen, &input).await.unwrap();
        assert_eq!(out.summary, "Steady day.");

        let req = gen.last();
        assert!(req.json_output);
        assert!(req.prompt.contains("- Mood Index: 8/10"));
        assert!(req.prompt.contains("- Blood Pressure: 120/80 mmHg"));
        assert!(req.prompt.contains(r#"{"summary": string}"#));
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let gen = Canned::new("```json\n{\"reminders\":[\"Drink water\"]}\n```");
        let input = RemindersInput::from_reading(
            &HealthReading::baseline(),
            vec!["sleep improvement".into()],
            AssistantPersonality::Calm,
        );
        let out = personalized_reminders(&gen, &input).await.unwrap();
        assert_eq!(out.reminders, vec!["Drink water".to_string()]);
        assert!(gen.last().prompt.contains("your personality of calm"));
    }

    #[tokio::test]
    async fn schema_mismatch_is_reported_with_flow_name() {
        let gen = Canned::new(r#"{"label":"Calm"}"#);
        let input = EmotionalStateInput::from_reading(&HealthReading::baseline());
        let err = generate_emotional_state(&gen, &input).await.unwrap_err();
        assert!(matches!(err, AiError::InvalidOutput { flow: "emotionalState", .. }));
    }

    #[tokio::test]
    async fn assistant_sends_history_with_system_prompt() {
        let gen = Canned::new("Hi! How are you feeling?");
        let history = vec![ChatMessage::user("hello")];
        let reply = assistant_reply(&gen, &history).await.unwrap();
        assert_eq!(reply.text, "Hi! How are you feeling?");

        let req = gen.last();
        assert_eq!(req.system.as_deref(), Some(ASSISTANT_SYSTEM_PROMPT));
        assert_eq!(req.history, history);
        assert!(req.prompt.is_empty());
        assert!(!req.json_output);
    }

    #[tokio::test]
    async fn assistant_sends_only_recent_turns() {
        let gen = Canned::new("ok");
        let history: Vec<ChatMessage> = (0..25)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::user(format!("turn {i}"))
                } else {
                    ChatMessage::model(format!("turn {i}"))
                }
            })
            .collect();
        assistant_reply(&gen, &history).await.unwrap();

        let req = gen.last();
        assert_eq!(req.history.len(), HISTORY_WINDOW);
        assert_eq!(req.history, history[15..]);
        assert_eq!(req.history.last().unwrap().text, "turn 24");
    }

    #[tokio::test]
    async fn conversation_opens_with_greetings() {
        let gen = Canned::new("Sure, let's breathe together.");
        let mut history = opening_turns();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|m| m.role == Role::Model));
        assert!(history[0].text.starts_with("Hello! I am NeuroCalm"));

        history.push(ChatMessage::user("yes please"));
        assistant_reply(&gen, &history).await.unwrap();
        assert_eq!(gen.last().history, history);
    }

    #[tokio::test]
    async fn personality_flow_parses_confirmation() {
        let gen = Canned::new(r#"{"success":true,"message":"I'll keep things calm."}"#);
        let input = PersonalityInput {
            personality: "calm".into(),
        };
        let out = customize_personality(&gen, &input).await.unwrap();
        assert!(out.success);
        assert!(gen.last().prompt.contains("personality that is: calm."));
    }

    #[test]
    fn unfence_leaves_plain_json_alone() {
        assert_eq!(unfence(" {\"a\":1} "), "{\"a\":1}");
        assert_eq!(unfence("```\n{}\n```"), "{}");
    }
}
