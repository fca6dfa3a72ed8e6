//! AI flow commands.
//!
//! Summary, reminders and chat degrade to a fixed fallback message when the
//! text-generation service is unavailable; the other flows report errors.

use clap::{Args, Subcommand};
use neurocalm_core::ai::{
    assistant_reply, customize_personality, generate_daily_summary, generate_emotional_state,
    opening_turns, personalized_reminders, ChatMessage, DailySummaryInput, DailySummaryOutput,
    EmotionalStateInput, GeminiClient, PersonalityInput, RemindersInput, RemindersOutput,
    ASSISTANT_FALLBACK, REMINDERS_FALLBACK, SUMMARY_FALLBACK,
};
use neurocalm_core::profile::AssistantPersonality;
use neurocalm_core::{Config, CoreError, HealthReading};

/// Which reading to base the request on.
#[derive(Args)]
pub struct ReadingArgs {
    /// Regenerations to apply before reading
    #[arg(long, default_value = "0")]
    ticks: u32,
    /// Fixed random seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Daily mental-health summary of the current reading
    Summary(ReadingArgs),
    /// Personalized wellness reminders
    Reminders(ReadingArgs),
    /// Short label for the current emotional state
    Emotion(ReadingArgs),
    /// Ask the assistant something in a fresh conversation
    Chat {
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Change the assistant personality (shows the current one when omitted)
    Personality {
        /// calm, friendly, humorous or professional
        personality: Option<String>,
    },
}

fn reading(config: &Config, args: &ReadingArgs) -> HealthReading {
    super::store(config, args.seed, args.ticks).reading().clone()
}

pub fn run(action: AiAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let rt = super::runtime()?;

    match action {
        AiAction::Summary(args) => {
            let input = DailySummaryInput::from_reading(&reading(&config, &args));
            let result: Result<DailySummaryOutput, CoreError> = rt.block_on(async {
                let client = GeminiClient::from_config(&config.ai)?;
                Ok::<_, CoreError>(generate_daily_summary(&client, &input).await?)
            });
            let output = result.unwrap_or_else(|e| {
                tracing::error!(error = %e, "daily summary failed");
                DailySummaryOutput {
                    summary: SUMMARY_FALLBACK.to_string(),
                }
            });
            super::print_json(&output)?;
        }
        AiAction::Reminders(args) => {
            let input = RemindersInput::from_reading(
                &reading(&config, &args),
                config.assistant.wellness_goals.clone(),
                config.profile.assistant_personality,
            );
            let result: Result<RemindersOutput, CoreError> = rt.block_on(async {
                let client = GeminiClient::from_config(&config.ai)?;
                Ok::<_, CoreError>(personalized_reminders(&client, &input).await?)
            });
            let output = result.unwrap_or_else(|e| {
                tracing::error!(error = %e, "reminders failed");
                RemindersOutput {
                    reminders: vec![REMINDERS_FALLBACK.to_string()],
                }
            });
            super::print_json(&output)?;
        }
        AiAction::Emotion(args) => {
            let input = EmotionalStateInput::from_reading(&reading(&config, &args));
            let client = GeminiClient::from_config(&config.ai)?;
            let output = rt.block_on(generate_emotional_state(&client, &input))?;
            super::print_json(&output)?;
        }
        AiAction::Chat { message } => {
            let mut history = opening_turns();
            history.push(ChatMessage::user(message.join(" ")));
            let result: Result<String, CoreError> = rt.block_on(async {
                let client = GeminiClient::from_config(&config.ai)?;
                Ok::<_, CoreError>(assistant_reply(&client, &history).await?.text)
            });
            let text = result.unwrap_or_else(|e| {
                tracing::error!(error = %e, "assistant chat failed");
                ASSISTANT_FALLBACK.to_string()
            });
            println!("{text}");
        }
        AiAction::Personality { personality: None } => {
            println!("{}", config.profile.assistant_personality);
        }
        AiAction::Personality {
            personality: Some(name),
        } => {
            let personality: AssistantPersonality = name.parse()?;
            let client = GeminiClient::from_config(&config.ai)?;
            let input = PersonalityInput {
                personality: personality.to_string(),
            };
            let output = rt.block_on(customize_personality(&client, &input))?;
            if output.success {
                config.profile.assistant_personality = personality;
                config.save()?;
                tracing::info!(%personality, "assistant personality updated");
            }
            super::print_json(&output)?;
        }
    }
    Ok(())
}
