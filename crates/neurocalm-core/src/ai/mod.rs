//! Wrappers around an external text-generation service.

mod client;
mod flows;

pub use client::{ChatMessage, GeminiClient, GenerateRequest, Role, TextGenerator};
pub use flows::{
    assistant_reply, customize_personality, generate_daily_summary, generate_emotional_state,
    opening_turns, personalized_reminders, AssistantReply, DailySummaryInput,
    DailySummaryOutput, EmotionalStateInput, EmotionalStateOutput, PersonalityInput,
    PersonalityOutput, RemindersInput, RemindersOutput, ASSISTANT_FALLBACK,
    ASSISTANT_GREETINGS, ASSISTANT_SYSTEM_PROMPT, HISTORY_WINDOW, REMINDERS_FALLBACK,
    SUMMARY_FALLBACK,
};
