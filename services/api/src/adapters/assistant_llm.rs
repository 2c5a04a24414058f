//! services/api/src/adapters/assistant_llm.rs
//!
//! This module contains the adapter for the conversational sleep assistant.
//! It implements the `SleepAssistantService` port from the `core` crate and
//! regex-extracts whatever concrete bedtime/wake-time/tip recommendations
//! appear in the model's prose. Extraction is best-effort: prose with no
//! recognizable recommendation is still a valid answer.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a friendly, knowledgeable sleep coach having a conversation with one person about their sleep.

Your role:
- Answer the user's question in a natural, conversational way.
- Ground your advice in mainstream sleep science (consistent schedules, light exposure, wind-down routines, caffeine timing). No medical diagnoses; suggest seeing a doctor for suspected disorders.
- Keep answers to a short paragraph or two, like a real conversation.

When your answer includes a concrete schedule suggestion, state it plainly so it is easy to act on, for example:
- "I'd aim for a bedtime around 10:30 PM."
- "Try a wake time of 6:30 AM, even on weekends."

When you give multiple actionable suggestions, list them as short dashed bullet lines, one per line:
- Put your phone in another room an hour before bed.
- Keep the bedroom under 19 degrees.

Style:
- Sound like a person talking, not a textbook.
- Use contractions and plain language.
- Don't pad the answer with disclaimers or headings."#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use somnia_core::domain::{AssistantReply, SleepRecommendation};
use somnia_core::ports::{PortError, PortResult, SleepAssistantService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SleepAssistantService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAssistantAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAssistantAdapter {
    /// Creates a new `OpenAiAssistantAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// Prose extraction
//=========================================================================================

/// Pulls a structured recommendation out of free-form assistant prose.
///
/// Looks for a clock time near "bedtime"/"bed" wording, one near
/// "wake"/"get up" wording, and up to 3 dashed or numbered suggestion lines.
/// Returns `None` when nothing recognizable is present.
fn extract_recommendation(text: &str) -> Option<SleepRecommendation> {
    // A clock time like "10:30 PM", "6:30am", or "22:00".
    let bedtime_regex =
        Regex::new(r"(?i)bed(?:time)?[^.\n]*?(\d{1,2}:\d{2}\s*(?:[ap]\.?m\.?)?)").unwrap();
    let wake_regex =
        Regex::new(r"(?i)(?:wake|waking|get(?:ting)? up)[^.\n]*?(\d{1,2}:\d{2}\s*(?:[ap]\.?m\.?)?)")
            .unwrap();
    let tip_regex = Regex::new(r"(?m)^\s*(?:[-*\u{2022}]|\d+[.)])\s+(.+?)\s*$").unwrap();

    let bedtime = bedtime_regex
        .captures(text)
        .map(|c| c[1].trim().to_string());
    let wake_time = wake_regex.captures(text).map(|c| c[1].trim().to_string());
    let tips: Vec<String> = tip_regex
        .captures_iter(text)
        .take(3)
        .map(|c| c[1].to_string())
        .collect();

    let recommendation = SleepRecommendation {
        bedtime,
        wake_time,
        tips,
    };
    if recommendation.is_empty() {
        None
    } else {
        Some(recommendation)
    }
}

//=========================================================================================
// `SleepAssistantService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SleepAssistantService for OpenAiAssistantAdapter {
    /// Answers a free-form sleep question and attaches whatever concrete
    /// recommendation could be read out of the prose.
    async fn advise(&self, question: &str) -> PortResult<AssistantReply> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(question)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Upstream("Assistant response contained no text content.".to_string())
            })?;

        let recommendation = extract_recommendation(&answer);
        Ok(AssistantReply {
            answer,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bedtime_and_wake_time_from_prose() {
        let prose = "Given your schedule, I'd aim for a bedtime around 10:30 PM. \
                     Try a wake time of 6:30 AM, even on weekends.";
        let rec = extract_recommendation(prose).unwrap();
        assert_eq!(rec.bedtime.as_deref(), Some("10:30 PM"));
        assert_eq!(rec.wake_time.as_deref(), Some("6:30 AM"));
        assert!(rec.tips.is_empty());
    }

    #[test]
    fn extracts_dashed_tips_capped_at_three() {
        let prose = "A few things to try:\n\
                     - Put your phone in another room.\n\
                     - Keep the bedroom cool.\n\
                     - Skip caffeine after 2 PM.\n\
                     - Get sunlight in the morning.";
        let rec = extract_recommendation(prose).unwrap();
        assert_eq!(rec.tips.len(), 3);
        assert_eq!(rec.tips[0], "Put your phone in another room.");
    }

    #[test]
    fn extracts_numbered_tips() {
        let prose = "1. Dim the lights an hour before bed.\n2) Read something light.";
        let rec = extract_recommendation(prose).unwrap();
        assert_eq!(rec.tips.len(), 2);
        assert_eq!(rec.tips[1], "Read something light.");
    }

    #[test]
    fn plain_prose_yields_no_recommendation() {
        let prose = "Sleep pressure builds the longer you're awake, which is why naps \
                     late in the day can make it harder to fall asleep at night.";
        assert!(extract_recommendation(prose).is_none());
    }

    #[test]
    fn twenty_four_hour_times_are_accepted() {
        let prose = "Most people do well going to bed around 22:30.";
        let rec = extract_recommendation(prose).unwrap();
        assert_eq!(rec.bedtime.as_deref(), Some("22:30"));
    }
}
