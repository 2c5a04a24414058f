//! crates/somnia_core/src/generate.rs
//!
//! The two generators: sleep schedule and morning routine. Each one is a
//! single stateless exchange: compose a context message from the
//! questionnaire, make one completion call, then parse-or-fallback. A
//! malformed completion result is absorbed by the deterministic fallback and
//! still counts as success; only config and upstream failures surface as
//! errors.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{
    MorningRoutineRequest, Recommendations, RoutinePlan, SchedulePlan, ScheduleRequest,
};
use crate::fallback::{
    fallback_routine, fallback_schedule, FALLBACK_ROUTINE_SUMMARY, FALLBACK_SCHEDULE_SUMMARY,
};
use crate::ports::{CompletionService, PortError};
use crate::prompts::{ROUTINE_SYSTEM_PROMPT, SCHEDULE_SYSTEM_PROMPT};

//=========================================================================================
// Error taxonomy
//=========================================================================================

/// Errors a generation call can surface to the HTTP boundary.
///
/// Note what is absent: there is no malformed-response variant. Unusable
/// completion content is recovered via the fallback synthesizer and never
/// reaches the caller as an error.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The caller omitted the request body. Maps to HTTP 400.
    #[error("A request body is required")]
    InvalidRequest,

    /// No completion-service credential is configured. Maps to HTTP 500;
    /// no network call is attempted.
    #[error("The completion service is not configured")]
    Configuration,

    /// The completion call itself failed (network, rate limit, SDK error).
    /// Maps to HTTP 500. Exactly one attempt is made; there are no retries.
    #[error("Completion service call failed: {0}")]
    Upstream(String),
}

impl From<PortError> for GenerateError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Upstream(msg) => GenerateError::Upstream(msg),
            PortError::Unexpected(msg) => GenerateError::Upstream(msg),
        }
    }
}

//=========================================================================================
// Parse-or-fallback strategy
//=========================================================================================

/// The recover-don't-fail policy, named so the intent is visible at the call
/// site: deserialize the completion text as `T` and keep it when `is_usable`
/// accepts it; otherwise log the problem and substitute the fallback plan.
pub fn parse_or_fallback<T: DeserializeOwned>(
    raw: &str,
    is_usable: impl FnOnce(&T) -> bool,
    fallback: impl FnOnce() -> T,
) -> T {
    match serde_json::from_str::<T>(raw) {
        Ok(parsed) if is_usable(&parsed) => parsed,
        Ok(_) => {
            warn!("completion returned JSON without a usable plan array; using fallback");
            fallback()
        }
        Err(err) => {
            warn!(error = %err, "completion returned unparseable content; using fallback");
            fallback()
        }
    }
}

//=========================================================================================
// Sleep schedule generation
//=========================================================================================

fn schedule_context(request: &ScheduleRequest) -> String {
    format!(
        "Create a personalized sleep schedule for this person.\n\n\
         Chronotype: {}\n\
         Weekend sleep pattern: {}\n\
         Energy pattern: {}\n\
         Desired bedtime: {} (authoritative - the schedule must honor this exactly)\n\
         Desired wake time: {} (authoritative - the schedule must honor this exactly)\n\
         Challenges (each must be addressed by a targeted activity): {}\n\
         Lifestyle: {}\n\
         Goals (design the schedule toward these): {}",
        request.chronotype,
        request.weekend_sleep,
        request.energy_pattern,
        request.bedtime,
        request.wake_time,
        request.challenges.join(", "),
        request.lifestyle,
        request.goals.join(", "),
    )
}

/// Generates a sleep schedule for one questionnaire.
///
/// Returns the AI plan verbatim when it parses into a non-empty schedule,
/// otherwise the 5-item fallback with `fallback_used` set. Upstream failures
/// propagate; they are not absorbed by the fallback.
pub async fn generate_schedule(
    completion: &dyn CompletionService,
    request: &ScheduleRequest,
) -> Result<SchedulePlan, GenerateError> {
    let context = schedule_context(request);
    let raw = completion.complete(SCHEDULE_SYSTEM_PROMPT, &context).await?;

    Ok(parse_or_fallback(
        &raw,
        |plan: &SchedulePlan| !plan.schedule.is_empty(),
        || SchedulePlan {
            summary: FALLBACK_SCHEDULE_SUMMARY.to_string(),
            schedule: fallback_schedule(request),
            recommendations: Recommendations::default(),
            fallback_used: true,
        },
    ))
}

//=========================================================================================
// Morning routine generation
//=========================================================================================

fn routine_context(request: &MorningRoutineRequest) -> String {
    format!(
        "Create a personalized morning routine for this person.\n\n\
         Current wake-up time: {}\n\
         Desired wake-up time: {} (authoritative - the routine must start here)\n\
         Main morning goal: {}\n\
         Available time: {}\n\
         Morning energy level: {}\n\
         Motivation style: {}\n\
         Desired morning mood: {}\n\
         Current morning activities: {}\n\
         Exercise preference: {}\n\
         Caffeine habits: {}\n\
         Work start time: {}\n\
         Morning commute: {}\n\
         Weekend difference: {}\n\
         Morning challenges (each must be addressed by a targeted step): {}\n\
         Productivity goals (design the routine toward these): {}\n\
         Wellness goals (design the routine toward these): {}\n\
         Morning environment: {}\n\
         Seasonal preferences: {}\n\
         Additional notes: {}",
        request.current_wake_up_time,
        request.desired_wake_up_time,
        request.morning_goal,
        request.available_time,
        request.morning_energy_level,
        request.motivation_style,
        request.morning_mood,
        request.current_morning_activities.join(", "),
        request.exercise_preference,
        request.caffeine_habits,
        request.work_start_time,
        request.morning_commute,
        request.weekend_difference,
        request.morning_challenges.join(", "),
        request.productivity_goals.join(", "),
        request.wellness_goals.join(", "),
        request.morning_environment,
        request.seasonal_preferences,
        request.additional_info,
    )
}

/// Generates a morning routine for one questionnaire. Mirrors
/// [`generate_schedule`] with a 4-item fallback.
pub async fn generate_morning_routine(
    completion: &dyn CompletionService,
    request: &MorningRoutineRequest,
) -> Result<RoutinePlan, GenerateError> {
    let context = routine_context(request);
    let raw = completion.complete(ROUTINE_SYSTEM_PROMPT, &context).await?;

    Ok(parse_or_fallback(
        &raw,
        |plan: &RoutinePlan| !plan.routine.is_empty(),
        || RoutinePlan {
            summary: FALLBACK_ROUTINE_SUMMARY.to_string(),
            routine: fallback_routine(request),
            recommendations: Recommendations::default(),
            fallback_used: true,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortResult;
    use async_trait::async_trait;

    /// A canned completion service for exercising the parse/fallback paths.
    struct CannedCompletion {
        response: Result<String, String>,
    }

    impl CannedCompletion {
        fn ok(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for CannedCompletion {
        async fn complete(&self, _system_prompt: &str, _context: &str) -> PortResult<String> {
            self.response
                .clone()
                .map_err(PortError::Upstream)
        }
    }

    fn schedule_request() -> ScheduleRequest {
        ScheduleRequest {
            chronotype: "night owl".to_string(),
            bedtime: "23:00".to_string(),
            wake_time: "07:00".to_string(),
            challenges: vec!["Racing mind".to_string()],
            goals: vec!["Fall asleep faster".to_string()],
            ..Default::default()
        }
    }

    const VALID_PLAN: &str = r#"{
        "summary": "A gradual wind-down.",
        "schedule": [
            {"time": "8:00 PM", "activity": "Dim lights", "description": "Lower the lights.", "category": "evening"},
            {"time": "11:00 PM", "activity": "Lights out", "description": "Sleep.", "category": "night"}
        ],
        "recommendations": {"tips": ["Keep the room cool"]}
    }"#;

    #[tokio::test]
    async fn valid_completion_passes_through() {
        let completion = CannedCompletion::ok(VALID_PLAN);
        let plan = generate_schedule(&completion, &schedule_request())
            .await
            .unwrap();
        assert!(!plan.fallback_used);
        assert_eq!(plan.summary, "A gradual wind-down.");
        assert_eq!(plan.schedule.len(), 2);
        assert_eq!(plan.recommendations.tips, vec!["Keep the room cool"]);
    }

    #[tokio::test]
    async fn unparseable_completion_uses_fallback() {
        let completion = CannedCompletion::ok("Sure! Here is your schedule: sleep well.");
        let plan = generate_schedule(&completion, &schedule_request())
            .await
            .unwrap();
        assert!(plan.fallback_used);
        assert_eq!(plan.schedule.len(), 5);
        assert_eq!(plan.summary, FALLBACK_SCHEDULE_SUMMARY);
    }

    #[tokio::test]
    async fn empty_schedule_array_uses_fallback() {
        let completion = CannedCompletion::ok(r#"{"summary": "hm", "schedule": []}"#);
        let plan = generate_schedule(&completion, &schedule_request())
            .await
            .unwrap();
        assert!(plan.fallback_used);
        assert_eq!(plan.schedule.len(), 5);
    }

    #[tokio::test]
    async fn upstream_failure_is_not_absorbed() {
        let completion = CannedCompletion::failing("connection refused");
        let err = generate_schedule(&completion, &schedule_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Upstream(_)));
    }

    #[tokio::test]
    async fn routine_fallback_has_four_items() {
        let completion = CannedCompletion::ok("not json");
        let request = MorningRoutineRequest {
            desired_wake_up_time: "06:30".to_string(),
            ..Default::default()
        };
        let plan = generate_morning_routine(&completion, &request)
            .await
            .unwrap();
        assert!(plan.fallback_used);
        assert_eq!(plan.routine.len(), 4);
        assert_eq!(plan.routine[0].time, "6:30 AM");
    }

    #[test]
    fn schedule_context_lists_every_field_with_flags() {
        let context = schedule_context(&schedule_request());
        assert!(context.contains("night owl"));
        assert!(context.contains("Desired bedtime: 23:00 (authoritative"));
        assert!(context.contains("Desired wake time: 07:00 (authoritative"));
        assert!(context.contains("Challenges (each must be addressed"));
        assert!(context.contains("Racing mind"));
        assert!(context.contains("Goals (design the schedule toward these): Fall asleep faster"));
    }

    #[test]
    fn routine_context_flags_desired_wake_time_as_authoritative() {
        let request = MorningRoutineRequest {
            current_wake_up_time: "8:00".to_string(),
            desired_wake_up_time: "6:45".to_string(),
            morning_challenges: vec!["Hitting snooze".to_string()],
            ..Default::default()
        };
        let context = routine_context(&request);
        assert!(context.contains("Desired wake-up time: 6:45 (authoritative"));
        assert!(context.contains("Hitting snooze"));
    }

    #[test]
    fn parse_or_fallback_keeps_usable_json() {
        let plan: SchedulePlan = parse_or_fallback(
            VALID_PLAN,
            |p: &SchedulePlan| !p.schedule.is_empty(),
            || unreachable!("fallback must not run for a usable plan"),
        );
        assert_eq!(plan.schedule.len(), 2);
    }
}
