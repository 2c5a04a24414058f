//! crates/somnia_core/src/domain.rs
//!
//! Defines the core data structures for schedule and morning-routine
//! generation. Everything here is per-request data: entities are built for
//! one generation exchange and discarded with the response. Wire names are
//! camelCase to match the dashboard client.

use serde::{Deserialize, Serialize};

//=========================================================================================
// Sleep Schedule
//=========================================================================================

/// The sleep questionnaire submitted by the dashboard.
///
/// Every field defaults when absent; the generators tolerate sparse input
/// the same way the dashboard does. `bedtime` and `wake_time` are the
/// authoritative anchors for the generated schedule — chronotype and the
/// other descriptors only shape activity content, never the boundaries.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleRequest {
    pub chronotype: String,
    pub weekend_sleep: String,
    pub energy_pattern: String,
    pub bedtime: String,
    pub wake_time: String,
    pub challenges: Vec<String>,
    pub lifestyle: String,
    pub goals: Vec<String>,
}

/// Which part of the day a schedule entry belongs to.
///
/// `Evening` covers 6PM up to bedtime, `Night` the final hour or two before
/// sleep, and `Morning` the wake-up routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleCategory {
    Evening,
    Night,
    Morning,
}

/// One timed entry in a generated sleep schedule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleItem {
    /// Display time in 12-hour format, e.g. `"10:00 PM"`.
    pub time: String,
    pub activity: String,
    pub description: String,
    pub category: ScheduleCategory,
}

/// The schedule payload returned inside the response envelope.
///
/// An AI-generated plan carries 12-18 items; the deterministic fallback
/// carries exactly 5. `fallback_used` only appears on the wire when true.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePlan {
    #[serde(default)]
    pub summary: String,
    pub schedule: Vec<ScheduleItem>,
    #[serde(default, skip_serializing_if = "Recommendations::is_empty")]
    pub recommendations: Recommendations,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback_used: bool,
}

/// Short follow-up tips attached to a generated plan (at most 3).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Recommendations {
    #[serde(default)]
    pub tips: Vec<String>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }
}

//=========================================================================================
// Morning Routine
//=========================================================================================

/// The morning questionnaire submitted by the dashboard.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MorningRoutineRequest {
    pub current_wake_up_time: String,
    pub desired_wake_up_time: String,
    pub morning_goal: String,
    pub available_time: String,
    pub morning_energy_level: String,
    pub motivation_style: String,
    pub morning_mood: String,
    pub current_morning_activities: Vec<String>,
    pub exercise_preference: String,
    pub caffeine_habits: String,
    pub work_start_time: String,
    pub morning_commute: String,
    pub weekend_difference: String,
    pub morning_challenges: Vec<String>,
    pub productivity_goals: Vec<String>,
    pub wellness_goals: Vec<String>,
    pub morning_environment: String,
    pub seasonal_preferences: String,
    pub additional_info: String,
}

/// The kind of value a routine entry delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineCategory {
    Preparation,
    Wellness,
    Productivity,
    Energy,
}

/// One timed entry in a generated morning routine.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutineItem {
    /// Display time in 12-hour format, e.g. `"7:05 AM"`.
    pub time: String,
    pub activity: String,
    pub description: String,
    pub category: RoutineCategory,
}

/// The morning-routine payload returned inside the response envelope.
///
/// An AI-generated routine carries 6-12 items; the fallback exactly 4.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutinePlan {
    #[serde(default)]
    pub summary: String,
    pub routine: Vec<RoutineItem>,
    #[serde(default, skip_serializing_if = "Recommendations::is_empty")]
    pub recommendations: Recommendations,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback_used: bool,
}

//=========================================================================================
// Sleep Assistant
//=========================================================================================

/// A conversational answer from the sleep assistant, with whatever concrete
/// recommendation could be pulled out of the prose.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssistantReply {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<SleepRecommendation>,
}

/// Structured fields extracted from assistant prose. Extraction is
/// best-effort: any field the prose does not state is simply absent.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecommendation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tips: Vec<String>,
}

impl SleepRecommendation {
    pub fn is_empty(&self) -> bool {
        self.bedtime.is_none() && self.wake_time.is_none() && self.tips.is_empty()
    }
}

//=========================================================================================
// Free-text classifiers
//=========================================================================================

/// Coarse chronotype classification used by the fallback synthesizer.
///
/// The questionnaire sends chronotype as free text; the trigger substrings
/// below are the exact ones the dashboard produces, so they are matched
/// deliberately rather than inline. `Early` and `Night` are mutually
/// exclusive — the early match is checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChronotypeClass {
    Early,
    Night,
    Neutral,
}

impl ChronotypeClass {
    pub fn classify(chronotype: &str) -> Self {
        if chronotype.contains("early-morning") || chronotype.contains("morning") {
            ChronotypeClass::Early
        } else if chronotype.contains("evening") || chronotype.contains("night") {
            ChronotypeClass::Night
        } else {
            ChronotypeClass::Neutral
        }
    }
}

/// The two questionnaire challenges the fallback synthesizer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Challenge {
    ScreenAddiction,
    RacingMind,
}

impl Challenge {
    /// The exact string the dashboard sends for this challenge.
    pub fn marker(&self) -> &'static str {
        match self {
            Challenge::ScreenAddiction => "Screen addiction",
            Challenge::RacingMind => "Racing mind",
        }
    }

    /// True when any entry in `challenges` mentions this challenge.
    pub fn is_present_in(&self, challenges: &[String]) -> bool {
        let marker = self.marker();
        challenges.iter().any(|c| c.contains(marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn early_chronotype_triggers() {
        assert_eq!(
            ChronotypeClass::classify("early-morning type"),
            ChronotypeClass::Early
        );
        assert_eq!(
            ChronotypeClass::classify("morning person"),
            ChronotypeClass::Early
        );
    }

    #[test]
    fn night_chronotype_triggers() {
        assert_eq!(
            ChronotypeClass::classify("evening type"),
            ChronotypeClass::Night
        );
        assert_eq!(
            ChronotypeClass::classify("night owl"),
            ChronotypeClass::Night
        );
    }

    #[test]
    fn unknown_chronotype_is_neutral() {
        assert_eq!(ChronotypeClass::classify(""), ChronotypeClass::Neutral);
        assert_eq!(
            ChronotypeClass::classify("somewhere in between"),
            ChronotypeClass::Neutral
        );
    }

    #[test]
    fn early_wins_when_both_would_match() {
        // "morning and evening" contains both trigger families.
        assert_eq!(
            ChronotypeClass::classify("morning and evening"),
            ChronotypeClass::Early
        );
    }

    #[test]
    fn challenge_markers_are_exact() {
        assert_eq!(Challenge::ScreenAddiction.marker(), "Screen addiction");
        assert_eq!(Challenge::RacingMind.marker(), "Racing mind");
    }

    #[test]
    fn challenge_matches_by_substring() {
        let challenges = vec!["Screen addiction at night".to_string()];
        assert!(Challenge::ScreenAddiction.is_present_in(&challenges));
        assert!(!Challenge::RacingMind.is_present_in(&challenges));
    }

    #[test]
    fn fallback_flag_is_omitted_when_false() {
        let plan = SchedulePlan {
            summary: "ok".to_string(),
            schedule: Vec::new(),
            recommendations: Recommendations::default(),
            fallback_used: false,
        };
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json.get("fallbackUsed").is_none());
    }

    #[test]
    fn request_tolerates_missing_fields() {
        let req: ScheduleRequest = serde_json::from_str(r#"{"bedtime":"22:00"}"#).unwrap();
        assert_eq!(req.bedtime, "22:00");
        assert!(req.chronotype.is_empty());
        assert!(req.challenges.is_empty());
    }
}
