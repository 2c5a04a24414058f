//! crates/somnia_core/src/fallback.rs
//!
//! Deterministic fallback synthesis. When the completion provider returns
//! something unusable, these pure functions build a minimal valid plan from
//! the request alone, so the caller always gets a schedule or routine. No
//! randomness, no clock reads: identical input yields identical output.

use chrono::{NaiveTime, Timelike};

use crate::domain::{
    Challenge, ChronotypeClass, MorningRoutineRequest, RoutineCategory, RoutineItem,
    ScheduleCategory, ScheduleItem, ScheduleRequest,
};

/// Summary attached to a fallback sleep schedule.
pub const FALLBACK_SCHEDULE_SUMMARY: &str =
    "A simple, evidence-based wind-down and wake plan built around your chosen bedtime and wake time.";

/// Summary attached to a fallback morning routine.
pub const FALLBACK_ROUTINE_SUMMARY: &str =
    "A short starter routine anchored to your wake-up time.";

//=========================================================================================
// Time helpers
//=========================================================================================

/// Parses the hour out of an `"HH:MM"` anchor, falling back to `default`
/// when the string is absent or unparseable.
fn anchor_hour(raw: &str, default: i32) -> i32 {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|t| t.hour() as i32)
        .unwrap_or(default)
}

/// Parses an `"HH:MM"` anchor into (hour, minute), falling back to the given
/// default when absent or unparseable.
fn anchor_time(raw: &str, default: (i32, i32)) -> (i32, i32) {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|t| (t.hour() as i32, t.minute() as i32))
        .unwrap_or(default)
}

/// Formats a 24-hour clock value as a 12-hour display string, e.g.
/// `(22, 0)` -> `"10:00 PM"`. Hours outside 0..24 are wrapped first.
fn format_clock(hour: i32, minute: i32) -> String {
    let hour = hour.rem_euclid(24);
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, suffix)
}

/// Adds `offset_minutes` to a clock time, carrying minutes into hours and
/// wrapping at 24h.
fn add_minutes(hour: i32, minute: i32, offset_minutes: i32) -> (i32, i32) {
    let total = (hour * 60 + minute + offset_minutes).rem_euclid(24 * 60);
    (total / 60, total % 60)
}

//=========================================================================================
// Sleep schedule fallback
//=========================================================================================

/// Builds the minimal 5-item sleep schedule.
///
/// Items sit at bedtime-3h, -2h, -1h, bedtime, and the wake hour. The first
/// and last items phrase-branch on an early chronotype; the screen-curfew
/// and relaxation items branch on the "Screen addiction" and "Racing mind"
/// challenges.
pub fn fallback_schedule(request: &ScheduleRequest) -> Vec<ScheduleItem> {
    let bed_hour = anchor_hour(&request.bedtime, 22);
    let wake_hour = anchor_hour(&request.wake_time, 6);

    let is_early = ChronotypeClass::classify(&request.chronotype) == ChronotypeClass::Early;
    let has_screens = Challenge::ScreenAddiction.is_present_in(&request.challenges);
    let has_racing_mind = Challenge::RacingMind.is_present_in(&request.challenges);

    vec![
        ScheduleItem {
            time: format_clock(bed_hour - 3, 0),
            activity: "Begin evening wind-down".to_string(),
            description: if is_early {
                "Close out the day's tasks and dim the lights early; your body is already drifting toward sleep."
                    .to_string()
            } else {
                "Finish dinner and active tasks, then lower the lights to signal the day is ending."
                    .to_string()
            },
            category: ScheduleCategory::Evening,
        },
        ScheduleItem {
            time: format_clock(bed_hour - 2, 0),
            activity: "Screen curfew".to_string(),
            description: if has_screens {
                "Put your phone and other devices in another room and replace scrolling with a paper book or podcast."
                    .to_string()
            } else {
                "Switch off bright screens and move to low-stimulation activities."
                    .to_string()
            },
            category: ScheduleCategory::Evening,
        },
        ScheduleItem {
            time: format_clock(bed_hour - 1, 0),
            activity: "Relaxation practice".to_string(),
            description: if has_racing_mind {
                "Calm a racing mind with slow 4-7-8 breathing or a short brain-dump journal."
                    .to_string()
            } else {
                "Do some gentle stretching or light reading to let your body unwind."
                    .to_string()
            },
            category: ScheduleCategory::Evening,
        },
        ScheduleItem {
            time: format_clock(bed_hour, 0),
            activity: "Lights out".to_string(),
            description: "Get into bed at your chosen bedtime; keep the room cool, dark, and quiet."
                .to_string(),
            category: ScheduleCategory::Night,
        },
        ScheduleItem {
            time: format_clock(wake_hour, 0),
            activity: "Wake up".to_string(),
            description: if is_early {
                "Rise at your target time and get sunlight right away; mornings are your natural strength."
                    .to_string()
            } else {
                "Get up at your target time, open the curtains, and skip the snooze button."
                    .to_string()
            },
            category: ScheduleCategory::Morning,
        },
    ]
}

//=========================================================================================
// Morning routine fallback
//=========================================================================================

/// Builds the minimal 4-item morning routine.
///
/// Anchored on the desired wake-up time (falling back to the current one,
/// then 7:00). Deliberately ignores every other questionnaire field — this
/// is the minimal viable routine, not a personalized one.
pub fn fallback_routine(request: &MorningRoutineRequest) -> Vec<RoutineItem> {
    let anchor = if !request.desired_wake_up_time.trim().is_empty() {
        request.desired_wake_up_time.as_str()
    } else if !request.current_wake_up_time.trim().is_empty() {
        request.current_wake_up_time.as_str()
    } else {
        "7:00"
    };
    let (wake_hour, wake_minute) = anchor_time(anchor, (7, 0));

    let step = |offset: i32, activity: &str, description: &str, category: RoutineCategory| {
        let (h, m) = add_minutes(wake_hour, wake_minute, offset);
        RoutineItem {
            time: format_clock(h, m),
            activity: activity.to_string(),
            description: description.to_string(),
            category,
        }
    };

    vec![
        step(
            0,
            "Gentle awakening",
            "Wake at your target time, sit up slowly, and take three deep breaths before reaching for anything.",
            RoutineCategory::Preparation,
        ),
        step(
            5,
            "Morning hydration",
            "Drink a full glass of water to rehydrate after the night.",
            RoutineCategory::Wellness,
        ),
        step(
            15,
            "Energizing movement",
            "Do a few minutes of stretching or light movement to wake your body up gently.",
            RoutineCategory::Wellness,
        ),
        step(
            30,
            "Mindful preparation",
            "Review your plan for the day over breakfast, before opening email or social feeds.",
            RoutineCategory::Preparation,
        ),
    ]
}
