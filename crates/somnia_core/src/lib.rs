pub mod domain;
pub mod fallback;
pub mod generate;
pub mod ports;
pub mod prompts;

pub use domain::{
    AssistantReply, Challenge, ChronotypeClass, MorningRoutineRequest, Recommendations,
    RoutineCategory, RoutineItem, RoutinePlan, ScheduleCategory, ScheduleItem, SchedulePlan,
    ScheduleRequest, SleepRecommendation,
};
pub use fallback::{fallback_routine, fallback_schedule};
pub use generate::{generate_morning_routine, generate_schedule, parse_or_fallback, GenerateError};
pub use ports::{CompletionService, PortError, PortResult, SleepAssistantService};
