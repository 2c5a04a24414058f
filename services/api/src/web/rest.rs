//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Every JSON endpoint answers with the same envelope: `{"success": true,
//! "data": ...}` or `{"success": false, "error": "..."}`. A fallback plan is
//! a success — the dashboard only learns about the substitution through the
//! `fallbackUsed` flag inside the data.

use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use somnia_core::{
    generate_morning_routine, generate_schedule, GenerateError, MorningRoutineRequest,
    RoutinePlan, SchedulePlan, ScheduleRequest,
};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_schedule_handler,
        generate_morning_routine_handler,
        sleep_assistant_handler,
        health_handler,
    ),
    components(
        schemas(AssistantQuestion, HealthResponse)
    ),
    tags(
        (name = "Somnia API", description = "API endpoints for sleep schedule and morning routine generation.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Envelope
//=========================================================================================

/// The uniform response envelope shared by every JSON endpoint.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Maps a generation error onto its HTTP status.
fn status_for(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::InvalidRequest => StatusCode::BAD_REQUEST,
        GenerateError::Configuration | GenerateError::Upstream(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Parses a request body, treating an absent/blank body as
/// `InvalidRequest`. The body is read as a raw string so that every failure
/// mode produces the uniform envelope instead of an extractor rejection.
fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, GenerateError> {
    if body.trim().is_empty() {
        return Err(GenerateError::InvalidRequest);
    }
    serde_json::from_str(body).map_err(|_| GenerateError::InvalidRequest)
}

//=========================================================================================
// Request/Response Payload Structs
//=========================================================================================

/// The body of a sleep-assistant question.
#[derive(Deserialize, ToSchema)]
pub struct AssistantQuestion {
    #[serde(default)]
    pub question: String,
}

/// Liveness payload for `GET /health`.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a personalized sleep schedule.
///
/// Always answers 200 with a usable schedule when the request and
/// configuration are valid: an unusable completion result is replaced by the
/// deterministic 5-item fallback and flagged via `fallbackUsed`.
#[utoipa::path(
    post,
    path = "/api/generate-schedule",
    request_body(content_type = "application/json", description = "The sleep questionnaire (flat JSON object)."),
    responses(
        (status = 200, description = "Schedule generated (AI or fallback)"),
        (status = 400, description = "Missing or malformed request body"),
        (status = 500, description = "Completion service unconfigured or unreachable")
    )
)]
pub async fn generate_schedule_handler(
    State(app_state): State<Arc<AppState>>,
    body: String,
) -> (StatusCode, Json<ApiResponse<SchedulePlan>>) {
    let request: ScheduleRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(err) => return (status_for(&err), Json(ApiResponse::failure(err.to_string()))),
    };

    let Some(completion) = app_state.completion.as_ref() else {
        let err = GenerateError::Configuration;
        return (status_for(&err), Json(ApiResponse::failure(err.to_string())));
    };

    match generate_schedule(completion.as_ref(), &request).await {
        Ok(plan) => (StatusCode::OK, Json(ApiResponse::ok(plan))),
        Err(err) => {
            error!("Failed to generate schedule: {:?}", err);
            (status_for(&err), Json(ApiResponse::failure(err.to_string())))
        }
    }
}

/// Generate a personalized morning routine.
///
/// Mirrors the schedule endpoint with a 4-item fallback.
#[utoipa::path(
    post,
    path = "/api/generate-morning-routine",
    request_body(content_type = "application/json", description = "The morning questionnaire (flat JSON object)."),
    responses(
        (status = 200, description = "Routine generated (AI or fallback)"),
        (status = 400, description = "Missing or malformed request body"),
        (status = 500, description = "Completion service unconfigured or unreachable")
    )
)]
pub async fn generate_morning_routine_handler(
    State(app_state): State<Arc<AppState>>,
    body: String,
) -> (StatusCode, Json<ApiResponse<RoutinePlan>>) {
    let request: MorningRoutineRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(err) => return (status_for(&err), Json(ApiResponse::failure(err.to_string()))),
    };

    let Some(completion) = app_state.completion.as_ref() else {
        let err = GenerateError::Configuration;
        return (status_for(&err), Json(ApiResponse::failure(err.to_string())));
    };

    match generate_morning_routine(completion.as_ref(), &request).await {
        Ok(plan) => (StatusCode::OK, Json(ApiResponse::ok(plan))),
        Err(err) => {
            error!("Failed to generate morning routine: {:?}", err);
            (status_for(&err), Json(ApiResponse::failure(err.to_string())))
        }
    }
}

/// Ask the conversational sleep assistant a free-form question.
///
/// The answer is prose; any bedtime/wake-time/tip recommendations that can
/// be read out of it are attached as structured data. An answer with no
/// extractable recommendation is still a success.
#[utoipa::path(
    post,
    path = "/api/sleep-assistant",
    request_body = AssistantQuestion,
    responses(
        (status = 200, description = "Assistant answered"),
        (status = 400, description = "Missing or empty question"),
        (status = 500, description = "Completion service unconfigured or unreachable")
    )
)]
pub async fn sleep_assistant_handler(
    State(app_state): State<Arc<AppState>>,
    body: String,
) -> (StatusCode, Json<ApiResponse<somnia_core::AssistantReply>>) {
    let question = match parse_body::<AssistantQuestion>(&body) {
        Ok(payload) if !payload.question.trim().is_empty() => payload.question,
        Ok(_) => {
            let err = GenerateError::InvalidRequest;
            return (status_for(&err), Json(ApiResponse::failure(err.to_string())));
        }
        Err(err) => return (status_for(&err), Json(ApiResponse::failure(err.to_string()))),
    };

    let Some(assistant) = app_state.assistant.as_ref() else {
        let err = GenerateError::Configuration;
        return (status_for(&err), Json(ApiResponse::failure(err.to_string())));
    };

    match assistant.advise(&question).await {
        Ok(reply) => (StatusCode::OK, Json(ApiResponse::ok(reply))),
        Err(err) => {
            error!("Sleep assistant call failed: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(err.to_string())),
            )
        }
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "somnia-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use somnia_core::ports::{CompletionService, PortError, PortResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::Level;

    /// Counts calls and returns a canned completion, for pinning the
    /// one-attempt-per-request behavior.
    struct CountingCompletion {
        calls: Arc<AtomicUsize>,
        response: String,
    }

    #[async_trait]
    impl CompletionService for CountingCompletion {
        async fn complete(&self, _system_prompt: &str, _context: &str) -> PortResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    struct FailingCompletion;

    #[async_trait]
    impl CompletionService for FailingCompletion {
        async fn complete(&self, _system_prompt: &str, _context: &str) -> PortResult<String> {
            Err(PortError::Upstream("connection refused".to_string()))
        }
    }

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: Level::INFO,
            openai_api_key: None,
            generation_model: "gpt-4o".to_string(),
            assistant_model: "gpt-4o-mini".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
        })
    }

    fn state_with_completion(
        completion: Option<Arc<dyn CompletionService>>,
    ) -> Arc<AppState> {
        Arc::new(AppState {
            config: test_config(),
            completion,
            assistant: None,
        })
    }

    fn counting_state(response: &str) -> (Arc<AppState>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = state_with_completion(Some(Arc::new(CountingCompletion {
            calls: calls.clone(),
            response: response.to_string(),
        })));
        (state, calls)
    }

    const VALID_PLAN: &str = r#"{
        "summary": "A gradual wind-down.",
        "schedule": [
            {"time": "8:00 PM", "activity": "Dim lights", "description": "Lower the lights.", "category": "evening"},
            {"time": "10:00 PM", "activity": "Lights out", "description": "Sleep.", "category": "night"}
        ]
    }"#;

    #[tokio::test]
    async fn missing_body_is_a_400_envelope() {
        let (state, calls) = counting_state(VALID_PLAN);
        let (status, Json(envelope)) =
            generate_schedule_handler(State(state), String::new()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!envelope.success);
        assert!(envelope.error.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_credential_is_a_500_envelope() {
        let state = state_with_completion(None);
        let (status, Json(envelope)) =
            generate_schedule_handler(State(state), "{}".to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!envelope.success);
    }

    #[tokio::test]
    async fn valid_completion_passes_through_with_one_call() {
        let (state, calls) = counting_state(VALID_PLAN);
        let (status, Json(envelope)) = generate_schedule_handler(
            State(state),
            r#"{"bedtime":"22:00","wakeTime":"06:00"}"#.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let plan = envelope.data.unwrap();
        assert!(!plan.fallback_used);
        assert_eq!(plan.schedule.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_completion_degrades_to_fallback() {
        let (state, _calls) = counting_state("Here you go! Sleep tight.");
        let (status, Json(envelope)) = generate_schedule_handler(
            State(state),
            r#"{"bedtime":"22:00","wakeTime":"06:00"}"#.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(envelope.success);
        let plan = envelope.data.unwrap();
        assert!(plan.fallback_used);
        assert_eq!(plan.schedule.len(), 5);
    }

    #[tokio::test]
    async fn upstream_failure_is_a_500_envelope() {
        let state = state_with_completion(Some(Arc::new(FailingCompletion)));
        let (status, Json(envelope)) =
            generate_schedule_handler(State(state), "{}".to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn morning_routine_fallback_has_four_items() {
        let (state, _calls) = counting_state("not json");
        let (status, Json(envelope)) = generate_morning_routine_handler(
            State(state),
            r#"{"desiredWakeUpTime":"07:00"}"#.to_string(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let plan = envelope.data.unwrap();
        assert!(plan.fallback_used);
        assert_eq!(plan.routine.len(), 4);
        assert_eq!(plan.routine[1].time, "7:05 AM");
    }

    #[tokio::test]
    async fn fallback_flag_is_absent_on_the_wire_for_ai_plans() {
        let (state, _calls) = counting_state(VALID_PLAN);
        let (_, Json(envelope)) = generate_schedule_handler(
            State(state),
            r#"{"bedtime":"22:00"}"#.to_string(),
        )
        .await;
        let json = serde_json::to_value(&envelope.data.unwrap()).unwrap();
        assert!(json.get("fallbackUsed").is_none());
    }

    #[tokio::test]
    async fn empty_assistant_question_is_a_400_envelope() {
        let state = state_with_completion(None);
        let (status, Json(envelope)) =
            sleep_assistant_handler(State(state), r#"{"question":"  "}"#.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!envelope.success);
    }
}
