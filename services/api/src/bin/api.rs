//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{OpenAiAssistantAdapter, OpenAiCompletionAdapter},
    config::Config,
    error::ApiError,
    web::{
        generate_morning_routine_handler, generate_schedule_handler, health_handler,
        rest::ApiDoc, sleep_assistant_handler, state::AppState,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use somnia_core::ports::{CompletionService, SleepAssistantService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    // The server starts without a credential; generation endpoints answer
    // 500 until OPENAI_API_KEY is configured.
    let (completion, assistant): (
        Option<Arc<dyn CompletionService>>,
        Option<Arc<dyn SleepAssistantService>>,
    ) = match config.openai_api_key.as_deref() {
        Some(key) => {
            let openai_config = OpenAIConfig::new().with_api_key(key);
            let openai_client = Client::with_config(openai_config);
            (
                Some(Arc::new(OpenAiCompletionAdapter::new(
                    openai_client.clone(),
                    config.generation_model.clone(),
                ))),
                Some(Arc::new(OpenAiAssistantAdapter::new(
                    openai_client,
                    config.assistant_model.clone(),
                ))),
            )
        }
        None => {
            warn!("OPENAI_API_KEY is not set; generation endpoints will answer 500");
            (None, None)
        }
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        completion,
        assistant,
    });

    let cors_origin = config
        .frontend_origin
        .parse::<HeaderValue>()
        .map_err(|_| {
            ApiError::Internal(format!(
                "Invalid FRONTEND_ORIGIN in config: '{}'",
                config.frontend_origin
            ))
        })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/api/generate-schedule", post(generate_schedule_handler))
        .route(
            "/api/generate-morning-routine",
            post(generate_morning_routine_handler),
        )
        .route("/api/sleep-assistant", post(sleep_assistant_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
