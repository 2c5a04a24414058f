//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use somnia_core::ports::{CompletionService, SleepAssistantService};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all
/// handlers. Generation calls are stateless: nothing here is mutable, and
/// concurrent requests share only these immutable handles.
///
/// The adapters are `None` when no completion-service credential was
/// configured; handlers check this per request and answer 500 without
/// attempting a network call.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub completion: Option<Arc<dyn CompletionService>>,
    pub assistant: Option<Arc<dyn SleepAssistantService>>,
}
