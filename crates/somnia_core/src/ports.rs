//! crates/somnia_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete completion provider.

use async_trait::async_trait;

use crate::domain::AssistantReply;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the external completion
/// provider (network failures, rate limits, SDK errors).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Upstream completion call failed: {0}")]
    Upstream(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A prompted text-completion service.
///
/// One outbound call per invocation, no retries. The returned text is
/// whatever the provider produced — it is expected, but not guaranteed, to
/// be a JSON document matching the caller's target schema; validating it is
/// the caller's job.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, system_prompt: &str, context: &str) -> PortResult<String>;
}

/// A conversational sleep coach.
///
/// Answers a free-form question and extracts whatever concrete bedtime,
/// wake-time, and tip recommendations appear in the prose. An answer with no
/// extractable recommendation is still a success.
#[async_trait]
pub trait SleepAssistantService: Send + Sync {
    async fn advise(&self, question: &str) -> PortResult<AssistantReply>;
}
