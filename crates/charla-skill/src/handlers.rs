//! Request handlers, one per request type or intent.
//!
//! Each handler reads and updates the session state in its
//! [`HandlerInput`] and returns what to say. The dispatcher picks the
//! first handler whose `can_handle` accepts the request.

use std::sync::Arc;

use async_trait::async_trait;
use charla_chat::{CompletionBackend, SpokenResponse, TurnOrchestrator};
use charla_core::SessionState;
use tracing::info;

use crate::envelope::SkillRequest;
use crate::error::SkillError;

pub const QUERY_INTENT: &str = "GptQueryIntent";
pub const QUERY_SLOT: &str = "query";
pub const CLEAR_CONTEXT_INTENT: &str = "ClearContextIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";

const LAUNCH_SPEECH: &str = "Modo Chat G.P.T. activado.";
const CLEAR_SPEECH: &str =
    "He borrado nuestro historial de conversación. ¿Sobre qué te gustaría hablar?";
const FAREWELL_SPEECH: &str = "Saliendo del modo Chat G.P.T.";

/// Request plus the session state it operates on.
pub struct HandlerInput {
    pub request: SkillRequest,
    pub state: SessionState,
}

/// A handler for one kind of request.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn can_handle(&self, request: &SkillRequest) -> bool;

    /// Handle the request. `None` means acknowledge without speech.
    async fn handle(&self, input: &mut HandlerInput) -> Result<Option<SpokenResponse>, SkillError>;
}

// =============================================================================
// Launch
// =============================================================================

/// Starts the chat mode with a fresh history.
pub struct LaunchRequestHandler;

#[async_trait]
impl RequestHandler for LaunchRequestHandler {
    fn name(&self) -> &'static str {
        "launch"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        matches!(request, SkillRequest::LaunchRequest(_))
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Option<SpokenResponse>, SkillError> {
        input.state.reset_history();
        Ok(Some(SpokenResponse::ask(LAUNCH_SPEECH)))
    }
}

// =============================================================================
// Query
// =============================================================================

/// Answers the `query` slot through the turn orchestrator.
pub struct QueryIntentHandler<B> {
    orchestrator: Arc<TurnOrchestrator<B>>,
}

impl<B> QueryIntentHandler<B> {
    pub fn new(orchestrator: Arc<TurnOrchestrator<B>>) -> Self {
        Self { orchestrator }
    }
}

#[async_trait]
impl<B: CompletionBackend + 'static> RequestHandler for QueryIntentHandler<B> {
    fn name(&self) -> &'static str {
        "query"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        request.intent_name() == Some(QUERY_INTENT)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Option<SpokenResponse>, SkillError> {
        let query = match &input.request {
            SkillRequest::IntentRequest(req) => req
                .intent
                .slot_value(QUERY_SLOT)
                .map(str::to_string),
            _ => None,
        }
        .ok_or_else(|| SkillError::MissingSlot(QUERY_SLOT.to_string()))?;

        let state = std::mem::take(&mut input.state);
        let outcome = self.orchestrator.run_turn(state, &query).await;
        input.state = outcome.state;
        Ok(Some(outcome.spoken))
    }
}

// =============================================================================
// Clear context
// =============================================================================

/// Forgets the conversation so far.
pub struct ClearContextIntentHandler;

#[async_trait]
impl RequestHandler for ClearContextIntentHandler {
    fn name(&self) -> &'static str {
        "clear_context"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        request.intent_name() == Some(CLEAR_CONTEXT_INTENT)
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Option<SpokenResponse>, SkillError> {
        input.state.clear_context();
        Ok(Some(SpokenResponse::ask(CLEAR_SPEECH)))
    }
}

// =============================================================================
// Cancel / Stop
// =============================================================================

/// Says goodbye and ends the session.
pub struct CancelOrStopIntentHandler;

#[async_trait]
impl RequestHandler for CancelOrStopIntentHandler {
    fn name(&self) -> &'static str {
        "cancel_or_stop"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        matches!(request.intent_name(), Some(CANCEL_INTENT) | Some(STOP_INTENT))
    }

    async fn handle(&self, _input: &mut HandlerInput) -> Result<Option<SpokenResponse>, SkillError> {
        Ok(Some(SpokenResponse::say(FAREWELL_SPEECH)))
    }
}

// =============================================================================
// Session ended
// =============================================================================

/// Acknowledges the platform's session-ended notification.
pub struct SessionEndedRequestHandler;

#[async_trait]
impl RequestHandler for SessionEndedRequestHandler {
    fn name(&self) -> &'static str {
        "session_ended"
    }

    fn can_handle(&self, request: &SkillRequest) -> bool {
        matches!(request, SkillRequest::SessionEndedRequest(_))
    }

    async fn handle(&self, input: &mut HandlerInput) -> Result<Option<SpokenResponse>, SkillError> {
        if let SkillRequest::SessionEndedRequest(req) = &input.request {
            info!(
                reason = req.reason.as_deref().unwrap_or("unknown"),
                turns = input.state.chat_history.len(),
                "Session ended"
            );
        }
        Ok(None)
    }
}
