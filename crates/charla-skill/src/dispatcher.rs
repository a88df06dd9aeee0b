//! Skill dispatcher: routes request envelopes to handlers.
//!
//! Decodes the session state, runs the first matching handler and encodes
//! the updated state into the response. Any fault is logged and answered
//! with a generic apology, echoing the incoming session attributes so a
//! failed request never changes the conversation.

use std::sync::Arc;

use charla_chat::{CompletionBackend, SpokenResponse, TurnOrchestrator};
use charla_core::SessionState;
use tracing::{debug, error};

use crate::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::error::SkillError;
use crate::handlers::{
    CancelOrStopIntentHandler, ClearContextIntentHandler, HandlerInput, LaunchRequestHandler,
    QueryIntentHandler, RequestHandler, SessionEndedRequestHandler,
};

const APOLOGY_SPEECH: &str =
    "Lo siento, he tenido problemas para hacer lo que pediste. Inténtalo de nuevo.";

/// Ordered handler list plus the catch-all fallback.
pub struct SkillDispatcher {
    handlers: Vec<Box<dyn RequestHandler>>,
}

impl SkillDispatcher {
    pub fn new(handlers: Vec<Box<dyn RequestHandler>>) -> Self {
        Self { handlers }
    }

    /// The standard chat skill: launch, query, clear-context, cancel/stop
    /// and session-ended handlers, in that order.
    pub fn chat<B: CompletionBackend + 'static>(orchestrator: Arc<TurnOrchestrator<B>>) -> Self {
        Self::new(vec![
            Box::new(LaunchRequestHandler),
            Box::new(QueryIntentHandler::new(orchestrator)),
            Box::new(ClearContextIntentHandler),
            Box::new(CancelOrStopIntentHandler),
            Box::new(SessionEndedRequestHandler),
        ])
    }

    /// Handle one request envelope. Never fails.
    pub async fn dispatch(&self, envelope: RequestEnvelope) -> ResponseEnvelope {
        let original_attributes = envelope.attributes().cloned();
        let request_label = envelope.request.to_string();

        match self.try_dispatch(envelope).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, request = %request_label, "Skill request failed");
                ResponseEnvelope::from_spoken(
                    &SpokenResponse::ask(APOLOGY_SPEECH),
                    original_attributes,
                )
            }
        }
    }

    async fn try_dispatch(&self, envelope: RequestEnvelope) -> Result<ResponseEnvelope, SkillError> {
        let state = SessionState::from_attributes(envelope.attributes())?;

        let handler = self
            .handlers
            .iter()
            .find(|h| h.can_handle(&envelope.request))
            .ok_or_else(|| SkillError::Unsupported(envelope.request.to_string()))?;
        debug!(handler = handler.name(), request = %envelope.request, "Dispatching");

        let mut input = HandlerInput {
            request: envelope.request,
            state,
        };
        let response = match handler.handle(&mut input).await? {
            Some(spoken) => {
                let attributes = input.state.to_attributes()?;
                ResponseEnvelope::from_spoken(&spoken, Some(attributes))
            }
            None => ResponseEnvelope::empty(),
        };
        Ok(response)
    }
}
