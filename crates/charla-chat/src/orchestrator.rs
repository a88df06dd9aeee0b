//! Turn orchestrator: one conversational turn from query to spoken reply.
//!
//! Classifies the query, asks for an answer and suggestions, records the
//! exchange in the session state and renders the speech. Every path ends
//! in a recorded, spoken turn.

use std::fmt;

use charla_core::{ChatTurn, SessionState};
use tracing::{debug, info};

use crate::backend::CompletionBackend;
use crate::client::CompletionClient;
use crate::context::extract_context;
use crate::followup::FollowupClassifier;
use crate::render::{render_turn, SpokenResponse};

/// Stages a turn passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Received,
    Classified,
    Answered,
    Suggested,
    Recorded,
    Rendered,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnStage::Received => "received",
            TurnStage::Classified => "classified",
            TurnStage::Answered => "answered",
            TurnStage::Suggested => "suggested",
            TurnStage::Recorded => "recorded",
            TurnStage::Rendered => "rendered",
        };
        f.write_str(name)
    }
}

/// Everything a finished turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Session state after the turn, to be handed back to the platform.
    pub state: SessionState,
    pub is_followup: bool,
    pub answer: String,
    pub suggestions: Vec<String>,
    pub spoken: SpokenResponse,
}

/// Coordinates classifier, completion client and renderer for one turn.
pub struct TurnOrchestrator<B> {
    classifier: FollowupClassifier,
    client: CompletionClient<B>,
}

impl<B: CompletionBackend> TurnOrchestrator<B> {
    pub fn new(client: CompletionClient<B>) -> Self {
        Self {
            classifier: FollowupClassifier::new(),
            client,
        }
    }

    pub fn client(&self) -> &CompletionClient<B> {
        &self.client
    }

    /// Run one turn. Takes the session state and returns its successor.
    pub async fn run_turn(&self, mut state: SessionState, query: &str) -> TurnOutcome {
        debug!(stage = %TurnStage::Received, query_len = query.len());

        let classified = self
            .classifier
            .classify(query, state.last_context.as_ref());
        debug!(stage = %TurnStage::Classified, is_followup = classified.is_followup);

        let outcome = self
            .client
            .generate_answer(&state.chat_history, &classified.text, classified.is_followup)
            .await;
        debug!(stage = %TurnStage::Answered, answer_len = outcome.text.len());
        debug!(
            stage = %TurnStage::Suggested,
            suggestions = outcome.suggestions.len()
        );

        state
            .chat_history
            .push(ChatTurn::new(query, outcome.text.as_str()));
        state.last_context = Some(extract_context(query, &outcome.text));
        state.followup_questions = outcome.suggestions.clone();
        debug!(stage = %TurnStage::Recorded, history_len = state.chat_history.len());

        let spoken = render_turn(&outcome.text, &outcome.suggestions);
        info!(
            stage = %TurnStage::Rendered,
            is_followup = classified.is_followup,
            history_len = state.chat_history.len(),
            "Turn complete"
        );

        TurnOutcome {
            state,
            is_followup: classified.is_followup,
            answer: outcome.text,
            suggestions: outcome.suggestions,
            spoken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::default_suggestions;
    use crate::error::CompletionError;
    use crate::scripted::ScriptedBackend;
    use charla_core::config::CompletionConfig;
    use charla_core::TurnContext;

    fn orchestrator(backend: ScriptedBackend) -> TurnOrchestrator<ScriptedBackend> {
        TurnOrchestrator::new(CompletionClient::new(backend, CompletionConfig::default()))
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(TurnStage::Received.to_string(), "received");
        assert_eq!(TurnStage::Suggested.to_string(), "suggested");
        assert_eq!(TurnStage::Rendered.to_string(), "rendered");
    }

    #[tokio::test]
    async fn test_successful_turn_records_history() {
        let orch = orchestrator(
            ScriptedBackend::new()
                .with_reply("Madrid.")
                .with_reply("Dime más|Pon un ejemplo"),
        );

        let outcome = orch
            .run_turn(SessionState::default(), "Capital de España")
            .await;

        assert_eq!(outcome.state.chat_history.len(), 1);
        assert_eq!(
            outcome.state.chat_history[0],
            ChatTurn::new("Capital de España", "Madrid.")
        );
        assert_eq!(
            outcome.state.last_context,
            Some(extract_context("Capital de España", "Madrid."))
        );
        assert_eq!(outcome.state.followup_questions, default_suggestions());
        assert!(outcome.spoken.speech.starts_with("Madrid. <break"));
        assert!(outcome
            .spoken
            .speech
            .ends_with("'Dime más', o 'Pon un ejemplo'. <break time=\"0.5s\"/> ¿Qué te gustaría saber?"));
        assert!(!outcome.is_followup);
    }

    #[tokio::test]
    async fn test_history_grows_by_one_per_turn() {
        let orch = orchestrator(
            ScriptedBackend::new()
                .with_reply("uno")
                .with_reply("a|b")
                .with_reply("dos")
                .with_reply("c|d"),
        );

        let first = orch.run_turn(SessionState::default(), "primera").await;
        let second = orch.run_turn(first.state, "And why?").await;

        assert_eq!(second.state.chat_history.len(), 2);
        assert!(second.is_followup);
        assert_eq!(second.state.followup_questions, vec!["c", "d"]);
        assert_eq!(
            second.state.last_context,
            Some(TurnContext {
                question: "And why?".into(),
                response: "dos".into()
            })
        );
    }

    #[tokio::test]
    async fn test_followup_turn_sends_prior_history() {
        let orch = orchestrator(ScriptedBackend::new().with_reply("x").with_reply("a|b"));
        let mut state = SessionState::default();
        state.chat_history.push(ChatTurn::new("previa", "respuesta previa"));

        orch.run_turn(state, "Tell me more").await;

        let requests = orch.client().backend().requests();
        let answer = &requests[0];
        assert!(answer.messages[0].content.contains("pregunta de seguimiento"));
        assert_eq!(answer.messages[1].content, "previa");
        // The suggestion call is seeded with the exchange just made
        assert_eq!(requests[1].messages[2].content, "Pregunta anterior: Tell me more");
        assert_eq!(requests[1].messages[3].content, "x");
        assert!(!requests[1].messages.iter().any(|m| m.content == "Pregunta anterior: previa"));
    }

    #[tokio::test]
    async fn test_failed_turn_still_recorded() {
        let orch = orchestrator(
            ScriptedBackend::new().with_error(CompletionError::Transport("down".into())),
        );

        let outcome = orch.run_turn(SessionState::default(), "hola").await;

        assert!(outcome.answer.contains("Error al generar la respuesta"));
        assert!(outcome.suggestions.is_empty());
        assert_eq!(outcome.state.chat_history.len(), 1);
        assert_eq!(outcome.state.chat_history[0].answer, outcome.answer);
        assert!(outcome.state.followup_questions.is_empty());
        assert_eq!(outcome.spoken.speech, outcome.answer);
        assert_eq!(
            outcome.spoken.reprompt.as_deref(),
            Some("Puedes hacerme otra pregunta o decir 'para' para terminar la conversación.")
        );
    }

    #[tokio::test]
    async fn test_turn_replaces_previous_suggestions() {
        let orch = orchestrator(
            ScriptedBackend::new().with_error(CompletionError::Api {
                status: 503,
                message: "overloaded".into(),
            }),
        );
        let mut state = SessionState::default();
        state.followup_questions = vec!["vieja".into(), "sugerencia".into()];

        let outcome = orch.run_turn(state, "hola").await;
        assert_eq!(outcome.answer, "Error 503: overloaded");
        assert!(outcome.state.followup_questions.is_empty());
    }
}
