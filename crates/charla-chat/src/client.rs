//! Answer and follow-up suggestion generation.
//!
//! Builds the message lists for both completion calls, applies the history
//! window, and turns every failure into something speakable. Neither
//! operation returns an error.

use charla_core::config::CompletionConfig;
use charla_core::{recent_turns, ChatTurn};
use tracing::{info, warn};

use crate::backend::{ChatMessage, CompletionBackend, CompletionRequest};

/// Base system instruction for the main answer.
const ANSWER_SYSTEM_PROMPT: &str = "Eres un asistente útil. Responde en 50 palabras o menos.";

/// Appended to the system instruction for follow-up questions.
const FOLLOWUP_DIRECTIVE: &str =
    " Esta es una pregunta de seguimiento. Mantén el contexto sin repetir información ya dada.";

const SUGGESTION_SYSTEM_PROMPT: &str =
    "Eres un asistente útil que sugiere preguntas de seguimiento cortas.";

/// Separator the model is asked to place between suggestions.
const SUGGESTION_DELIMITER: char = '|';

/// Suggestions longer than this many words are discarded.
const MAX_SUGGESTION_WORDS: usize = 4;

/// Offered whenever the model cannot produce enough usable suggestions.
const DEFAULT_SUGGESTIONS: [&str; 2] = ["Dime más", "Pon un ejemplo"];

/// Result of answering one query: always both fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// Spoken answer, or a formatted error message.
    pub text: String,
    /// Suggested next questions; empty when the answer call failed.
    pub suggestions: Vec<String>,
}

/// The fixed fallback suggestion pair.
pub fn default_suggestions() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// Parse a delimiter-joined suggestion list.
///
/// Entries are trimmed, stripped of trailing question marks, and dropped
/// when empty or longer than four words. Unless at least `count` entries
/// survive, the default pair is returned instead of a partial list.
pub fn parse_suggestions(raw: &str, count: usize) -> Vec<String> {
    let parsed: Vec<String> = raw
        .trim()
        .split(SUGGESTION_DELIMITER)
        .map(|s| s.trim().trim_end_matches('?').trim_end())
        .filter(|s| !s.is_empty() && s.split_whitespace().count() <= MAX_SUGGESTION_WORDS)
        .take(count)
        .map(str::to_string)
        .collect();

    if parsed.len() < count {
        default_suggestions()
    } else {
        parsed
    }
}

/// High-level client for the two completion calls of a turn.
pub struct CompletionClient<B> {
    backend: B,
    config: CompletionConfig,
}

impl<B: CompletionBackend> CompletionClient<B> {
    pub fn new(backend: B, config: CompletionConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Answer `query` given the prior turns.
    ///
    /// On success the follow-up suggestions are fetched as well. On any
    /// failure the error is rendered as the answer text and no suggestions
    /// are returned.
    pub async fn generate_answer(
        &self,
        history: &[ChatTurn],
        query: &str,
        is_followup: bool,
    ) -> AnswerOutcome {
        let request = self.answer_request(history, query, is_followup);

        match self.backend.complete(&request).await {
            Ok(text) => {
                let mut conversation = history.to_vec();
                conversation.push(ChatTurn::new(query, text.as_str()));
                let suggestions = self
                    .generate_followups(&conversation, query, &text, self.config.suggestion_count)
                    .await;
                AnswerOutcome { text, suggestions }
            }
            Err(e) => {
                warn!(error = %e, is_followup, "Answer generation failed");
                AnswerOutcome {
                    text: e.spoken(),
                    suggestions: Vec::new(),
                }
            }
        }
    }

    /// Ask for `count` short follow-up questions about the latest exchange.
    ///
    /// The last entry of `conversation`, if any, seeds the prompt as the
    /// previous question. After an answer that entry is the exchange just
    /// made. Never fails: any error yields the default pair.
    pub async fn generate_followups(
        &self,
        conversation: &[ChatTurn],
        query: &str,
        response: &str,
        count: usize,
    ) -> Vec<String> {
        let request = self.suggestion_request(conversation, query, response, count);

        let suggestions = match self.backend.complete(&request).await {
            Ok(raw) => parse_suggestions(&raw, count),
            Err(e) => {
                warn!(error = %e, "Suggestion generation failed, using defaults");
                default_suggestions()
            }
        };
        info!(?suggestions, "Generated follow-up questions");
        suggestions
    }

    fn answer_request(
        &self,
        history: &[ChatTurn],
        query: &str,
        is_followup: bool,
    ) -> CompletionRequest {
        let mut system = ANSWER_SYSTEM_PROMPT.to_string();
        if is_followup {
            system.push_str(FOLLOWUP_DIRECTIVE);
        }

        let window = if is_followup {
            self.config.followup_history_window
        } else {
            self.config.history_window
        };
        let recent = recent_turns(history, window);

        let mut messages = Vec::with_capacity(recent.len() * 2 + 2);
        messages.push(ChatMessage::system(system));
        for turn in recent {
            messages.push(ChatMessage::user(turn.question.as_str()));
            messages.push(ChatMessage::assistant(turn.answer.as_str()));
        }
        messages.push(ChatMessage::user(query));

        CompletionRequest {
            model: self.config.answer_model.clone(),
            messages,
            max_completion_tokens: self.config.answer_max_tokens,
            temperature: None,
            timeout: self.config.answer_timeout(),
        }
    }

    fn suggestion_request(
        &self,
        conversation: &[ChatTurn],
        query: &str,
        response: &str,
        count: usize,
    ) -> CompletionRequest {
        let instructions = format!(
            "Según la conversación, sugiere {count} preguntas de seguimiento muy breves \
             (máx. {MAX_SUGGESTION_WORDS} palabras cada una).\n\
             Hazlas directas y simples. Devuelve SOLO las preguntas separadas por '{SUGGESTION_DELIMITER}'.\n\
             Ejemplo: ¿Cuál es la capital?{SUGGESTION_DELIMITER}¿Qué tamaño tiene?"
        );

        let mut messages = vec![
            ChatMessage::system(SUGGESTION_SYSTEM_PROMPT),
            ChatMessage::user(instructions),
        ];
        if let Some(previous) = conversation.last() {
            messages.push(ChatMessage::user(format!(
                "Pregunta anterior: {}",
                previous.question
            )));
            messages.push(ChatMessage::assistant(previous.answer.as_str()));
        }
        messages.push(ChatMessage::user(format!("Pregunta actual: {}", query)));
        messages.push(ChatMessage::assistant(response));
        messages.push(ChatMessage::user(format!(
            "Preguntas de seguimiento (separadas por {}):",
            SUGGESTION_DELIMITER
        )));

        CompletionRequest {
            model: self.config.suggestion_model.clone(),
            messages,
            max_completion_tokens: self.config.suggestion_max_tokens,
            temperature: Some(self.config.suggestion_temperature),
            timeout: self.config.suggestion_timeout(),
        }
    }
}
