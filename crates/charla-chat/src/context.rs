//! Conversation context extraction.

use charla_core::TurnContext;

/// Build the context record kept for the latest exchange.
pub fn extract_context(question: &str, response: &str) -> TurnContext {
    TurnContext {
        question: question.to_string(),
        response: response.to_string(),
    }
}
