use serde::{Deserialize, Serialize};

use crate::error::Result;

// =============================================================================
// Conversation turns
// =============================================================================

/// One resolved question/answer exchange.
///
/// The answer is whatever was spoken back, including formatted error text
/// when the completion call failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

impl ChatTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The last `limit` turns of `history`, oldest first.
pub fn recent_turns(history: &[ChatTurn], limit: usize) -> &[ChatTurn] {
    let start = history.len().saturating_sub(limit);
    &history[start..]
}

/// Minimal record of the latest exchange, kept for follow-up classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    pub question: String,
    pub response: String,
}

// =============================================================================
// SessionState
// =============================================================================

/// Per-conversation state carried in the voice platform's session attributes.
///
/// The platform hands the attributes in with every request and stores what
/// we hand back; nothing outlives the session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Resolved turns in insertion order.
    pub chat_history: Vec<ChatTurn>,
    /// The most recent turn, absent until the first answer or after a clear.
    pub last_context: Option<TurnContext>,
    /// Suggestions offered with the last answer.
    pub followup_questions: Vec<String>,
}

impl SessionState {
    /// Decode session attributes. Missing or null attributes yield an empty state.
    pub fn from_attributes(attributes: Option<&serde_json::Value>) -> Result<Self> {
        match attributes {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => Ok(serde_json::from_value(value.clone())?),
        }
    }

    /// Encode as a session attribute object.
    pub fn to_attributes(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Forget the chat history but keep the last context.
    pub fn reset_history(&mut self) {
        self.chat_history.clear();
    }

    /// Forget both the chat history and the last context.
    pub fn clear_context(&mut self) {
        self.chat_history.clear();
        self.last_context = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state_with_turns(n: usize) -> SessionState {
        SessionState {
            chat_history: (0..n)
                .map(|i| ChatTurn::new(format!("q{}", i), format!("a{}", i)))
                .collect(),
            ..SessionState::default()
        }
    }

    #[test]
    fn test_from_missing_attributes_is_empty() {
        let state = SessionState::from_attributes(None).unwrap();
        assert_eq!(state, SessionState::default());

        let state = SessionState::from_attributes(Some(&serde_json::Value::Null)).unwrap();
        assert!(state.chat_history.is_empty());
    }

    #[test]
    fn test_from_empty_object_is_empty() {
        let state = SessionState::from_attributes(Some(&json!({}))).unwrap();
        assert!(state.chat_history.is_empty());
        assert!(state.last_context.is_none());
        assert!(state.followup_questions.is_empty());
    }

    #[test]
    fn test_attributes_round_trip() {
        let mut state = state_with_turns(2);
        state.last_context = Some(TurnContext {
            question: "q1".into(),
            response: "a1".into(),
        });
        state.followup_questions = vec!["Dime más".into(), "Pon un ejemplo".into()];

        let attrs = state.to_attributes().unwrap();
        assert_eq!(attrs["chat_history"][1]["question"], "q1");
        assert_eq!(attrs["last_context"]["response"], "a1");

        let decoded = SessionState::from_attributes(Some(&attrs)).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_malformed_attributes_error() {
        let attrs = json!({"chat_history": "not a list"});
        assert!(SessionState::from_attributes(Some(&attrs)).is_err());
    }

    #[test]
    fn test_unknown_attributes_are_ignored() {
        let attrs = json!({"other_skill_key": 42});
        let state = SessionState::from_attributes(Some(&attrs)).unwrap();
        assert!(state.chat_history.is_empty());
    }

    #[test]
    fn test_reset_history_keeps_last_context() {
        let mut state = state_with_turns(3);
        state.last_context = Some(TurnContext {
            question: "q".into(),
            response: "r".into(),
        });
        state.reset_history();
        assert!(state.chat_history.is_empty());
        assert!(state.last_context.is_some());
    }

    #[test]
    fn test_clear_context() {
        let mut state = state_with_turns(3);
        state.last_context = Some(TurnContext {
            question: "q".into(),
            response: "r".into(),
        });
        state.clear_context();
        assert!(state.chat_history.is_empty());
        assert!(state.last_context.is_none());
    }

    #[test]
    fn test_recent_turns_window() {
        let state = state_with_turns(12);
        let recent = recent_turns(&state.chat_history, 10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].question, "q2");
        assert_eq!(recent[9].question, "q11");
    }

    #[test]
    fn test_recent_turns_shorter_history() {
        let state = state_with_turns(3);
        assert_eq!(recent_turns(&state.chat_history, 5).len(), 3);
        assert!(recent_turns(&[], 5).is_empty());
        assert!(recent_turns(&state.chat_history, 0).is_empty());
    }
}
