//! Error types for skill request handling.

use charla_core::CharlaError;

/// Faults raised while handling a skill request. All of them are answered
/// by the catch-all handler.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("no handler for request: {0}")]
    Unsupported(String),
    #[error("slot '{0}' is missing or empty")]
    MissingSlot(String),
    #[error("invalid session attributes: {0}")]
    SessionAttributes(String),
}

impl From<CharlaError> for SkillError {
    fn from(err: CharlaError) -> Self {
        SkillError::SessionAttributes(err.to_string())
    }
}
