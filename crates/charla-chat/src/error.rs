//! Error types for outbound completion calls.

use std::time::Duration;

/// Errors from a text-completion call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompletionError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("Error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl CompletionError {
    /// Text spoken to the user in place of an answer.
    ///
    /// API errors keep their status and message; every other fault gets the
    /// generic prefix.
    pub fn spoken(&self) -> String {
        match self {
            CompletionError::Api { .. } => self.to_string(),
            other => format!("Error al generar la respuesta: {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::MissingApiKey;
        assert_eq!(err.to_string(), "no API key configured");

        let err = CompletionError::Timeout(Duration::from_secs(3));
        assert_eq!(err.to_string(), "request timed out after 3s");

        let err = CompletionError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "transport error: connection refused");

        let err = CompletionError::Malformed("missing choices".to_string());
        assert_eq!(err.to_string(), "malformed response: missing choices");
    }

    #[test]
    fn test_api_error_spoken_verbatim() {
        let err = CompletionError::Api {
            status: 429,
            message: "Rate limit reached".to_string(),
        };
        assert_eq!(err.spoken(), "Error 429: Rate limit reached");
    }

    #[test]
    fn test_transport_error_spoken_with_prefix() {
        let err = CompletionError::Transport("dns failure".to_string());
        assert_eq!(
            err.spoken(),
            "Error al generar la respuesta: transport error: dns failure"
        );
    }

    #[test]
    fn test_timeout_and_malformed_spoken_with_prefix() {
        let spoken = CompletionError::Timeout(Duration::from_secs(8)).spoken();
        assert!(spoken.starts_with("Error al generar la respuesta"));

        let spoken = CompletionError::Malformed("eof".to_string()).spoken();
        assert!(spoken.starts_with("Error al generar la respuesta"));
        assert!(spoken.ends_with("eof"));
    }
}
