use thiserror::Error;

/// Top-level error type for the Charla skill backend.
///
/// Subsystem crates define their own error types; this one covers the
/// concerns shared by all of them (configuration, I/O, serialization).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CharlaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for CharlaError {
    fn from(err: toml::de::Error) -> Self {
        CharlaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for CharlaError {
    fn from(err: toml::ser::Error) -> Self {
        CharlaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CharlaError {
    fn from(err: serde_json::Error) -> Self {
        CharlaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Charla operations.
pub type Result<T> = std::result::Result<T, CharlaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CharlaError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CharlaError = io_err.into();
        assert!(matches!(err, CharlaError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: CharlaError = toml_err.into();
        assert!(matches!(err, CharlaError::Config(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CharlaError = json_err.into();
        assert!(matches!(err, CharlaError::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error:"));
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(CharlaError, &str)> = vec![
            (
                CharlaError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                CharlaError::Server("bind failed".to_string()),
                "Server error: bind failed",
            ),
            (
                CharlaError::Serialization("eof".to_string()),
                "Serialization error: eof",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
