use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{CharlaError, Result};

/// Top-level configuration for the Charla skill backend.
///
/// Loaded from `~/.charla/config.toml` by default. Each section corresponds
/// to one concern of the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharlaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub skill: SkillConfig,
}

impl CharlaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CharlaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.completion.validate()
    }
}

/// General service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3040,
            log_level: "info".to_string(),
        }
    }
}

/// Outbound text-completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Base URL of the OpenAI-compatible API, without the `/v1/...` path.
    pub base_url: String,
    /// Bearer credential. `OPENAI_API_KEY` overrides this at startup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model used for the main answer.
    pub answer_model: String,
    /// Token limit for the main answer.
    pub answer_max_tokens: u32,
    /// Timeout for the main answer call, in seconds.
    pub answer_timeout_secs: u64,
    /// Model used for follow-up suggestions.
    pub suggestion_model: String,
    /// Token limit for the suggestion call.
    pub suggestion_max_tokens: u32,
    /// Sampling temperature for the suggestion call.
    pub suggestion_temperature: f32,
    /// Timeout for the suggestion call, in seconds.
    pub suggestion_timeout_secs: u64,
    /// Turns of history sent with a regular question.
    pub history_window: usize,
    /// Turns of history sent with a follow-up question.
    pub followup_history_window: usize,
    /// Number of follow-up suggestions requested per turn.
    pub suggestion_count: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: None,
            answer_model: "gpt-4o-mini".to_string(),
            answer_max_tokens: 300,
            answer_timeout_secs: 8,
            suggestion_model: "gpt-3.5-turbo".to_string(),
            suggestion_max_tokens: 50,
            suggestion_temperature: 0.7,
            suggestion_timeout_secs: 3,
            history_window: 10,
            followup_history_window: 5,
            suggestion_count: 2,
        }
    }
}

impl CompletionConfig {
    pub fn answer_timeout(&self) -> Duration {
        Duration::from_secs(self.answer_timeout_secs)
    }

    pub fn suggestion_timeout(&self) -> Duration {
        Duration::from_secs(self.suggestion_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.answer_model.trim().is_empty() || self.suggestion_model.trim().is_empty() {
            return Err(CharlaError::Config("model names must not be empty".into()));
        }
        if self.answer_timeout_secs == 0 || self.suggestion_timeout_secs == 0 {
            return Err(CharlaError::Config("timeouts must be at least 1 second".into()));
        }
        if self.history_window == 0 || self.followup_history_window == 0 {
            return Err(CharlaError::Config("history windows must be positive".into()));
        }
        if self.suggestion_count == 0 {
            return Err(CharlaError::Config("suggestion_count must be positive".into()));
        }
        Ok(())
    }
}

/// Voice-platform skill settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Expected skill application id. Requests from other skills are
    /// rejected when this is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}
