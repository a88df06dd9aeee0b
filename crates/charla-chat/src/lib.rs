//! Conversational core of the Charla skill.
//!
//! Classifies follow-up questions, talks to the text-completion API,
//! renders answers as speech markup and runs one conversational turn
//! end to end.

pub mod backend;
pub mod client;
pub mod context;
pub mod error;
pub mod followup;
pub mod openai;
pub mod orchestrator;
pub mod render;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;

pub use backend::{ChatMessage, CompletionBackend, CompletionRequest, Role};
pub use client::{default_suggestions, parse_suggestions, AnswerOutcome, CompletionClient};
pub use context::extract_context;
pub use error::CompletionError;
pub use followup::{ClassifiedQuery, FollowupClassifier};
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use orchestrator::{TurnOrchestrator, TurnOutcome, TurnStage};
pub use render::{render_turn, SpokenResponse};
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedBackend;
