//! Application state shared across all route handlers.
//!
//! Passed to handlers via axum's State extractor. Nothing in here is
//! mutated per request: conversation state travels inside the envelopes.

use std::sync::Arc;
use std::time::Instant;

use charla_skill::SkillDispatcher;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Routes skill requests to handlers.
    pub dispatcher: Arc<SkillDispatcher>,
    /// Expected skill application id, if verification is enabled.
    pub application_id: Option<String>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(dispatcher: SkillDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            application_id: None,
            start_time: Instant::now(),
        }
    }

    /// Only accept requests addressed to `application_id`.
    pub fn with_application_id(mut self, application_id: Option<String>) -> Self {
        self.application_id = application_id.filter(|id| !id.is_empty());
        self
    }
}
