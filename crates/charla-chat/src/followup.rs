//! Regex-based follow-up question detection.
//!
//! A query counts as a follow-up when its lower-cased text matches one of
//! a fixed list of continuation openers ("and ...", "what about ...",
//! "tell me more", a bare "why?" ...).

use regex::Regex;

use charla_core::TurnContext;

/// Continuation openers, checked in order. The first match wins.
const FOLLOWUP_PATTERNS: &[&str] = &[
    // Interrogative continuations: "what about", "how does", "why is" ...
    r"^(what|how|why|when|where|who|which)\s+(about|is|are|was|were|do|does|did|can|could|would|should|will)\s",
    // Coordinating-conjunction openers
    r"^(and|but|so|then|also)\s",
    // Modal continuations
    r"^(can|could|would|should|will)\s+(you|it|they|we)\s",
    // Copula continuations
    r"^(is|are|was|were|do|does|did)\s+(it|that|this|they|those|these)\s",
    // Elaboration requests
    r"^(tell me more|elaborate|explain further)\s*",
    // Bare "why?" / "how?"
    r"^(why|how)\?*$",
];

/// A query after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedQuery {
    /// The query exactly as received.
    pub text: String,
    pub is_followup: bool,
}

/// Compiled follow-up patterns, built once and reused across turns.
pub struct FollowupClassifier {
    patterns: Vec<Regex>,
}

impl Default for FollowupClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FollowupClassifier {
    pub fn new() -> Self {
        let patterns = FOLLOWUP_PATTERNS
            .iter()
            .map(|pat| Regex::new(pat).expect("Invalid follow-up regex"))
            .collect();
        Self { patterns }
    }

    /// Classify `query`. The prior context is accepted but does not yet
    /// influence the decision.
    pub fn classify(&self, query: &str, _prior: Option<&TurnContext>) -> ClassifiedQuery {
        ClassifiedQuery {
            text: query.to_string(),
            is_followup: self.is_followup(query),
        }
    }

    /// Case-insensitive check against the pattern list.
    pub fn is_followup(&self, query: &str) -> bool {
        let lowered = query.to_lowercase();
        self.patterns.iter().any(|re| re.is_match(&lowered))
    }
}
