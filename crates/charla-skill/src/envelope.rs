//! Request and response envelopes exchanged with the voice platform.
//!
//! Only the fields this skill reads or writes are modelled; everything
//! else in the incoming JSON is ignored.

use std::collections::HashMap;
use std::fmt;

use charla_chat::SpokenResponse;
use serde::{Deserialize, Serialize};

const ENVELOPE_VERSION: &str = "1.0";

// =============================================================================
// Request
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub session: Option<Session>,
    pub request: SkillRequest,
}

impl RequestEnvelope {
    /// Session attributes as sent by the platform.
    pub fn attributes(&self) -> Option<&serde_json::Value> {
        self.session.as_ref().and_then(|s| s.attributes.as_ref())
    }

    /// Skill id the request is addressed to.
    pub fn application_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.application.as_ref())
            .map(|a| a.application_id.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub application: Option<Application>,
    #[serde(default)]
    pub attributes: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

/// The request body, discriminated by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkillRequest {
    LaunchRequest(RequestMeta),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
    #[serde(other)]
    Unsupported,
}

impl SkillRequest {
    /// Intent name, for intent requests.
    pub fn intent_name(&self) -> Option<&str> {
        match self {
            SkillRequest::IntentRequest(req) => Some(req.intent.name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for SkillRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillRequest::LaunchRequest(_) => f.write_str("LaunchRequest"),
            SkillRequest::IntentRequest(req) => write!(f, "IntentRequest({})", req.intent.name),
            SkillRequest::SessionEndedRequest(_) => f.write_str("SessionEndedRequest"),
            SkillRequest::Unsupported => f.write_str("Unsupported"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMeta {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    pub intent: Intent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Value of a filled slot.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|s| s.value.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

// =============================================================================
// Response
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<serde_json::Value>,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub ssml: String,
}

impl OutputSpeech {
    /// Wrap an SSML body in `<speak>`.
    pub fn ssml(body: &str) -> Self {
        Self {
            kind: "SSML".to_string(),
            ssml: format!("<speak>{}</speak>", body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl ResponseEnvelope {
    /// Build a response from rendered speech. A missing reprompt ends the
    /// session.
    pub fn from_spoken(spoken: &SpokenResponse, attributes: Option<serde_json::Value>) -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            session_attributes: attributes,
            response: ResponseBody {
                output_speech: Some(OutputSpeech::ssml(&spoken.speech)),
                reprompt: spoken.reprompt.as_deref().map(|text| Reprompt {
                    output_speech: OutputSpeech::ssml(text),
                }),
                should_end_session: Some(spoken.reprompt.is_none()),
            },
        }
    }

    /// A response with no speech, used to acknowledge session end.
    pub fn empty() -> Self {
        Self {
            version: ENVELOPE_VERSION.to_string(),
            session_attributes: None,
            response: ResponseBody::default(),
        }
    }

    /// Speech text without the `<speak>` wrapper, if any.
    pub fn speech_body(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(|s| {
            s.ssml
                .trim_start_matches("<speak>")
                .trim_end_matches("</speak>")
        })
    }
}
