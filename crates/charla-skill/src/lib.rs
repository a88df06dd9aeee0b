//! Voice-platform skill layer.
//!
//! Decodes request envelopes, routes them to one handler per request type
//! or intent, and always produces a response envelope: faults end up in
//! the catch-all apology.

pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod handlers;

pub use dispatcher::SkillDispatcher;
pub use envelope::{RequestEnvelope, ResponseEnvelope, SkillRequest};
pub use error::SkillError;
pub use handlers::{HandlerInput, RequestHandler};
