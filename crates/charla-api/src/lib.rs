//! Charla API crate - axum HTTP server exposing the skill endpoint.
//!
//! The voice platform POSTs request envelopes to `/skill`; `/health`
//! reports liveness for load balancers and deploy checks.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use rate_limit::RequestLimiter;
pub use routes::{create_router, create_router_with_limit, start_server};
pub use state::AppState;
