//! Fixed-window request limiter.
//!
//! Counts requests in one-second windows and answers 429 once the window's
//! budget is spent. The voice platform retries on its own, so overflow is
//! simply rejected.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ErrorBody;

const WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u64,
}

/// Shared per-second request budget.
#[derive(Debug, Clone)]
pub struct RequestLimiter {
    max_per_window: u64,
    window: Arc<Mutex<Window>>,
}

impl RequestLimiter {
    pub fn per_second(max_per_window: u64) -> Self {
        Self {
            max_per_window,
            window: Arc::new(Mutex::new(Window {
                started: Instant::now(),
                count: 0,
            })),
        }
    }

    /// Take one slot from the current window. `false` means over budget.
    pub fn admit(&self) -> bool {
        self.admit_at(Instant::now())
    }

    fn admit_at(&self, now: Instant) -> bool {
        let mut window = match self.window.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if now.duration_since(window.started) >= WINDOW {
            window.started = now;
            window.count = 0;
        }

        if window.count < self.max_per_window {
            window.count += 1;
            true
        } else {
            false
        }
    }
}

/// Axum middleware rejecting requests beyond the window budget.
pub async fn limit_requests(
    State(limiter): State<RequestLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.admit() {
        return next.run(req).await;
    }

    tracing::warn!(path = %req.uri().path(), "Request rejected by rate limiter");
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(ErrorBody {
            error: "too_many_requests".to_string(),
            message: "Rate limit exceeded".to_string(),
        }),
    )
        .into_response()
}
