/// Per-caller request ceiling
use crate::error::ServerError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tilawa_client::SESSION_HEADER;
use tokio::time::Instant;

/// Identity used when neither a session header nor a peer address is known
pub const UNKNOWN_CALLER: &str = "unknown";

// Expired windows are swept once the table grows past this
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window limiter keyed by caller identity
///
/// A caller's window opens with its first request and lasts `window`; at most
/// `max_requests` are admitted in it. Counts are kept in memory only.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a request from `caller`; returns whether it is admitted
    pub fn check(&self, caller: &str) -> bool {
        self.check_at(caller, Instant::now())
    }

    /// Record a request from `caller` at `now`
    pub fn check_at(&self, caller: &str, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() > SWEEP_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.saturating_duration_since(w.started) < window);
        }

        let entry = windows.entry(caller.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        entry.count = entry.count.saturating_add(1);
        entry.count <= self.max_requests
    }

    /// Requests recorded for `caller` in its current window
    pub fn count(&self, caller: &str) -> u32 {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(caller)
            .map_or(0, |w| w.count)
    }
}

/// Caller identity: the session header, else the peer IP, else `"unknown"`
pub fn caller_identity(request: &Request) -> String {
    if let Some(session) = request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return session.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CALLER.to_string())
}

/// Middleware that rejects callers over their request ceiling
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let caller = caller_identity(&request);

    if !limiter.check(&caller) {
        tracing::warn!(caller = %caller, "Rate limit exceeded");
        return Err(ServerError::RateLimited);
    }

    Ok(next.run(request).await)
}
