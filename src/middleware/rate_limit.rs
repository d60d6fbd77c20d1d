use axum::{
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Sliding-window request limiter keyed by client IP. Counters live in
/// process memory, so limits apply per instance, not across a fleet.
#[derive(Clone)]
pub struct RateLimitState {
    attempts: Arc<DashMap<String, Vec<Instant>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            attempts: Arc::new(DashMap::new()),
            max_requests,
            window_duration: Duration::from_secs(window_seconds),
        }
    }

    pub fn check_rate_limit(&self, ip: &str) -> bool {
        let now = Instant::now();
        let window_start = now - self.window_duration;

        let mut attempts = self.attempts.entry(ip.to_string()).or_default();
        attempts.retain(|&time| time > window_start);

        if attempts.len() < self.max_requests as usize {
            attempts.push(now);
            true
        } else {
            false
        }
    }

    /// Drop stale entries so the map does not grow without bound.
    pub fn cleanup(&self) {
        let cutoff = Instant::now() - self.window_duration * 2;
        self.attempts.retain(|_, attempts| {
            attempts.retain(|&time| time > cutoff);
            !attempts.is_empty()
        });
    }
}

pub async fn rate_limit(
    State(state): State<RateLimitState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let client_ip = req
        .headers()
        .get("x-forwarded-for")
        .or_else(|| req.headers().get("x-real-ip"))
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown");

    // Unknown IPs may be internal requests; let them through
    if client_ip == "unknown" {
        return Ok(next.run(req).await);
    }

    if !state.check_rate_limit(client_ip) {
        tracing::warn!("Rate limit exceeded for IP: {}", client_ip);
        return Ok(StatusCode::TOO_MANY_REQUESTS.into_response());
    }

    if state.attempts.len() % 100 == 0 {
        state.cleanup();
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_within_limit_pass() {
        let state = RateLimitState::new(3, 60);
        assert!(state.check_rate_limit("10.0.0.1"));
        assert!(state.check_rate_limit("10.0.0.1"));
        assert!(state.check_rate_limit("10.0.0.1"));
    }

    #[test]
    fn test_request_over_limit_rejected() {
        let state = RateLimitState::new(2, 60);
        assert!(state.check_rate_limit("10.0.0.1"));
        assert!(state.check_rate_limit("10.0.0.1"));
        assert!(!state.check_rate_limit("10.0.0.1"));
    }

    #[test]
    fn test_limits_are_per_ip() {
        let state = RateLimitState::new(1, 60);
        assert!(state.check_rate_limit("10.0.0.1"));
        assert!(state.check_rate_limit("10.0.0.2"));
        assert!(!state.check_rate_limit("10.0.0.1"));
    }

    #[test]
    fn test_cleanup_drops_empty_entries() {
        let state = RateLimitState::new(5, 0);
        state.check_rate_limit("10.0.0.1");
        state.cleanup();
        assert!(state.attempts.is_empty());
    }
}
