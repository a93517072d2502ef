//! Rate limiting middleware

use crate::config::RateLimitConfig;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<Windows>>,
    max_requests: usize,
    window: Duration,
}

/// Recent request times per client, plus when idle clients were last dropped.
struct Windows {
    by_ip: HashMap<IpAddr, Vec<Instant>>,
    last_sweep: Instant,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(Mutex::new(Windows {
                by_ip: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_seconds),
        }
    }

    /// Records the request and returns how many remain in the window.
    pub fn check(&self, ip: IpAddr) -> Result<usize, RateLimitError> {
        let now = Instant::now();
        let mut windows = self.windows.lock();

        if now.duration_since(windows.last_sweep) >= self.window {
            let window = self.window;
            windows.by_ip.retain(|_, entries| {
                entries.retain(|&instant| now.duration_since(instant) < window);
                !entries.is_empty()
            });
            windows.last_sweep = now;
        }

        let entries = windows.by_ip.entry(ip).or_default();
        entries.retain(|&instant| now.duration_since(instant) < self.window);

        if entries.len() >= self.max_requests {
            let oldest = entries.first().copied().unwrap_or(now);
            let reset_in = self.window.saturating_sub(now.duration_since(oldest));

            return Err(RateLimitError {
                retry_after_seconds: reset_in.as_secs().max(1),
                limit: self.max_requests,
            });
        }

        entries.push(now);
        Ok(self.max_requests - entries.len())
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// Number of clients currently holding window state.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().by_ip.len()
    }
}

#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after_seconds: u64,
    pub limit: usize,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": "Too many requests",
            "message": format!("Rate limit exceeded. Please retry after {} seconds", self.retry_after_seconds),
            "retry_after": self.retry_after_seconds,
            "limit": self.limit,
            "remaining": 0,
        }));

        let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
        let headers = response.headers_mut();
        headers.insert("X-RateLimit-Limit", HeaderValue::from(self.limit));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from(0u32));
        headers.insert("Retry-After", HeaderValue::from(self.retry_after_seconds));

        response
    }
}

/// Requests without a peer address (in-process tests) are not limited.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>().copied() else {
        return Ok(next.run(request).await);
    };

    let remaining = limiter.check(addr.ip())?;

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", HeaderValue::from(limiter.max_requests()));
    headers.insert("X-RateLimit-Remaining", HeaderValue::from(remaining));

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn limiter(max_requests: usize) -> RateLimiter {
        limiter_with_window(max_requests, 60)
    }

    fn limiter_with_window(max_requests: usize, window_seconds: u64) -> RateLimiter {
        RateLimiter::new(&RateLimitConfig {
            enable: true,
            max_requests,
            window_seconds,
        })
    }

    #[test]
    fn test_limit_is_enforced_per_ip() {
        let limiter = limiter(2);
        let first = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let second = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert_eq!(limiter.check(first).unwrap(), 1);
        assert_eq!(limiter.check(first).unwrap(), 0);

        let err = limiter.check(first).unwrap_err();
        assert_eq!(err.limit, 2);
        assert!(err.retry_after_seconds >= 1);

        assert!(limiter.check(second).is_ok());
    }

    #[test]
    fn test_idle_clients_are_forgotten_after_window() {
        let limiter = limiter_with_window(5, 1);

        for n in 0..10_000u32 {
            let ip = IpAddr::V4(Ipv4Addr::from(0x0a00_0000 + n));
            limiter.check(ip).unwrap();
        }
        assert_eq!(limiter.tracked_clients(), 10_000);

        std::thread::sleep(Duration::from_millis(1100));
        limiter.check(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1))).unwrap();

        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_active_client_survives_sweep() {
        let limiter = limiter_with_window(5, 1);
        let busy = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

        std::thread::sleep(Duration::from_millis(1100));
        limiter.check(busy).unwrap();
        assert_eq!(limiter.check(busy).unwrap(), 3);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_error_response() {
        let response = RateLimitError {
            retry_after_seconds: 30,
            limit: 5,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "30");
    }
}
