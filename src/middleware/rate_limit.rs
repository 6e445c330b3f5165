//! # Auth Rate Limiting
//!
//! Fixed rolling-window rate limiter applied to the authentication
//! endpoints only. Each source address gets `max_requests` per `window`;
//! once over the cap, requests from that address are rejected with 429
//! until the window rolls over.
//!
//! Counters live behind a single mutex, so increment-and-check is atomic
//! with respect to concurrent requests from the same address.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Rate limiting configuration for the auth endpoints.
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum requests per address within the window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 20,
            window: Duration::from_secs(15 * 60),
        }
    }
}

struct Window {
    started: Instant,
    count: u32,
}

/// Per-address fixed-window counter store.
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request from `addr` and return whether it is allowed.
    pub fn check(&self, addr: IpAddr) -> bool {
        self.check_at(addr, Instant::now())
    }

    // Clock-injected variant so window rollover is testable without sleeping.
    fn check_at(&self, addr: IpAddr, now: Instant) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Sweep fully aged-out windows before tracking a new address, so
        // the map stays bounded by the set of addresses seen within one
        // window rather than growing per distinct client forever
        // (X-Forwarded-For lets a client mint arbitrary addresses).
        if !windows.contains_key(&addr) {
            let window_len = self.config.window;
            windows.retain(|_, w| now.duration_since(w.started) < window_len);
        }

        let window = windows.entry(addr).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.count = 0;
        }

        window.count += 1;
        window.count <= self.config.max_requests
    }
}

/// Middleware guarding `/api/auth/*`.
///
/// Runs before credential verification; an over-limit address is rejected
/// without touching any later stage.
pub async fn limit_auth_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(addr) = client_addr(&request) {
        if !state.auth_limiter.check(addr) {
            return Err(AppError::RateLimited);
        }
    }

    Ok(next.run(request).await)
}

/// Originating address: the first `X-Forwarded-For` entry when present
/// (the server normally sits behind a proxy), else the socket peer.
fn client_addr(request: &Request) -> Option<IpAddr> {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    forwarded.or_else(|| {
        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[test]
    fn test_allows_up_to_max() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 20,
            window: Duration::from_secs(900),
        });

        for _ in 0..20 {
            assert!(limiter.check(addr(1)));
        }
        // 21st request from the same address is rejected
        assert!(!limiter.check(addr(1)));
        // a different address is unaffected
        assert!(limiter.check(addr(2)));
    }

    #[test]
    fn test_window_rollover_resets_count() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(900),
        });

        let start = Instant::now();
        assert!(limiter.check_at(addr(1), start));
        assert!(limiter.check_at(addr(1), start));
        assert!(!limiter.check_at(addr(1), start));

        // once the window has aged out, the address starts fresh
        let later = start + Duration::from_secs(901);
        assert!(limiter.check_at(addr(1), later));
        assert!(limiter.check_at(addr(1), later));
        assert!(!limiter.check_at(addr(1), later));
    }

    #[test]
    fn test_stale_addresses_evicted() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 20,
            window: Duration::from_secs(900),
        });

        let start = Instant::now();
        for last in 1..=50 {
            assert!(limiter.check_at(addr(last), start));
        }
        assert_eq!(limiter.windows.lock().unwrap().len(), 50);

        // a new address after the window has aged out sweeps the old ones
        let later = start + Duration::from_secs(901);
        assert!(limiter.check_at(addr(51), later));
        assert_eq!(limiter.windows.lock().unwrap().len(), 1);

        // addresses still inside their window are kept
        let fresh = later + Duration::from_secs(10);
        assert!(limiter.check_at(addr(52), fresh));
        assert_eq!(limiter.windows.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_rejections_do_not_extend_window() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        });

        let start = Instant::now();
        assert!(limiter.check_at(addr(1), start));
        // hammering inside the window keeps getting rejected
        for i in 1..10 {
            assert!(!limiter.check_at(addr(1), start + Duration::from_secs(i)));
        }
        // the window is anchored at the first request, not the last rejection
        assert!(limiter.check_at(addr(1), start + Duration::from_secs(61)));
    }
}
