//! In-process fixed-window rate limiter.
//!
//! Counts requests per client key inside a window that starts with the
//! client's first request. State lives in a single mutex-guarded map; once it
//! holds [`SWEEP_THRESHOLD`] entries, expired windows are swept at most once
//! per window length.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;

/// Map size that triggers a sweep of expired windows
const SWEEP_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u64,
}

/// Outcome of a single rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Requests counted in the current window, this one included
    pub count: u64,
    pub allowed: bool,
    /// Time until the current window closes
    pub reset_after: Duration,
}

#[derive(Debug)]
struct Windows {
    clients: HashMap<String, Window>,
    last_sweep: Instant,
}

/// Fixed-window counter keyed by client identifier
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u64,
    window: Duration,
    windows: Mutex<Windows>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.requests,
            window: Duration::from_secs(config.window_seconds),
            windows: Mutex::new(Windows {
                clients: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Requests allowed per window.
    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    /// Count a request from `key` and decide whether it may proceed.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let window = self.window;

        if windows.clients.len() >= SWEEP_THRESHOLD
            && now.saturating_duration_since(windows.last_sweep) >= window
        {
            windows
                .clients
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
            windows.last_sweep = now;
        }

        let entry = windows.clients.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(entry.started) >= window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        entry.count = entry.count.saturating_add(1);
        let elapsed = now.saturating_duration_since(entry.started);

        RateLimitDecision {
            count: entry.count,
            allowed: entry.count <= self.max_requests,
            reset_after: window.saturating_sub(elapsed),
        }
    }
}
