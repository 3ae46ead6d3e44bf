//! Fixed-window request limiter for guest batch submissions.
//!
//! Counters are keyed by session id and reset when their window lapses.
//! State lives in this process only; a clustered deployment needs an
//! external store.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const GUEST_BATCH_LIMIT: u32 = 3;
pub const GUEST_WINDOW: Duration = Duration::from_secs(60 * 60);

struct Window {
    started_at: Instant,
    count: u32,
}

pub struct GuestLimiter {
    max_per_window: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl GuestLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request against `key`. Returns false when the key has
    /// exhausted its allowance for the current window.
    pub fn try_acquire(&self, key: &str) -> bool {
        let mut windows = self.windows.lock();
        let now = Instant::now();
        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.max_per_window {
            return false;
        }
        window.count += 1;
        true
    }
}

impl Default for GuestLimiter {
    fn default() -> Self {
        Self::new(GUEST_BATCH_LIMIT, GUEST_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = GuestLimiter::new(3, Duration::from_secs(3600));
        assert!(limiter.try_acquire("s1"));
        assert!(limiter.try_acquire("s1"));
        assert!(limiter.try_acquire("s1"));
        assert!(!limiter.try_acquire("s1"));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = GuestLimiter::new(1, Duration::from_secs(3600));
        assert!(limiter.try_acquire("a"));
        assert!(!limiter.try_acquire("a"));
        assert!(limiter.try_acquire("b"));
    }

    #[test]
    fn test_window_lapses_and_resets() {
        let limiter = GuestLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.try_acquire("s1"));
        assert!(!limiter.try_acquire("s1"));
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.try_acquire("s1"));
    }
}
