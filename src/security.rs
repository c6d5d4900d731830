use crate::sync::lock;
use regex::Regex;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing CSRF tokens and other sensitive values
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Clean a user-supplied form field.
///
/// Strips markup tags and control characters (newlines and tabs are kept),
/// trims surrounding whitespace, and truncates to `max_len` characters.
pub fn sanitize_input(raw: &str, max_len: usize) -> String {
    let regex = MARKUP_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());

    let stripped = regex.replace_all(raw, "");
    let cleaned: String = stripped
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    cleaned.trim().chars().take(max_len).collect()
}

/// Client count above which idle histories are swept on the next check.
const SWEEP_THRESHOLD: usize = 1024;

/// Sliding-window attempt limiter keyed by client.
///
/// Only attempts within the most recent `window` count against the limit.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    attempts: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt for `client_key`.
    ///
    /// # Returns
    /// `true` if the attempt is allowed, `false` if the client is over
    /// its limit (rejected attempts are not recorded).
    pub fn check(&self, client_key: &str) -> bool {
        self.check_at(client_key, Instant::now())
    }

    pub fn check_at(&self, client_key: &str, now: Instant) -> bool {
        let mut attempts = lock(&self.attempts);

        // Evict clients whose newest attempt has left the window so the
        // map stays bounded by recently active clients.
        if attempts.len() > SWEEP_THRESHOLD {
            let before = attempts.len();
            attempts.retain(|_, history| {
                history
                    .back()
                    .is_some_and(|last| now.saturating_duration_since(*last) < self.window)
            });
            debug!(
                "Rate limiter evicted {} idle clients",
                before - attempts.len()
            );
        }

        let history = attempts.entry(client_key.to_string()).or_default();

        while let Some(oldest) = history.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                history.pop_front();
            } else {
                break;
            }
        }

        if history.len() >= self.max_attempts {
            warn!("Rate limit exceeded for client '{}'", client_key);
            return false;
        }

        history.push_back(now);
        true
    }

    /// Forget all attempts by `client_key`.
    pub fn reset(&self, client_key: &str) {
        lock(&self.attempts).remove(client_key);
    }

    /// Number of clients with a recorded attempt history.
    pub fn tracked_clients(&self) -> usize {
        lock(&self.attempts).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret123", "secret123"));
        assert!(!constant_time_compare("secret123", "secret124"));
        assert!(!constant_time_compare("secret123", "secret12"));
        assert!(!constant_time_compare("", "secret"));
    }

    // ==================== sanitize_input Tests ====================

    #[test]
    fn test_sanitize_strips_markup() {
        assert_eq!(
            sanitize_input("<script>alert(1)</script>Hello <b>there</b>", 100),
            "alert(1)Hello there"
        );
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_input("  a\u{0}b\u{7}c\nd\te  ", 100), "abc\nd\te");
    }

    #[test]
    fn test_sanitize_truncates_by_characters() {
        assert_eq!(sanitize_input("héllo wörld", 5), "héllo");
        assert_eq!(sanitize_input("", 5), "");
    }

    // ==================== RateLimiter Tests ====================

    #[test]
    fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at("1.2.3.4", now));
        assert!(limiter.check_at("1.2.3.4", now));
        assert!(!limiter.check_at("1.2.3.4", now));
        assert!(limiter.check_at("5.6.7.8", now));
    }

    #[test]
    fn test_rate_limiter_window_slides() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("client", start));
        assert!(limiter.check_at("client", start + Duration::from_secs(30)));
        assert!(!limiter.check_at("client", start + Duration::from_secs(59)));
        assert!(limiter.check_at("client", start + Duration::from_secs(60)));
        assert!(!limiter.check_at("client", start + Duration::from_secs(61)));
    }

    #[test]
    fn test_rate_limiter_evicts_idle_clients() {
        let limiter = RateLimiter::new(5, Duration::from_secs(1));
        let start = Instant::now();

        for i in 0..10_000 {
            assert!(limiter.check_at(&format!("10.0.{}.{}", i / 256, i % 256), start));
        }
        assert_eq!(limiter.tracked_clients(), 10_000);

        assert!(limiter.check_at("late", start + Duration::from_secs(3600)));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_rate_limiter_sweep_keeps_active_clients() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        for i in 0..2_000 {
            assert!(limiter.check_at(&format!("client-{}", i), start));
        }

        let later = start + Duration::from_secs(30);
        assert!(!limiter.check_at("client-7", later));
        assert_eq!(limiter.tracked_clients(), 2_000);
    }

    #[test]
    fn test_rate_limiter_reset() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("client"));
        assert!(!limiter.check("client"));

        limiter.reset("client");
        assert!(limiter.check("client"));
    }
}
