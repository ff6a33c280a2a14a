//! Per-identifier login throttling.
//!
//! Each identifier (normally the client IP) gets its own window, so one
//! abusive client cannot lock out the others. The window starts at the first
//! failure and the count resets once it elapses or a login succeeds.

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use dashmap::DashMap;

/// Failed attempts recorded for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginAttemptRecord {
    pub count: u32,
    pub window_reset_at: DateTime<Utc>,
}

/// Fixed-window failed-login counter.
#[derive(Debug)]
pub struct LoginThrottle {
    attempts: DashMap<String, LoginAttemptRecord>,
    max_attempts: u32,
    window: Duration,
}

impl LoginThrottle {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
    pub const DEFAULT_WINDOW_MINUTES: i64 = 15;

    pub fn new() -> Self {
        Self::with_limits(
            Self::DEFAULT_MAX_ATTEMPTS,
            Duration::minutes(Self::DEFAULT_WINDOW_MINUTES),
        )
    }

    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            attempts: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// True iff the identifier has used up its failures in the current window.
    pub fn is_limited(&self, identifier: &str) -> bool {
        self.is_limited_at(identifier, Utc::now())
    }

    pub fn is_limited_at(&self, identifier: &str, now: DateTime<Utc>) -> bool {
        self.attempts.get(identifier).map_or(false, |record| {
            now <= record.window_reset_at && record.count >= self.max_attempts
        })
    }

    /// Record a login outcome.
    ///
    /// A failure increments the count, opening a new window if none is
    /// active. A success clears the identifier.
    pub fn record_attempt(&self, identifier: &str, success: bool) {
        self.record_attempt_at(identifier, success, Utc::now());
    }

    pub fn record_attempt_at(&self, identifier: &str, success: bool, now: DateTime<Utc>) {
        if success {
            self.attempts.remove(identifier);
            return;
        }

        let fresh = LoginAttemptRecord {
            count: 1,
            window_reset_at: now + self.window,
        };
        self.attempts
            .entry(identifier.to_string())
            .and_modify(|record| {
                if now > record.window_reset_at {
                    *record = fresh;
                } else {
                    record.count = record.count.saturating_add(1);
                }
            })
            .or_insert(fresh);
    }

    /// Reserve a credential check for the identifier.
    ///
    /// The attempt is counted as a failure up front, inside the map entry, so
    /// concurrent callers cannot all slip past the limit while earlier checks
    /// are still running. A later `record_attempt(id, true)` clears it.
    ///
    /// # Errors
    /// Time until the window resets when the identifier is already limited
    pub fn try_begin_attempt(&self, identifier: &str) -> Result<(), Duration> {
        self.try_begin_attempt_at(identifier, Utc::now())
    }

    pub fn try_begin_attempt_at(
        &self,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> Result<(), Duration> {
        let mut record = self
            .attempts
            .entry(identifier.to_string())
            .or_insert(LoginAttemptRecord {
                count: 0,
                window_reset_at: now + self.window,
            });

        if now > record.window_reset_at {
            record.count = 0;
            record.window_reset_at = now + self.window;
        }

        if record.count >= self.max_attempts {
            return Err(record.window_reset_at - now);
        }

        record.count += 1;
        Ok(())
    }

    /// Failures counted in the identifier's active window.
    pub fn attempts(&self, identifier: &str) -> u32 {
        self.attempts_at(identifier, Utc::now())
    }

    pub fn attempts_at(&self, identifier: &str, now: DateTime<Utc>) -> u32 {
        self.attempts
            .get(identifier)
            .filter(|record| now <= record.window_reset_at)
            .map_or(0, |record| record.count)
    }

    /// Time until a limited identifier may try again.
    ///
    /// # Returns
    /// `None` when the identifier is not limited
    pub fn retry_after(&self, identifier: &str) -> Option<Duration> {
        self.retry_after_at(identifier, Utc::now())
    }

    pub fn retry_after_at(&self, identifier: &str, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_limited_at(identifier, now) {
            return None;
        }
        self.attempts
            .get(identifier)
            .map(|record| record.window_reset_at - now)
    }

    /// Delete records whose window has elapsed.
    ///
    /// # Returns
    /// Number of records removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.attempts.len();
        self.attempts.retain(|_, record| now <= record.window_reset_at);
        before.saturating_sub(self.attempts.len())
    }

    pub fn tracked_identifiers(&self) -> usize {
        self.attempts.len()
    }
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP: &str = "203.0.113.7";

    #[test]
    fn test_limited_after_max_failures() {
        let throttle = LoginThrottle::new();
        let now = Utc::now();

        for _ in 0..4 {
            throttle.record_attempt_at(IP, false, now);
        }
        assert!(!throttle.is_limited_at(IP, now));

        throttle.record_attempt_at(IP, false, now);
        assert!(throttle.is_limited_at(IP, now));
        assert_eq!(throttle.attempts_at(IP, now), 5);
    }

    #[test]
    fn test_success_resets_count() {
        let throttle = LoginThrottle::new();
        let now = Utc::now();

        for _ in 0..5 {
            throttle.record_attempt_at(IP, false, now);
        }
        assert!(throttle.is_limited_at(IP, now));

        throttle.record_attempt_at(IP, true, now);

        assert!(!throttle.is_limited_at(IP, now));
        assert_eq!(throttle.attempts_at(IP, now), 0);
    }

    #[test]
    fn test_window_elapse_lifts_limit() {
        let throttle = LoginThrottle::new();
        let start = Utc::now();

        for _ in 0..5 {
            throttle.record_attempt_at(IP, false, start);
        }

        let later = start + Duration::minutes(16);
        assert!(!throttle.is_limited_at(IP, later));
        assert_eq!(throttle.attempts_at(IP, later), 0);

        // A new failure after the window opens a fresh one
        throttle.record_attempt_at(IP, false, later);
        assert_eq!(throttle.attempts_at(IP, later), 1);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let throttle = LoginThrottle::new();
        let now = Utc::now();

        for _ in 0..5 {
            throttle.record_attempt_at(IP, false, now);
        }

        assert!(throttle.is_limited_at(IP, now));
        assert!(!throttle.is_limited_at("198.51.100.1", now));
    }

    #[test]
    fn test_retry_after_counts_down_window() {
        let throttle = LoginThrottle::new();
        let start = Utc::now();

        assert!(throttle.retry_after_at(IP, start).is_none());

        for _ in 0..5 {
            throttle.record_attempt_at(IP, false, start);
        }

        let retry = throttle
            .retry_after_at(IP, start + Duration::minutes(5))
            .expect("limited identifier has a retry hint");
        assert_eq!(retry, Duration::minutes(10));
    }

    #[test]
    fn test_reservation_counts_before_the_check_finishes() {
        let throttle = LoginThrottle::new();
        let now = Utc::now();

        for _ in 0..5 {
            assert!(throttle.try_begin_attempt_at(IP, now).is_ok());
        }

        let retry = throttle.try_begin_attempt_at(IP, now).unwrap_err();
        assert_eq!(retry, Duration::minutes(15));
        assert!(throttle.is_limited_at(IP, now));

        // A successful check releases the identifier
        throttle.record_attempt_at(IP, true, now);
        assert!(throttle.try_begin_attempt_at(IP, now).is_ok());
        assert_eq!(throttle.attempts_at(IP, now), 1);
    }

    #[test]
    fn test_reservation_opens_fresh_window_after_expiry() {
        let throttle = LoginThrottle::new();
        let start = Utc::now();

        for _ in 0..5 {
            throttle.record_attempt_at(IP, false, start);
        }

        let later = start + Duration::minutes(16);
        assert!(throttle.try_begin_attempt_at(IP, later).is_ok());
        assert_eq!(throttle.attempts_at(IP, later), 1);
    }

    #[test]
    fn test_concurrent_reservations_never_exceed_limit() {
        let throttle = std::sync::Arc::new(LoginThrottle::new());

        let handles: Vec<_> = (0..30)
            .map(|_| {
                let throttle = std::sync::Arc::clone(&throttle);
                std::thread::spawn(move || throttle.try_begin_attempt(IP).is_ok())
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|admitted| *admitted)
            .count();

        assert_eq!(admitted, 5);
    }

    #[test]
    fn test_purge_expired_drops_elapsed_windows() {
        let throttle = LoginThrottle::new();
        let start = Utc::now();

        throttle.record_attempt_at("old", false, start);
        throttle.record_attempt_at("recent", false, start + Duration::minutes(10));

        let removed = throttle.purge_expired_at(start + Duration::minutes(20));

        assert_eq!(removed, 1);
        assert_eq!(throttle.tracked_identifiers(), 1);
        assert_eq!(
            throttle.attempts_at("recent", start + Duration::minutes(20)),
            1
        );
    }
}
