//! In-memory list of tokens invalidated before their natural expiry.
//!
//! Entries only need to live until the token would have expired anyway, so
//! the list prunes itself once it grows past a high-water mark. Revocations
//! do not survive a restart; the token TTL bounds that exposure.

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use chrono::Utc;
use dashmap::DashMap;

/// Concurrent set of revoked tokens keyed by the raw token string.
#[derive(Debug)]
pub struct RevocationList {
    /// token -> expiry (Unix timestamp)
    entries: DashMap<String, i64>,
    high_water_mark: usize,
    /// Size that triggers the next automatic sweep. Doubles past what a sweep
    /// leaves behind, so a list of live tokens is not rescanned on every insert.
    next_sweep_at: AtomicUsize,
}

impl RevocationList {
    pub const DEFAULT_HIGH_WATER_MARK: usize = 1000;

    pub fn new() -> Self {
        Self::with_high_water_mark(Self::DEFAULT_HIGH_WATER_MARK)
    }

    /// Create a list that sweeps expired entries once it holds more than
    /// `high_water_mark` tokens.
    pub fn with_high_water_mark(high_water_mark: usize) -> Self {
        Self {
            entries: DashMap::new(),
            high_water_mark,
            next_sweep_at: AtomicUsize::new(high_water_mark),
        }
    }

    /// Revoke a token. Revoking the same token twice is a no-op.
    ///
    /// # Arguments
    /// * `token` - Raw token string
    /// * `expires_at` - Token's own `exp` claim
    pub fn revoke(&self, token: &str, expires_at: i64) {
        self.entries.insert(token.to_string(), expires_at);

        if self.entries.len() > self.next_sweep_at.load(Ordering::Relaxed) {
            let removed = self.purge_expired_at(Utc::now().timestamp());
            tracing::debug!(
                removed,
                remaining = self.entries.len(),
                "Revocation list crossed high-water mark"
            );
        }
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.entries.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose token has already expired.
    ///
    /// # Returns
    /// Number of entries removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now().timestamp())
    }

    pub fn purge_expired_at(&self, now: i64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, expires_at| *expires_at >= now);

        let remaining = self.entries.len();
        self.next_sweep_at.store(
            self.high_water_mark.max(remaining.saturating_mul(2)),
            Ordering::Relaxed,
        );
        before.saturating_sub(remaining)
    }
}

impl Default for RevocationList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_is_idempotent() {
        let list = RevocationList::new();
        let exp = Utc::now().timestamp() + 3600;

        list.revoke("token-a", exp);
        list.revoke("token-a", exp);

        assert!(list.is_revoked("token-a"));
        assert!(!list.is_revoked("token-b"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_purge_removes_only_expired() {
        let list = RevocationList::new();

        list.revoke("expired", 100);
        list.revoke("live", 300);

        assert_eq!(list.purge_expired_at(200), 1);
        assert!(!list.is_revoked("expired"));
        assert!(list.is_revoked("live"));
    }

    #[test]
    fn test_high_water_mark_triggers_sweep() {
        let list = RevocationList::with_high_water_mark(3);
        let future = Utc::now().timestamp() + 3600;

        list.revoke("old-1", 10);
        list.revoke("old-2", 10);
        list.revoke("live-1", future);
        assert_eq!(list.len(), 3);

        // Fourth insert crosses the mark and drops the two expired tokens
        list.revoke("live-2", future);

        assert_eq!(list.len(), 2);
        assert!(list.is_revoked("live-1"));
        assert!(list.is_revoked("live-2"));
    }

    #[test]
    fn test_live_entries_survive_sweep_over_mark() {
        let list = RevocationList::with_high_water_mark(1);
        let future = Utc::now().timestamp() + 3600;

        list.revoke("a", future);
        list.revoke("b", future);

        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_sweeps_are_spaced_out_when_entries_are_live() {
        let list = RevocationList::with_high_water_mark(2);
        let future = Utc::now().timestamp() + 3600;

        list.revoke("a", future);
        list.revoke("b", future);
        list.revoke("c", future);
        // Nothing expired, so the next sweep waits for the list to double
        assert_eq!(list.next_sweep_at.load(Ordering::Relaxed), 6);

        // Expired entries added below the new threshold are not swept yet
        list.revoke("old-1", 10);
        list.revoke("old-2", 10);
        list.revoke("old-3", 10);
        assert_eq!(list.len(), 6);

        list.revoke("d", future);
        assert_eq!(list.len(), 4);
        assert_eq!(list.next_sweep_at.load(Ordering::Relaxed), 8);
    }
}
