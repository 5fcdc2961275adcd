//! Server-side token revocation
//!
//! Tokens are stateless by default; this store exists purely to give logout
//! an observable effect before a token's natural expiry. Revocation is a veto
//! layered in front of stateless verification, not a replacement for it.
//!
//! The store is process-local and not persisted: a restart un-revokes
//! everything. Acceptable for a single-instance deployment only; a
//! multi-instance deployment would need a shared backing store.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent set of revoked tokens with per-entry garbage-collection horizons
///
/// The map is never exposed directly. `DashMap`'s sharded locking gives
/// multiple-readers/single-writer semantics per shard: a `revoke` that
/// completes before an `is_revoked` call begins is always observed.
#[derive(Clone, Default)]
pub struct RevocationStore {
    revoked: Arc<DashMap<String, DateTime<Utc>>>,
}

impl RevocationStore {
    /// Create an empty revocation store
    pub fn new() -> Self {
        Self {
            revoked: Arc::new(DashMap::new()),
        }
    }

    /// Mark a token as revoked until the given horizon
    ///
    /// The horizon only bounds how long the entry is kept; set it to the
    /// token's natural expiry. Revoking the same token again is a no-op and
    /// keeps the original horizon.
    pub fn revoke(&self, token: impl Into<String>, horizon: DateTime<Utc>) {
        self.revoked.entry(token.into()).or_insert(horizon);
    }

    /// Check whether a token has been revoked
    pub fn is_revoked(&self, token: &str) -> bool {
        self.revoked.contains_key(token)
    }

    /// Drop entries whose horizon has passed, returning how many were removed
    ///
    /// Purging is an optimization for bounded memory, never a correctness
    /// requirement: an entry that outlives its token is harmless because the
    /// token fails expiry verification anyway.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.revoked.len();
        self.revoked.retain(|_, horizon| *horizon > now);
        before - self.revoked.len()
    }

    /// Number of tracked revocations
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    /// Whether the store tracks no revocations
    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn horizon() -> DateTime<Utc> {
        Utc::now() + Duration::hours(24)
    }

    #[test]
    fn test_revoke_and_lookup() {
        let store = RevocationStore::new();

        assert!(!store.is_revoked("token_a"));

        store.revoke("token_a", horizon());

        assert!(store.is_revoked("token_a"));
        assert!(!store.is_revoked("token_b"));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let store = RevocationStore::new();

        store.revoke("token_a", horizon());
        store.revoke("token_a", horizon());
        store.revoke("token_a", horizon());

        assert!(store.is_revoked("token_a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_purge_expired_drops_only_past_horizons() {
        let store = RevocationStore::new();
        let now = Utc::now();

        store.revoke("stale", now - Duration::hours(1));
        store.revoke("live", now + Duration::hours(1));

        let removed = store.purge_expired(now);

        assert_eq!(removed, 1);
        assert!(!store.is_revoked("stale"));
        assert!(store.is_revoked("live"));
    }

    #[test]
    fn test_purge_empty_store() {
        let store = RevocationStore::new();

        assert_eq!(store.purge_expired(Utc::now()), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let store = RevocationStore::new();
        let alias = store.clone();

        alias.revoke("token_a", horizon());

        assert!(store.is_revoked("token_a"));
    }

    #[test]
    fn test_concurrent_revocations_no_lost_updates() {
        let store = RevocationStore::new();
        let until = horizon();

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        store.revoke(format!("token_{}_{}", i, j), until);
                    }
                })
            })
            .collect();
        for handle in writers {
            handle.join().unwrap();
        }

        let readers: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50).all(|j| store.is_revoked(&format!("token_{}_{}", i, j)))
                })
            })
            .collect();
        for handle in readers {
            assert!(handle.join().unwrap());
        }

        assert_eq!(store.len(), 8 * 50);
    }

    #[test]
    fn test_concurrent_revoke_and_lookup_same_token() {
        let store = RevocationStore::new();
        let until = horizon();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store.revoke("shared", until);
                    store.is_revoked("shared")
                })
            })
            .collect();

        // Every thread observes its own completed revoke
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(store.len(), 1);
    }
}
