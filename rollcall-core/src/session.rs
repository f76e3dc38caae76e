//! Time-expiring key/value cache for admin sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::model::SessionToken;

const TOKEN_KEY_PREFIX: &str = "admin_token_";

/// Default lifetime of a login.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Key/value map whose entries disappear after their TTL.
///
/// There is no delete and no background sweeper: expired entries are
/// dropped when a lookup finds them, and all of them on every `put`.
#[derive(Debug)]
pub struct SessionCache<V = SessionToken> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V> Default for SessionCache<V> {
    fn default() -> Self {
        SessionCache {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V: Clone> SessionCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry<V>>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Store `value` under `key`, dropping every entry that has already expired.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries();

        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.into(),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries();
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Number of stored entries, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionCache<SessionToken> {
    pub fn token_key(token: &str) -> String {
        format!("{TOKEN_KEY_PREFIX}{token}")
    }

    pub fn store_token(&self, token: &str, session: SessionToken, ttl: Duration) {
        self.put(Self::token_key(token), session, ttl);
    }

    /// Possession of an unexpired token is the whole authorization check.
    pub fn verify_token(&self, token: &str) -> bool {
        self.get(&Self::token_key(token)).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionToken {
        SessionToken {
            username: "admin".into(),
            issued_at_millis: 0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache: SessionCache<u32> = SessionCache::new();
        cache.put("k", 7, Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("k"), Some(7));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_swept_on_lookup() {
        let cache: SessionCache<u32> = SessionCache::new();
        cache.put("k", 1, Duration::from_secs(1));
        assert_eq!(cache.len(), 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_sweeps_entries_never_looked_up_again() {
        let cache: SessionCache<u32> = SessionCache::new();
        cache.put("old", 1, Duration::from_secs(1));
        cache.put("live", 2, Duration::from_secs(60));

        tokio::time::advance(Duration::from_secs(5)).await;
        cache.put("new", 3, Duration::from_secs(60));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("live"), Some(2));
        assert_eq!(cache.get("new"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_replaces_and_extends() {
        let cache: SessionCache<u32> = SessionCache::new();
        cache.put("k", 1, Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put("k", 2, Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_token_uses_prefixed_key() {
        let cache: SessionCache = SessionCache::new();
        cache.store_token("abc", session(), SESSION_TTL);

        assert!(cache.verify_token("abc"));
        assert!(!cache.verify_token("abd"));
        assert_eq!(cache.get("admin_token_abc"), Some(session()));
        assert_eq!(cache.get("abc"), None);
    }
}
