//! Access-token cache
//!
//! Tokens are held in memory only, one slot per cache key
//! (`client_email:project_id:location`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Seconds before expiry at which a cached token stops being served
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// An access token issued by the token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    /// Unix timestamp (seconds) at which the token expires
    pub expires_at: i64,
    pub cache_key: String,
}

impl CachedToken {
    pub fn new(cache_key: impl Into<String>, token: impl Into<String>, expires_at: i64) -> Self {
        Self {
            token: token.into(),
            expires_at,
            cache_key: cache_key.into(),
        }
    }

    /// Check if the token is still usable at `now`, honoring the refresh margin
    pub fn is_fresh(&self, now: i64) -> bool {
        self.expires_at - REFRESH_MARGIN_SECS > now
    }
}

/// Injectable token cache with per-key acquisition locks.
#[derive(Debug, Default)]
pub struct TokenCache {
    slots: Mutex<HashMap<String, CachedToken>>,
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by the default gateway.
    pub fn global() -> Arc<TokenCache> {
        static GLOBAL: OnceLock<Arc<TokenCache>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(TokenCache::new())).clone()
    }

    /// Returns the cached token for `cache_key` if it is still fresh at `now`.
    pub fn get(&self, cache_key: &str, now: i64) -> Option<String> {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots
            .get(cache_key)
            .filter(|t| t.is_fresh(now))
            .map(|t| t.token.clone())
    }

    /// Stores a token, replacing whatever the slot held.
    pub fn insert(&self, token: CachedToken) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.insert(token.cache_key.clone(), token);
    }

    pub fn invalidate(&self, cache_key: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.remove(cache_key);
    }

    /// Lock serializing token acquisition for `cache_key`.
    pub(crate) fn acquisition_lock(&self, cache_key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight
            .entry(cache_key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_fresh_outside_margin() {
        let token = CachedToken::new("k", "t", 1_000);
        assert!(token.is_fresh(939));
        assert!(!token.is_fresh(940));
        assert!(!token.is_fresh(2_000));
    }

    #[test]
    fn test_cache_get_respects_expiry() {
        let cache = TokenCache::new();
        cache.insert(CachedToken::new("a:p:l", "tok-1", 3_600));

        assert_eq!(cache.get("a:p:l", 0).as_deref(), Some("tok-1"));
        assert_eq!(cache.get("a:p:l", 3_540), None);
        assert_eq!(cache.get("other:p:l", 0), None);
    }

    #[test]
    fn test_cache_keys_are_independent() {
        let cache = TokenCache::new();
        cache.insert(CachedToken::new("a:p:us-central1", "tok-a", 10_000));
        cache.insert(CachedToken::new("a:p:europe-west4", "tok-b", 10_000));

        assert_eq!(cache.get("a:p:us-central1", 0).as_deref(), Some("tok-a"));
        cache.invalidate("a:p:us-central1");
        assert_eq!(cache.get("a:p:us-central1", 0), None);
        assert_eq!(cache.get("a:p:europe-west4", 0).as_deref(), Some("tok-b"));
    }

    #[test]
    fn test_insert_overwrites_slot() {
        let cache = TokenCache::new();
        cache.insert(CachedToken::new("k", "old", 10_000));
        cache.insert(CachedToken::new("k", "new", 10_000));
        assert_eq!(cache.get("k", 0).as_deref(), Some("new"));
    }

    #[test]
    fn test_acquisition_lock_shared_per_key() {
        let cache = TokenCache::new();
        let a = cache.acquisition_lock("k");
        let b = cache.acquisition_lock("k");
        let c = cache.acquisition_lock("other");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
