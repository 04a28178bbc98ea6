//! In-memory cache for one access token.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};

/// Tokens this close to expiry are treated as already expired.
pub const DEFAULT_REFRESH_SKEW_SECS: i64 = 300;

struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

/// Holds at most one token; storing replaces the previous one.
pub struct TokenCache {
    slot: Option<CachedToken>,
    refresh_skew: Duration,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("token", &self.slot.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at())
            .finish()
    }
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_refresh_skew(Duration::seconds(DEFAULT_REFRESH_SKEW_SECS))
    }

    pub fn with_refresh_skew(refresh_skew: Duration) -> Self {
        Self {
            slot: None,
            refresh_skew,
        }
    }

    pub fn store(&mut self, token: impl Into<String>, expires_at: DateTime<Utc>) {
        tracing::debug!(%expires_at, "caching access token");
        self.slot = Some(CachedToken {
            token: SecretString::from(token.into()),
            expires_at,
        });
    }

    /// The cached token, unless it expires within the refresh skew of `now`.
    pub fn get(&self, now: DateTime<Utc>) -> Option<&str> {
        let cached = self.slot.as_ref()?;
        if now + self.refresh_skew >= cached.expires_at {
            return None;
        }
        Some(cached.token.expose_secret())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.slot.as_ref().map(|cached| cached.expires_at)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_empty_cache() {
        assert!(TokenCache::new().get(at(0)).is_none());
    }

    #[test]
    fn test_fresh_token_is_returned() {
        let mut cache = TokenCache::new();
        cache.store("token-a", at(3600));
        assert_eq!(cache.get(at(0)), Some("token-a"));
        assert_eq!(cache.expires_at(), Some(at(3600)));
    }

    #[test]
    fn test_refresh_skew() {
        let mut cache = TokenCache::new();
        cache.store("token-a", at(3600));
        assert!(cache.get(at(3299)).is_some());
        assert!(cache.get(at(3300)).is_none());
        assert!(cache.get(at(4000)).is_none());
    }

    #[test]
    fn test_store_replaces_and_clear_empties() {
        let mut cache = TokenCache::with_refresh_skew(Duration::zero());
        cache.store("token-a", at(100));
        cache.store("token-b", at(200));
        assert_eq!(cache.get(at(150)), Some("token-b"));
        cache.clear();
        assert!(cache.get(at(0)).is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut cache = TokenCache::new();
        cache.store("super-secret-token", at(3600));
        let debug = format!("{:?}", cache);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("REDACTED"));
    }
}
