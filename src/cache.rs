//! TTL-bound cache of decoded response bodies, keyed by request URL.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use dashmap::DashMap;
use serde_json::Value;

/// Expiry interval between opportunistic sweeps of expired entries.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// When entries become stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Every entry lives for a fixed duration from insertion.
    FixedTtl(Duration),
    /// Entries live until the next 00:05 UTC, when the service
    /// republishes its daily rates.
    DailyRefresh,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        ExpiryPolicy::DailyRefresh
    }
}

impl ExpiryPolicy {
    fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ExpiryPolicy::FixedTtl(ttl) => TimeDelta::from_std(*ttl)
                .ok()
                .and_then(|ttl| now.checked_add_signed(ttl))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ExpiryPolicy::DailyRefresh => next_daily_refresh(now),
        }
    }
}

/// First 00:05 UTC instant strictly after `now`.
fn next_daily_refresh(now: DateTime<Utc>) -> DateTime<Utc> {
    let refresh_today = now
        .with_hour(0)
        .and_then(|t| t.with_minute(5))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    if refresh_today > now {
        refresh_today
    } else {
        refresh_today + TimeDelta::days(1)
    }
}

struct CacheEntry {
    value: Arc<Value>,
    expires_at: DateTime<Utc>,
}

/// Concurrent TTL store mapping a fully serialized request URL to the
/// decoded JSON body it produced. Expired entries behave as missing on
/// lookup; a sweep runs opportunistically on insert, at most once per
/// five minutes.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    policy: ExpiryPolicy,
    last_sweep: Mutex<Instant>,
}

impl ResponseCache {
    /// Create a cache with the given expiry policy.
    pub fn new(policy: ExpiryPolicy) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Look up a response by request URL. Expired entries are removed
    /// and reported as missing.
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        let now = Utc::now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Insert or overwrite a response. The entry's expiry is computed
    /// from the cache's policy at insertion time.
    pub fn put(&self, key: String, value: Arc<Value>) {
        self.maybe_sweep();
        let entry = CacheEntry {
            value,
            expires_at: self.policy.expires_at(Utc::now()),
        };
        self.entries.insert(key, entry);
    }

    /// Remove every expired entry.
    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of live entries, expired stragglers included until the
    /// next sweep observes them.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn maybe_sweep(&self) {
        let mut last_sweep = match self.last_sweep.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if last_sweep.elapsed() >= SWEEP_INTERVAL {
            *last_sweep = Instant::now();
            drop(last_sweep);
            self.purge_expired();
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(ExpiryPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn body(tag: &str) -> Arc<Value> {
        Arc::new(serde_json::json!({ "success": true, "tag": tag }))
    }

    #[test]
    fn get_returns_what_put_stored() {
        let cache = ResponseCache::default();
        cache.put("https://example/latest?base=USD".to_string(), body("a"));

        let hit = cache.get("https://example/latest?base=USD").unwrap();
        assert_eq!(hit["tag"], "a");
    }

    #[test]
    fn miss_on_unknown_key() {
        let cache = ResponseCache::default();
        assert!(cache.get("https://example/latest").is_none());
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let cache = ResponseCache::default();
        cache.put("k".to_string(), body("old"));
        cache.put("k".to_string(), body("new"));

        assert_eq!(cache.get("k").unwrap()["tag"], "new");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn expired_entry_is_reported_missing_and_removed() {
        let cache = ResponseCache::new(ExpiryPolicy::FixedTtl(Duration::ZERO));
        cache.put("k".to_string(), body("stale"));

        assert!(cache.get("k").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_removes_only_expired_entries() {
        let cache = ResponseCache::new(ExpiryPolicy::FixedTtl(Duration::ZERO));
        cache.put("stale".to_string(), body("stale"));
        let fresh = ResponseCache::new(ExpiryPolicy::FixedTtl(Duration::from_secs(3600)));
        fresh.put("fresh".to_string(), body("fresh"));

        cache.purge_expired();
        fresh.purge_expired();

        assert!(cache.is_empty());
        assert_eq!(fresh.len(), 1);
    }

    #[test]
    fn daily_refresh_rolls_to_next_day_after_cutoff() {
        let before = Utc.with_ymd_and_hms(2024, 3, 10, 0, 4, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 10, 0, 5, 0).unwrap();

        assert_eq!(
            next_daily_refresh(before),
            Utc.with_ymd_and_hms(2024, 3, 10, 0, 5, 0).unwrap()
        );
        assert_eq!(
            next_daily_refresh(after),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 5, 0).unwrap()
        );
    }

    #[test]
    fn daily_refresh_midday_expires_next_midnight() {
        let noon = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            ExpiryPolicy::DailyRefresh.expires_at(noon),
            Utc.with_ymd_and_hms(2024, 3, 11, 0, 5, 0).unwrap()
        );
    }
}
