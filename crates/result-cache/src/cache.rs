use crate::clock::Clock;
use crate::error::CacheError;
use crate::store::CacheStore;
use core_types::CorrelationReport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// The persisted envelope: `{ "timestamp": <epoch ms>, "data": { "matrix", "sortedAssets" } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: i64,
    pub data: CorrelationReport,
}

/// A single-slot, TTL-bound cache for the latest `CorrelationReport`.
///
/// An entry is fresh while `now - timestamp` lies in `[0, ttl]`; the upper
/// bound is inclusive. Entries stamped in the future are rejected.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    key: String,
    ttl_ms: i64,
}

impl ResultCache {
    pub fn new(
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            key: key.into(),
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the cached entry if it is present, well-formed and fresh.
    ///
    /// Anything else is a miss, and an unusable payload is deleted from the store.
    pub fn get(&self) -> Option<CacheEntry> {
        let payload = match self.store.load(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Unreadable cache slot, discarding.");
                self.discard();
                return None;
            }
        };

        match self.decode(&payload) {
            Ok(entry) => {
                tracing::debug!(key = %self.key, timestamp = entry.timestamp, "Cache hit.");
                Some(entry)
            }
            Err(e) => {
                tracing::info!(key = %self.key, reason = %e, "Discarding cache entry.");
                self.discard();
                None
            }
        }
    }

    /// Stamps `report` with the current time and overwrites the slot with it.
    pub fn put(&self, report: &CorrelationReport) -> Result<CacheEntry, CacheError> {
        let entry = CacheEntry {
            timestamp: self.clock.now_ms(),
            data: report.clone(),
        };
        let payload = serde_json::to_string(&entry)?;
        self.store.save(&self.key, &payload)?;

        tracing::debug!(
            key = %self.key,
            assets = report.sorted_assets.len(),
            "Cache slot written."
        );
        Ok(entry)
    }

    /// Empties the slot.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.store.remove(&self.key)
    }

    /// True while the entry's age lies within the freshness window.
    pub fn is_fresh(&self, entry: &CacheEntry) -> bool {
        let age_ms = self.clock.now_ms().saturating_sub(entry.timestamp);
        (0..=self.ttl_ms).contains(&age_ms)
    }

    fn decode(&self, payload: &str) -> Result<CacheEntry, CacheError> {
        let entry: CacheEntry = serde_json::from_str(payload)?;

        if !entry.data.is_well_formed() {
            return Err(CacheError::Malformed(
                "ranked assets and matrix rows disagree".to_string(),
            ));
        }
        if !self.is_fresh(&entry) {
            return Err(CacheError::Stale {
                age_ms: self.clock.now_ms().saturating_sub(entry.timestamp),
            });
        }
        Ok(entry)
    }

    fn discard(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Failed to discard cache slot.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use core_types::{Asset, CorrelationCell, CorrelationMatrix};
    use rust_decimal_macros::dec;

    const KEY: &str = "hyperCorrCache_v1";
    const WEEK_MS: i64 = 604_800_000;
    const NOW: i64 = 1_700_000_000_000;

    fn report() -> CorrelationReport {
        let mut matrix = CorrelationMatrix::new();
        matrix.insert("BTC", "BTC", CorrelationCell::computed(100.0));
        matrix.insert("ETH", "ETH", CorrelationCell::computed(100.0));
        matrix.insert("BTC", "ETH", CorrelationCell::computed(83.25));
        CorrelationReport::new(
            matrix,
            vec![
                Asset::new("BTC", dec!(1000), 65000.0, 0),
                Asset::new("ETH", dec!(9000), 3100.0, 1),
            ],
        )
    }

    fn cache() -> (ResultCache, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(NOW));
        let cache = ResultCache::new(
            store.clone(),
            clock.clone(),
            KEY,
            Duration::from_millis(WEEK_MS as u64),
        );
        (cache, store, clock)
    }

    fn store_entry(store: &MemoryStore, timestamp: i64) {
        let entry = CacheEntry {
            timestamp,
            data: report(),
        };
        store
            .save(KEY, &serde_json::to_string(&entry).unwrap())
            .unwrap();
    }

    #[test]
    fn test_cache_put_get() {
        let (cache, _store, _clock) = cache();

        // Initially not cached
        assert!(cache.get().is_none());

        let written = cache.put(&report()).unwrap();
        assert_eq!(written.timestamp, NOW);

        let read = cache.get().unwrap();
        assert_eq!(read, written);
    }

    #[test]
    fn test_persisted_shape() {
        let (cache, store, _clock) = cache();
        cache.put(&report()).unwrap();

        let payload = store.load(KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(json["timestamp"], NOW);
        assert_eq!(json["data"]["sortedAssets"][0]["name"], "BTC");
        assert_eq!(json["data"]["matrix"]["BTC"]["ETH"]["corr"], 83.25);
        assert_eq!(json["data"]["matrix"]["BTC"]["ETH"]["lowData"], false);
    }

    #[test]
    fn test_entry_exactly_at_ttl_is_fresh() {
        let (cache, store, _clock) = cache();
        store_entry(&store, NOW - WEEK_MS);

        assert!(cache.get().is_some());
    }

    #[test]
    fn test_entry_one_ms_past_ttl_is_discarded() {
        let (cache, store, _clock) = cache();
        store_entry(&store, NOW - WEEK_MS - 1);

        assert!(cache.get().is_none());
        assert!(store.load(KEY).unwrap().is_none());
    }

    #[test]
    fn test_entry_expires_as_clock_advances() {
        let (cache, _store, clock) = cache();
        cache.put(&report()).unwrap();

        clock.advance(WEEK_MS);
        assert!(cache.get().is_some());

        clock.advance(1);
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_future_entry_is_discarded() {
        let (cache, store, _clock) = cache();
        store_entry(&store, NOW + 1);

        assert!(cache.get().is_none());
        assert!(store.load(KEY).unwrap().is_none());
    }

    #[test]
    fn test_malformed_payloads_are_discarded() {
        let (cache, store, _clock) = cache();

        for payload in [
            "not json at all",
            r#"{"timestamp": 1}"#,
            r#"{"data": {"matrix": {}, "sortedAssets": []}}"#,
            r#"{"timestamp": "yesterday", "data": {"matrix": {}, "sortedAssets": []}}"#,
        ] {
            store.save(KEY, payload).unwrap();
            assert!(cache.get().is_none(), "payload should miss: {payload}");
            assert!(store.load(KEY).unwrap().is_none());
        }
    }

    #[test]
    fn test_structurally_inconsistent_report_is_discarded() {
        let (cache, store, _clock) = cache();
        let mut report = report();
        report.sorted_assets.pop();
        let entry = CacheEntry {
            timestamp: NOW,
            data: report,
        };
        store
            .save(KEY, &serde_json::to_string(&entry).unwrap())
            .unwrap();

        assert!(cache.get().is_none());
        assert!(store.load(KEY).unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites_wholesale() {
        let (cache, _store, clock) = cache();
        cache.put(&report()).unwrap();

        clock.advance(10);
        cache.put(&CorrelationReport::default()).unwrap();

        let entry = cache.get().unwrap();
        assert_eq!(entry.timestamp, NOW + 10);
        assert!(entry.data.is_empty());
    }

    #[test]
    fn test_clear() {
        let (cache, _store, _clock) = cache();
        cache.put(&report()).unwrap();

        cache.clear().unwrap();
        assert!(cache.get().is_none());
    }
}
