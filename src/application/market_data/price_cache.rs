use crate::domain::market::PriceBar;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cache key: one provider request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarRequest {
    pub symbol: String,
    pub period: String,
    pub interval: String,
}

impl BarRequest {
    pub fn new(symbol: &str, period: &str, interval: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            period: period.to_string(),
            interval: interval.to_string(),
        }
    }
}

/// Time-boxed memo of primary-ticker bars.
///
/// Owned by a single render handler, so every access goes through `&mut self`
/// and no lock is needed. Entries are only evicted on expiry.
#[derive(Debug)]
pub struct PriceCache {
    entries: HashMap<BarRequest, (Vec<PriceBar>, Instant)>,
    ttl: Duration,
}

impl PriceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn get(&mut self, key: &BarRequest) -> Option<Vec<PriceBar>> {
        self.get_at(key, Instant::now())
    }

    /// Lookup as of `now`; an expired entry is dropped.
    pub fn get_at(&mut self, key: &BarRequest, now: Instant) -> Option<Vec<PriceBar>> {
        let expired = match self.entries.get(key) {
            Some((bars, expires_at)) if now < *expires_at => {
                debug!("PriceCache: hit for {} ({} bars)", key.symbol, bars.len());
                return Some(bars.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            debug!("PriceCache: entry for {} expired", key.symbol);
            self.entries.remove(key);
        }
        None
    }

    pub fn insert(&mut self, key: BarRequest, bars: Vec<PriceBar>) {
        self.insert_at(key, bars, Instant::now());
    }

    pub fn insert_at(&mut self, key: BarRequest, bars: Vec<PriceBar>, now: Instant) {
        self.entries.insert(key, (bars, now + self.ttl));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bars() -> Vec<PriceBar> {
        vec![PriceBar {
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 1.0,
        }]
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = PriceCache::new(Duration::from_secs(3600));
        let key = BarRequest::new("AAPL", "10d", "1d");
        let t0 = Instant::now();
        cache.insert_at(key.clone(), bars(), t0);

        let hit = cache.get_at(&key, t0 + Duration::from_secs(3599));
        assert_eq!(hit, Some(bars()));
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let mut cache = PriceCache::new(Duration::from_secs(3600));
        let key = BarRequest::new("AAPL", "10d", "1d");
        let t0 = Instant::now();
        cache.insert_at(key.clone(), bars(), t0);

        assert!(cache.get_at(&key, t0 + Duration::from_secs(3600)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_key_includes_period_and_interval() {
        let mut cache = PriceCache::new(Duration::from_secs(60));
        cache.insert(BarRequest::new("AAPL", "10d", "1d"), bars());
        assert_eq!(cache.len(), 1);

        assert!(cache.get(&BarRequest::new("AAPL", "5d", "1d")).is_none());
        assert!(cache.get(&BarRequest::new("AAPL", "10d", "1wk")).is_none());
        assert!(cache.get(&BarRequest::new("AAPL", "10d", "1d")).is_some());
    }
}
