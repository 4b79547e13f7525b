//! Per-key freshness decisions backed by the store's sync metadata

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, Utc};

use super::key::CacheKey;
use crate::error::StorageError;
use crate::store::LocalStore;

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day used for past/upcoming decisions
    fn today(&self) -> NaiveDate;
}

/// Wall clock; "today" is the local calendar day
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Hand-driven clock for tests; "today" is the UTC day of `now`
#[cfg(test)]
pub struct ManualClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: std::sync::Mutex::new(now),
        }
    }

    /// Clock at noon UTC on `day`
    pub fn at_noon(day: NaiveDate) -> Self {
        Self::new(day.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc())
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::TimeDelta::from_std(by).unwrap_or_default();
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Decides whether a cache key needs a remote round-trip.
#[derive(Clone)]
pub struct StalenessPolicy {
    store: Arc<LocalStore>,
    clock: Arc<dyn Clock>,
}

impl StalenessPolicy {
    pub fn new(store: Arc<LocalStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn last_sync_ms(&self, key: &CacheKey) -> Option<i64> {
        match self.store.last_sync_ms(&key.to_string()) {
            Ok(ms) => ms,
            Err(e) => {
                log::warn!("Failed to read sync metadata for {}: {}", key, e);
                None
            }
        }
    }

    /// When `key` last synced successfully
    pub fn last_synced(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.last_sync_ms(key)
            .and_then(DateTime::from_timestamp_millis)
    }

    /// Time since the last successful sync; `None` if never synced
    pub fn age(&self, key: &CacheKey) -> Option<Duration> {
        let last = self.last_sync_ms(key)?;
        let now = self.clock.now().timestamp_millis();
        Some(Duration::from_millis(now.saturating_sub(last).max(0) as u64))
    }

    /// Stale when older than `max_age` or never synced
    pub fn is_stale(&self, key: &CacheKey, max_age: Duration) -> bool {
        match self.age(key) {
            Some(age) => age > max_age,
            None => true,
        }
    }

    /// Fresh, but past half its TTL: worth an opportunistic background refresh
    pub fn should_refresh(&self, key: &CacheKey, max_age: Duration) -> bool {
        self.age(key)
            .is_some_and(|age| age <= max_age && age > max_age / 2)
    }

    /// Record a successful sync at the current time
    pub fn mark_synced(&self, key: &CacheKey) -> Result<DateTime<Utc>, StorageError> {
        let now = self.clock.now();
        self.store
            .set_last_sync_ms(&key.to_string(), now.timestamp_millis())?;
        log::debug!("Marked {} synced", key);
        Ok(now)
    }
}
