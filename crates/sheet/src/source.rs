//! Sheet fetch abstraction and the refresh-interval snapshot cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use reviewbot_core::Snapshot;

use crate::dates::DateResolver;
use crate::error::SheetError;
use crate::parser::parse_snapshot;

/// Raw cell grid provider.
///
/// Row 0 is the header. A row with zero cells marks the end of the data.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, SheetError>;
}

/// Provider of parsed record snapshots.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Latest complete snapshot. `today` fixes the year of year-less dates.
    async fn snapshot(&self, today: NaiveDate) -> Result<Arc<Snapshot>, SheetError>;
}

struct Cached {
    fetched_at: Instant,
    year: i32,
    snapshot: Arc<Snapshot>,
}

/// Re-fetches the sheet at most once per refresh interval.
///
/// Each refresh replaces the snapshot wholesale. A failed refresh leaves the
/// previous snapshot untouched and returns the error.
pub struct SheetCache<S> {
    source: S,
    refresh_interval: Duration,
    cached: Mutex<Option<Cached>>,
}

impl<S: SheetSource> SheetCache<S> {
    pub fn new(source: S, refresh_interval: Duration) -> Self {
        Self {
            source,
            refresh_interval,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<S: SheetSource> SnapshotSource for SheetCache<S> {
    async fn snapshot(&self, today: NaiveDate) -> Result<Arc<Snapshot>, SheetError> {
        let mut cached = self.cached.lock().await;

        if let Some(c) = cached.as_ref() {
            if c.year == today.year() && c.fetched_at.elapsed() < self.refresh_interval {
                debug!(records = c.snapshot.len(), "serving cached snapshot");
                return Ok(c.snapshot.clone());
            }
        }

        let rows = self.source.fetch_rows().await?;
        let snapshot = Arc::new(parse_snapshot(&rows, &DateResolver::for_day(today)));
        info!(rows = rows.len(), records = snapshot.len(), "schedule sheet refreshed");

        *cached = Some(Cached {
            fetched_at: Instant::now(),
            year: today.year(),
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl SheetSource for CountingSource {
        async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, SheetError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SheetError::Decode("boom".to_string()));
            }
            let name = format!("Event {n}");
            Ok(vec![
                vec!["Event".to_string()],
                vec![name, String::new(), "1/5".to_string()],
                vec![String::new(), "Prof".to_string()],
            ])
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn cache(fail: bool) -> (SheetCache<CountingSource>, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            fetches: fetches.clone(),
            fail,
        };
        (SheetCache::new(source, Duration::from_secs(300)), fetches)
    }

    #[tokio::test(start_paused = true)]
    async fn serves_cached_snapshot_within_interval() {
        let (cache, fetches) = cache(false);
        let first = cache.snapshot(day(2026, 10, 19)).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;
        let second = cache.snapshot(day(2026, 10, 19)).await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test(start_paused = true)]
    async fn refetches_after_interval_and_replaces_wholesale() {
        let (cache, fetches) = cache(false);
        cache.snapshot(day(2026, 10, 19)).await.unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;
        let snapshot = cache.snapshot(day(2026, 10, 19)).await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["Event 1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn year_change_forces_refresh() {
        let (cache, fetches) = cache(false);
        let old = cache.snapshot(day(2026, 12, 31)).await.unwrap();
        let new = cache.snapshot(day(2027, 1, 1)).await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(old["Event 0"].email_date, Some(day(2026, 1, 5)));
        assert_eq!(new["Event 1"].email_date, Some(day(2027, 1, 5)));
    }

    #[tokio::test]
    async fn fetch_error_propagates() {
        let (cache, _) = cache(true);
        assert!(cache.snapshot(day(2026, 10, 19)).await.is_err());
    }
}
