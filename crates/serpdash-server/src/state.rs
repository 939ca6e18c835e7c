use std::sync::Arc;
use std::time::{Duration, Instant};

use serpdash_core::AppConfig;
use serpdash_sheets::{load_dataset, Dataset};
use tokio::sync::Mutex;

struct CacheEntry {
    fetched_at: Instant,
    dataset: Arc<Dataset>,
}

/// Session dataset with a fixed time-to-live.
///
/// Every request reads through this cache; the external spreadsheet is only
/// refetched once the TTL lapses, so user interactions recompute over the
/// same in-memory table instead of hammering the export URL.
pub struct DatasetCache {
    config: Arc<AppConfig>,
    ttl: Duration,
    entry: Mutex<Option<CacheEntry>>,
}

impl DatasetCache {
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self {
            config,
            ttl,
            entry: Mutex::new(None),
        }
    }

    /// Builds a cache preloaded with a fixed dataset that never expires.
    /// Test-and-demo constructor; no fetch ever happens through it.
    #[must_use]
    pub fn preloaded(config: Arc<AppConfig>, dataset: Dataset) -> Self {
        Self {
            config,
            ttl: Duration::MAX,
            entry: Mutex::new(Some(CacheEntry {
                fetched_at: Instant::now(),
                dataset: Arc::new(dataset),
            })),
        }
    }

    /// Returns the cached dataset, loading it first if absent or expired.
    pub async fn get(&self) -> Arc<Dataset> {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                return Arc::clone(&cached.dataset);
            }
            tracing::debug!("dataset cache expired, reloading");
        }

        let dataset = Arc::new(load_dataset(&self.config).await);
        *entry = Some(CacheEntry {
            fetched_at: Instant::now(),
            dataset: Arc::clone(&dataset),
        });
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serpdash_core::Environment;
    use serpdash_sheets::{sample_dataset, DataSource};

    fn test_config() -> Arc<AppConfig> {
        Arc::new(AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "info".to_owned(),
            target_domain: "recharge.com".to_owned(),
            sheet_csv_url: None,
            sheets_api_key: None,
            cache_ttl_secs: 300,
            fetch_timeout_secs: 5,
            fetch_max_retries: 0,
            fetch_retry_backoff_base_ms: 0,
        })
    }

    #[tokio::test]
    async fn preloaded_cache_serves_fixed_dataset() {
        let cache = DatasetCache::preloaded(test_config(), sample_dataset());
        let dataset = cache.get().await;
        assert_eq!(dataset.source, DataSource::Sample);
        assert!(!dataset.records.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_cache_loads_sample_once() {
        let cache = DatasetCache::new(test_config());
        let first = cache.get().await;
        let second = cache.get().await;
        assert_eq!(first.source, DataSource::Sample);
        // Same Arc — no reload inside the TTL window.
        assert!(Arc::ptr_eq(&first, &second));
    }
}
