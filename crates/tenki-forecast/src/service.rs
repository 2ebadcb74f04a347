//! Read-through forecast service: cache hit or fetch-flatten-persist.

use std::path::Path;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::instrument;

use crate::cache::ForecastCache;
use crate::client::JmaClient;
use crate::error::ForecastError;
use crate::types::{flatten, select_weekly, ForecastRow};

/// The fetch-then-persist-then-serve pipeline.
///
/// The cache and the miss path live behind one async mutex, so concurrent
/// misses for the same area code fetch at most once instead of racing to
/// insert duplicate batches.
pub struct ForecastService {
    client: JmaClient,
    cache: Mutex<ForecastCache>,
}

impl ForecastService {
    /// Service against the production JMA endpoints, cache at `db_path`.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, ForecastError> {
        Ok(Self {
            client: JmaClient::new()?,
            cache: Mutex::new(ForecastCache::new(db_path)?),
        })
    }

    /// Service against an alternate endpoint (tests point this at wiremock).
    pub fn with_base_url<P: AsRef<Path>>(
        db_path: P,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ForecastError> {
        Ok(Self {
            client: JmaClient::with_base_url(base_url, timeout)?,
            cache: Mutex::new(ForecastCache::new(db_path)?),
        })
    }

    /// Return the 7-day forecast rows for an area code.
    ///
    /// Hit: stored rows, no network. Miss: fetch, select the weekly edition,
    /// flatten, persist the batch, and serve what was just stored. Any
    /// fetch/parse failure propagates without writing, so the next request
    /// retries unconditionally.
    #[instrument(skip(self), level = "info")]
    pub async fn get(&self, area_code: &str) -> Result<Vec<ForecastRow>, ForecastError> {
        let mut cache = self.cache.lock().await;

        if cache.has_area(area_code)? {
            tracing::debug!("Cache hit for area {}", area_code);
            return cache.rows_for_area(area_code);
        }

        tracing::info!("Cache miss for area {}, fetching", area_code);
        let editions = self.client.fetch_forecast(area_code).await?;
        let weekly = select_weekly(area_code, editions)?;
        let rows = flatten(area_code, &weekly)?;

        cache.store_rows(&rows)?;
        cache.rows_for_area(area_code)
    }
}
