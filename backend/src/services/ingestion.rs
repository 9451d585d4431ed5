//! Ingestion of daily samples from NASA POWER

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use shared::{validate_date_range, validate_sync_years, DateRange, GpsCoordinates};

use crate::error::{AppError, AppResult};
use crate::external::{parse_daily_payload, NasaPowerClient};
use crate::store::WeatherStore;

/// Fetches provider payloads and upserts one sample per day
#[derive(Clone)]
pub struct IngestionService {
    store: Arc<dyn WeatherStore>,
    client: NasaPowerClient,
}

/// Outcome of a sync request
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub records_added: usize,
}

impl IngestionService {
    pub fn new(store: Arc<dyn WeatherStore>, client: NasaPowerClient) -> Self {
        Self { store, client }
    }

    fn coordinates(&self) -> &GpsCoordinates {
        self.client.coordinates()
    }

    /// Fetch the raw payload for a range. Transport and HTTP failures are
    /// logged and reported as `None`.
    pub async fn fetch(&self, start: NaiveDate, end: NaiveDate) -> Option<Value> {
        match self.client.fetch_daily(start, end).await {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::error!("Error fetching NASA POWER data for {} to {}: {}", start, end, e);
                None
            }
        }
    }

    /// Upsert every day in a payload. Returns how many dates were new.
    ///
    /// A payload without `properties.parameter.PRECTOTCORR` stores nothing
    /// and returns zero.
    pub async fn store_payload(&self, payload: &Value) -> AppResult<usize> {
        let Some(grid) = parse_daily_payload(payload, self.coordinates()) else {
            tracing::warn!("NASA POWER payload has no daily parameter grid; nothing stored");
            return Ok(0);
        };

        for key in &grid.skipped_keys {
            tracing::warn!("Skipping NASA POWER entry with unparseable date key {:?}", key);
        }

        let mut added = 0;
        for measurement in &grid.measurements {
            if self.store.upsert_sample(measurement).await? {
                added += 1;
            }
        }

        tracing::info!(
            "Stored {} daily samples ({} new)",
            grid.measurements.len(),
            added
        );
        Ok(added)
    }

    /// Fetch and store an inclusive date range
    pub async fn sync_range(&self, start: NaiveDate, end: NaiveDate) -> AppResult<SyncOutcome> {
        validate_date_range(start, end).map_err(|e| AppError::invalid("start_date", e))?;

        tracing::info!("Fetching weather data from {} to {}", start, end);
        let records_added = match self.fetch(start, end).await {
            Some(payload) => self.store_payload(&payload).await?,
            None => 0,
        };

        Ok(SyncOutcome {
            start_date: start,
            end_date: end,
            records_added,
        })
    }

    /// Sync the last `years` years up to `today`
    pub async fn sync(&self, years: u32, today: NaiveDate) -> AppResult<SyncOutcome> {
        validate_sync_years(years).map_err(|e| AppError::invalid("years", e))?;

        let range = DateRange::years_back(today, years);
        self.sync_range(range.start, range.end).await
    }
}
