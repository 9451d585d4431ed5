//! HTTP handlers for daily weather samples

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{SampleFilter, WeatherSample};
use validator::Validate;

use crate::error::AppResult;
use crate::AppState;

const DEFAULT_SYNC_YEARS: u32 = 5;

/// Query parameters for listing samples
#[derive(Debug, Deserialize)]
pub struct SampleQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// List stored samples, newest first
pub async fn list_weather_data(
    State(state): State<AppState>,
    Query(query): Query<SampleQuery>,
) -> AppResult<Json<Vec<WeatherSample>>> {
    let filter = SampleFilter {
        start_date: query.start_date,
        end_date: query.end_date,
        year: query.year,
        month: query.month,
    };
    let samples = state.store.list_samples(&filter).await?;
    Ok(Json(samples))
}

/// Sync request body: either a number of years or an explicit range
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SyncRequest {
    #[validate(range(min = 1, max = 10))]
    pub years: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub status: String,
    pub message: String,
    pub records_added: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Pull data from NASA POWER and store it
pub async fn sync_weather_data(
    State(state): State<AppState>,
    Json(input): Json<SyncRequest>,
) -> AppResult<Json<SyncResponse>> {
    input.validate()?;

    let service = state.ingestion_service();
    let outcome = match (input.start_date, input.end_date) {
        (Some(start), Some(end)) => service.sync_range(start, end).await?,
        _ => {
            let years = input.years.unwrap_or(DEFAULT_SYNC_YEARS);
            service.sync(years, Utc::now().date_naive()).await?
        }
    };

    Ok(Json(SyncResponse {
        status: "success".to_string(),
        message: format!("Successfully synced {} weather records", outcome.records_added),
        records_added: outcome.records_added,
        start_date: outcome.start_date,
        end_date: outcome.end_date,
    }))
}
