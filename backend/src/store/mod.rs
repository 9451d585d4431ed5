//! Persistence for samples, monthly predictions and yearly forecasts
//!
//! Every write is an upsert keyed by the record's natural key: `date` for
//! samples, `(year, month)` for predictions, `year` for forecasts.

mod memory;
mod postgres;

pub use memory::MemoryWeatherStore;
pub use postgres::PgWeatherStore;

use axum::async_trait;
use shared::{
    DailyMeasurement, MonthlyPrediction, NewMonthlyPrediction, NewYearlyForecast, PredictionFilter,
    SampleFilter, WeatherSample, YearlyForecast,
};

use crate::error::AppResult;

#[async_trait]
pub trait WeatherStore: Send + Sync {
    /// Cheap connectivity check for health reporting
    async fn ping(&self) -> AppResult<()>;

    /// Insert or overwrite the sample for `measurement.date`.
    /// Returns `true` when the date was not stored before.
    async fn upsert_sample(&self, measurement: &DailyMeasurement) -> AppResult<bool>;

    /// Samples matching the filter, newest first
    async fn list_samples(&self, filter: &SampleFilter) -> AppResult<Vec<WeatherSample>>;

    async fn samples_for_month(&self, year: i32, month: u32) -> AppResult<Vec<WeatherSample>> {
        let filter = SampleFilter {
            year: Some(year),
            month: Some(month),
            ..Default::default()
        };
        self.list_samples(&filter).await
    }

    async fn upsert_prediction(&self, prediction: &NewMonthlyPrediction) -> AppResult<MonthlyPrediction>;

    async fn get_prediction(&self, year: i32, month: u32) -> AppResult<Option<MonthlyPrediction>>;

    /// Predictions matching the filter, newest month first
    async fn list_predictions(&self, filter: &PredictionFilter) -> AppResult<Vec<MonthlyPrediction>>;

    async fn upsert_forecast(&self, forecast: &NewYearlyForecast) -> AppResult<YearlyForecast>;

    async fn get_forecast(&self, year: i32) -> AppResult<Option<YearlyForecast>>;

    /// Stored forecasts for the given years, oldest first. Missing years are
    /// left out.
    async fn forecasts_for_years(&self, years: &[i32]) -> AppResult<Vec<YearlyForecast>>;

    /// All stored forecasts, newest year first
    async fn list_forecasts(&self) -> AppResult<Vec<YearlyForecast>>;
}
