//! Yearly forecast generation and multi-year comparison

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use shared::{
    validate_year, MonthlyPrediction, PredictionFilter, YearComparison, YearlyForecast, YearlyRollup,
};

use super::prediction::PredictionService;
use crate::error::{AppError, AppResult};
use crate::store::WeatherStore;

/// Rolls monthly predictions up into annual forecasts
#[derive(Clone)]
pub struct ForecastService {
    store: Arc<dyn WeatherStore>,
    predictions: PredictionService,
    region_name: String,
}

/// Forecast with the monthly predictions it was built from
#[derive(Debug, Clone, Serialize)]
pub struct ForecastDetail {
    #[serde(flatten)]
    pub forecast: YearlyForecast,
    pub monthly_predictions: Vec<MonthlyPrediction>,
}

impl ForecastService {
    pub fn new(store: Arc<dyn WeatherStore>, predictions: PredictionService, region_name: String) -> Self {
        Self {
            store,
            predictions,
            region_name,
        }
    }

    async fn predictions_for_year(&self, year: i32) -> AppResult<Vec<MonthlyPrediction>> {
        let filter = PredictionFilter {
            year: Some(year),
            ..Default::default()
        };
        let mut predictions = self.store.list_predictions(&filter).await?;
        predictions.sort_by_key(|p| p.month);
        Ok(predictions)
    }

    /// Classify all twelve months when the year has no predictions yet.
    /// Returns how many predictions the year has afterwards.
    pub async fn ensure_monthly_coverage(&self, year: i32) -> AppResult<usize> {
        let existing = self.predictions_for_year(year).await?;
        if !existing.is_empty() {
            return Ok(existing.len());
        }

        tracing::info!("No monthly predictions for {}; classifying all months", year);
        let mut classified = 0;
        for month in 1..=12 {
            if self.predictions.classify_month(year, month).await?.is_some() {
                classified += 1;
            }
        }
        Ok(classified)
    }

    /// Build and upsert the forecast for `year`.
    ///
    /// Returns `None` when no month of the year could be classified.
    pub async fn forecast_year(&self, year: i32) -> AppResult<Option<YearlyForecast>> {
        validate_year(year).map_err(|e| AppError::invalid("year", e))?;

        self.ensure_monthly_coverage(year).await?;
        let predictions = self.predictions_for_year(year).await?;

        let Some(rollup) = YearlyRollup::from_predictions(&predictions) else {
            tracing::debug!("No monthly predictions for {}; no forecast generated", year);
            return Ok(None);
        };

        let forecast = self
            .store
            .upsert_forecast(&rollup.into_forecast(&self.region_name, year))
            .await?;
        tracing::info!(
            "Generated {} forecast: risk {}, {} drought / {} flood months",
            year,
            forecast.overall_risk_level,
            forecast.drought_months,
            forecast.flood_risk_months
        );
        Ok(Some(forecast))
    }

    /// Stored forecast for the current year, generating it if missing
    pub async fn current_year(&self, today: NaiveDate) -> AppResult<Option<YearlyForecast>> {
        let year = today.year();
        if let Some(existing) = self.store.get_forecast(year).await? {
            return Ok(Some(existing));
        }
        self.forecast_year(year).await
    }

    pub async fn get(&self, year: i32) -> AppResult<Option<YearlyForecast>> {
        self.store.get_forecast(year).await
    }

    pub async fn list(&self) -> AppResult<Vec<YearlyForecast>> {
        self.store.list_forecasts().await
    }

    /// Attach the year's monthly predictions
    pub async fn with_months(&self, forecast: YearlyForecast) -> AppResult<ForecastDetail> {
        let monthly_predictions = self.predictions_for_year(forecast.year).await?;
        Ok(ForecastDetail {
            forecast,
            monthly_predictions,
        })
    }

    /// Compare stored forecasts for the requested years
    pub async fn compare_years(&self, years: &[i32]) -> AppResult<YearComparison> {
        if years.is_empty() {
            return Err(AppError::invalid("years", "At least one year is required"));
        }

        let forecasts = self.store.forecasts_for_years(years).await?;
        Ok(YearComparison::build(forecasts)?)
    }
}
