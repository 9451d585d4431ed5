//! HTTP handlers for yearly forecasts

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use shared::{parse_year_list, YearComparison, YearlyForecast};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::ForecastDetail;
use crate::AppState;

pub async fn list_forecasts(State(state): State<AppState>) -> AppResult<Json<Vec<YearlyForecast>>> {
    let forecasts = state.forecast_service().list().await?;
    Ok(Json(forecasts))
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct GenerateForecastRequest {
    #[validate(range(min = 1981, max = 2050))]
    pub year: Option<i32>,
}

/// Generate (or regenerate) the forecast for a year
pub async fn generate_forecast(
    State(state): State<AppState>,
    Json(input): Json<GenerateForecastRequest>,
) -> AppResult<Json<ForecastDetail>> {
    input.validate()?;
    let year = input.year.unwrap_or_else(|| Utc::now().year());

    let service = state.forecast_service();
    let forecast = service.forecast_year(year).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Unable to generate forecast for {}. Please ensure weather data is synced.",
            year
        ))
    })?;

    Ok(Json(service.with_months(forecast).await?))
}

pub async fn current_year_forecast(State(state): State<AppState>) -> AppResult<Json<ForecastDetail>> {
    let service = state.forecast_service();
    let forecast = service
        .current_year(Utc::now().date_naive())
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Unable to generate forecast. Please sync weather data first.".to_string())
        })?;

    Ok(Json(service.with_months(forecast).await?))
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub years: Option<String>,
}

/// Compare stored forecasts, e.g. `?years=2022,2023,2024`
pub async fn compare_years(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> AppResult<Json<YearComparison>> {
    let years = parse_year_list(query.years.as_deref().unwrap_or_default())
        .map_err(|e| AppError::invalid("years", e))?;

    let comparison = state.forecast_service().compare_years(&years).await?;
    Ok(Json(comparison))
}
