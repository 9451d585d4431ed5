//! HTTP handlers for monthly predictions

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use shared::{Condition, ConditionCategory, MonthlyPrediction, PredictionFilter, Severity};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::services::{ConditionAlerts, CurrentConditions};
use crate::AppState;

/// Query parameters for listing predictions
#[derive(Debug, Deserialize)]
pub struct PredictionQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub condition: Option<Condition>,
    pub severity: Option<Severity>,
}

pub async fn list_predictions(
    State(state): State<AppState>,
    Query(query): Query<PredictionQuery>,
) -> AppResult<Json<Vec<MonthlyPrediction>>> {
    let filter = PredictionFilter {
        year: query.year,
        month: query.month,
        condition: query.condition,
        severity: query.severity,
    };
    let predictions = state.prediction_service().list(&filter).await?;
    Ok(Json(predictions))
}

/// Body for classifying a single month
#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeMonthRequest {
    #[validate(range(min = 1981, max = 2050))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
}

/// Classify (year, month) from stored samples
pub async fn analyze_month(
    State(state): State<AppState>,
    Json(input): Json<AnalyzeMonthRequest>,
) -> AppResult<Json<MonthlyPrediction>> {
    input.validate()?;

    state
        .prediction_service()
        .classify_month(input.year, input.month)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No weather data available for the specified month".to_string()))
}

/// Conditions for the current calendar month
pub async fn current_conditions(State(state): State<AppState>) -> AppResult<Json<CurrentConditions>> {
    state
        .prediction_service()
        .current_conditions(Utc::now().date_naive())
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound("No data available for current month. Please sync weather data first.".to_string())
        })
}

/// Optional year, defaulting to the current one
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

impl YearQuery {
    fn year_or_current(&self) -> i32 {
        self.year.unwrap_or_else(|| Utc::now().year())
    }
}

pub async fn drought_alerts(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ConditionAlerts>> {
    let alerts = state
        .prediction_service()
        .alerts(query.year_or_current(), ConditionCategory::Drought)
        .await?;
    Ok(Json(alerts))
}

pub async fn flood_alerts(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> AppResult<Json<ConditionAlerts>> {
    let alerts = state
        .prediction_service()
        .alerts(query.year_or_current(), ConditionCategory::Flood)
        .await?;
    Ok(Json(alerts))
}
