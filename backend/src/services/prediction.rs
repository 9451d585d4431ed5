//! Monthly drought and flood classification

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    assess_month, validate_month, validate_year, ClassificationThresholds, Condition, ConditionCategory,
    MonthlyPrediction, PredictionFilter, Severity, YearMonth,
};

use crate::error::{AppError, AppResult};
use crate::store::WeatherStore;

/// Classifies months from stored samples and serves stored predictions
#[derive(Clone)]
pub struct PredictionService {
    store: Arc<dyn WeatherStore>,
    thresholds: ClassificationThresholds,
}

/// Snapshot of the current month for dashboards
#[derive(Debug, Clone, Serialize)]
pub struct CurrentConditions {
    pub current_month: String,
    pub condition: Condition,
    pub condition_label: &'static str,
    pub severity: Severity,
    pub severity_label: &'static str,
    pub precipitation: Decimal,
    pub temperature: Decimal,
    pub humidity: Decimal,
    pub confidence_score: Decimal,
    pub alert_message: &'static str,
    pub description: String,
    pub recommendations: String,
}

impl CurrentConditions {
    fn from_prediction(prediction: MonthlyPrediction) -> Self {
        let current_month = YearMonth {
            year: prediction.year,
            month: prediction.month,
        }
        .label()
        .unwrap_or_default();

        Self {
            current_month,
            condition: prediction.condition,
            condition_label: prediction.condition.label(),
            severity: prediction.severity,
            severity_label: prediction.severity.label(),
            precipitation: prediction.monthly_precipitation,
            temperature: prediction.avg_temperature,
            humidity: prediction.avg_humidity,
            confidence_score: prediction.confidence_score,
            alert_message: prediction.severity.alert_message(),
            description: prediction.description,
            recommendations: prediction.recommendations,
        }
    }
}

/// Stored predictions of one category for a year
#[derive(Debug, Clone, Serialize)]
pub struct ConditionAlerts {
    pub year: i32,
    pub category: ConditionCategory,
    pub count: usize,
    pub data: Vec<MonthlyPrediction>,
}

impl PredictionService {
    pub fn new(store: Arc<dyn WeatherStore>, thresholds: ClassificationThresholds) -> Self {
        Self { store, thresholds }
    }

    /// Classify (year, month) from its samples and upsert the result.
    ///
    /// Returns `None` without writing when the month has no samples.
    pub async fn classify_month(&self, year: i32, month: u32) -> AppResult<Option<MonthlyPrediction>> {
        validate_year(year).map_err(|e| AppError::invalid("year", e))?;
        validate_month(month).map_err(|e| AppError::invalid("month", e))?;

        let samples = self.store.samples_for_month(year, month).await?;
        let Some(assessment) = assess_month(year, month, &samples, &self.thresholds) else {
            tracing::debug!("No weather data for {}-{:02}; skipping classification", year, month);
            return Ok(None);
        };

        let prediction = self.store.upsert_prediction(&assessment).await?;
        tracing::info!(
            "Classified {}-{:02} as {} ({}) from {} samples",
            year,
            month,
            prediction.condition,
            prediction.severity,
            samples.len()
        );
        Ok(Some(prediction))
    }

    /// Stored prediction for (year, month), classifying when missing
    pub async fn get_or_classify(&self, year: i32, month: u32) -> AppResult<Option<MonthlyPrediction>> {
        if let Some(existing) = self.store.get_prediction(year, month).await? {
            return Ok(Some(existing));
        }
        self.classify_month(year, month).await
    }

    pub async fn current_conditions(&self, today: NaiveDate) -> AppResult<Option<CurrentConditions>> {
        let prediction = self.get_or_classify(today.year(), today.month()).await?;
        Ok(prediction.map(CurrentConditions::from_prediction))
    }

    /// Predictions for `year` whose condition falls in `category`
    pub async fn alerts(&self, year: i32, category: ConditionCategory) -> AppResult<ConditionAlerts> {
        let filter = PredictionFilter {
            year: Some(year),
            ..Default::default()
        };
        let data: Vec<MonthlyPrediction> = self
            .store
            .list_predictions(&filter)
            .await?
            .into_iter()
            .filter(|p| p.condition.category() == category)
            .collect();

        Ok(ConditionAlerts {
            year,
            category,
            count: data.len(),
            data,
        })
    }

    pub async fn list(&self, filter: &PredictionFilter) -> AppResult<Vec<MonthlyPrediction>> {
        self.store.list_predictions(filter).await
    }
}
