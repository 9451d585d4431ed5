//! In-process store for tests and dry runs

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use axum::async_trait;
use chrono::Utc;
use shared::{
    DailyMeasurement, MonthlyPrediction, NewMonthlyPrediction, NewYearlyForecast, PredictionFilter,
    SampleFilter, WeatherSample, YearlyForecast,
};
use uuid::Uuid;

use super::WeatherStore;
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    samples: BTreeMap<chrono::NaiveDate, WeatherSample>,
    predictions: BTreeMap<(i32, u32), MonthlyPrediction>,
    forecasts: BTreeMap<i32, YearlyForecast>,
}

/// Same upsert semantics as the Postgres store, held in memory
#[derive(Default)]
pub struct MemoryWeatherStore {
    tables: Mutex<Tables>,
}

impl MemoryWeatherStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl WeatherStore for MemoryWeatherStore {
    async fn ping(&self) -> AppResult<()> {
        self.tables().map(|_| ())
    }

    async fn upsert_sample(&self, m: &DailyMeasurement) -> AppResult<bool> {
        let mut tables = self.tables()?;
        let now = Utc::now();

        let (id, created_at, inserted) = match tables.samples.get(&m.date) {
            Some(existing) => (existing.id, existing.created_at, false),
            None => (Uuid::new_v4(), now, true),
        };

        tables.samples.insert(
            m.date,
            WeatherSample {
                id,
                date: m.date,
                latitude: m.latitude,
                longitude: m.longitude,
                precipitation: m.precipitation,
                temperature: m.temperature,
                temperature_max: m.temperature_max,
                temperature_min: m.temperature_min,
                relative_humidity: m.relative_humidity,
                wind_speed: m.wind_speed,
                created_at,
                updated_at: now,
            },
        );

        Ok(inserted)
    }

    async fn list_samples(&self, filter: &SampleFilter) -> AppResult<Vec<WeatherSample>> {
        let tables = self.tables()?;
        Ok(tables
            .samples
            .values()
            .rev()
            .filter(|s| filter.matches(s.date))
            .cloned()
            .collect())
    }

    async fn upsert_prediction(&self, p: &NewMonthlyPrediction) -> AppResult<MonthlyPrediction> {
        let mut tables = self.tables()?;
        let key = (p.year, p.month);

        let (id, created_at) = match tables.predictions.get(&key) {
            Some(existing) => (existing.id, existing.created_at),
            None => (Uuid::new_v4(), Utc::now()),
        };

        let stored = MonthlyPrediction {
            id,
            date: p.date,
            year: p.year,
            month: p.month,
            condition: p.condition,
            severity: p.severity,
            monthly_precipitation: p.monthly_precipitation,
            avg_temperature: p.avg_temperature,
            avg_humidity: p.avg_humidity,
            confidence_score: p.confidence_score,
            description: p.description.clone(),
            recommendations: p.recommendations.clone(),
            created_at,
        };
        tables.predictions.insert(key, stored.clone());

        Ok(stored)
    }

    async fn get_prediction(&self, year: i32, month: u32) -> AppResult<Option<MonthlyPrediction>> {
        Ok(self.tables()?.predictions.get(&(year, month)).cloned())
    }

    async fn list_predictions(&self, filter: &PredictionFilter) -> AppResult<Vec<MonthlyPrediction>> {
        let tables = self.tables()?;
        Ok(tables
            .predictions
            .values()
            .rev()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn upsert_forecast(&self, f: &NewYearlyForecast) -> AppResult<YearlyForecast> {
        let mut tables = self.tables()?;
        let now = Utc::now();

        let (id, created_at) = match tables.forecasts.get(&f.year) {
            Some(existing) => (existing.id, existing.created_at),
            None => (Uuid::new_v4(), now),
        };

        let stored = YearlyForecast {
            id,
            year: f.year,
            total_precipitation: f.total_precipitation,
            avg_temperature: f.avg_temperature,
            drought_months: f.drought_months,
            flood_risk_months: f.flood_risk_months,
            normal_months: f.normal_months,
            overall_risk_level: f.overall_risk_level,
            summary: f.summary.clone(),
            created_at,
            updated_at: now,
        };
        tables.forecasts.insert(f.year, stored.clone());

        Ok(stored)
    }

    async fn get_forecast(&self, year: i32) -> AppResult<Option<YearlyForecast>> {
        Ok(self.tables()?.forecasts.get(&year).cloned())
    }

    async fn forecasts_for_years(&self, years: &[i32]) -> AppResult<Vec<YearlyForecast>> {
        let tables = self.tables()?;
        Ok(tables
            .forecasts
            .values()
            .filter(|f| years.contains(&f.year))
            .cloned()
            .collect())
    }

    async fn list_forecasts(&self) -> AppResult<Vec<YearlyForecast>> {
        Ok(self.tables()?.forecasts.values().rev().cloned().collect())
    }
}
