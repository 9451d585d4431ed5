//! PostgreSQL store backed by sqlx

use axum::async_trait;
use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    DailyMeasurement, MonthlyPrediction, NewMonthlyPrediction, NewYearlyForecast, PredictionFilter,
    SampleFilter, WeatherSample, YearlyForecast,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::WeatherStore;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PgWeatherStore {
    db: PgPool,
}

impl PgWeatherStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct SampleRow {
    id: Uuid,
    date: NaiveDate,
    latitude: Decimal,
    longitude: Decimal,
    precipitation: Decimal,
    temperature: Decimal,
    temperature_max: Decimal,
    temperature_min: Decimal,
    relative_humidity: Decimal,
    wind_speed: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SampleRow> for WeatherSample {
    fn from(row: SampleRow) -> Self {
        WeatherSample {
            id: row.id,
            date: row.date,
            latitude: row.latitude,
            longitude: row.longitude,
            precipitation: row.precipitation,
            temperature: row.temperature,
            temperature_max: row.temperature_max,
            temperature_min: row.temperature_min,
            relative_humidity: row.relative_humidity,
            wind_speed: row.wind_speed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PredictionRow {
    id: Uuid,
    date: NaiveDate,
    year: i32,
    month: i32,
    condition: String,
    severity: String,
    monthly_precipitation: Decimal,
    avg_temperature: Decimal,
    avg_humidity: Decimal,
    confidence_score: Decimal,
    description: String,
    recommendations: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PredictionRow> for MonthlyPrediction {
    type Error = AppError;

    fn try_from(row: PredictionRow) -> Result<Self, Self::Error> {
        Ok(MonthlyPrediction {
            id: row.id,
            date: row.date,
            year: row.year,
            month: to_unsigned(row.month, "month")?,
            condition: row.condition.parse().map_err(corrupt)?,
            severity: row.severity.parse().map_err(corrupt)?,
            monthly_precipitation: row.monthly_precipitation,
            avg_temperature: row.avg_temperature,
            avg_humidity: row.avg_humidity,
            confidence_score: row.confidence_score,
            description: row.description,
            recommendations: row.recommendations,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ForecastRow {
    id: Uuid,
    year: i32,
    total_precipitation: Decimal,
    avg_temperature: Decimal,
    drought_months: i32,
    flood_risk_months: i32,
    normal_months: i32,
    overall_risk_level: String,
    summary: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ForecastRow> for YearlyForecast {
    type Error = AppError;

    fn try_from(row: ForecastRow) -> Result<Self, Self::Error> {
        Ok(YearlyForecast {
            id: row.id,
            year: row.year,
            total_precipitation: row.total_precipitation,
            avg_temperature: row.avg_temperature,
            drought_months: to_unsigned(row.drought_months, "drought_months")?,
            flood_risk_months: to_unsigned(row.flood_risk_months, "flood_risk_months")?,
            normal_months: to_unsigned(row.normal_months, "normal_months")?,
            overall_risk_level: row.overall_risk_level.parse().map_err(corrupt)?,
            summary: row.summary,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn corrupt(e: shared::ParseEnumError) -> AppError {
    AppError::Internal(format!("Stored value is invalid: {}", e))
}

fn to_unsigned(value: i32, column: &str) -> AppResult<u32> {
    u32::try_from(value).map_err(|_| AppError::Internal(format!("Stored {} is negative: {}", column, value)))
}

const SAMPLE_COLUMNS: &str = "id, date, latitude, longitude, precipitation, temperature, \
     temperature_max, temperature_min, relative_humidity, wind_speed, created_at, updated_at";

const PREDICTION_COLUMNS: &str = "id, date, year, month, condition, severity, monthly_precipitation, \
     avg_temperature, avg_humidity, confidence_score, description, recommendations, created_at";

const FORECAST_COLUMNS: &str = "id, year, total_precipitation, avg_temperature, drought_months, \
     flood_risk_months, normal_months, overall_risk_level, summary, created_at, updated_at";

#[async_trait]
impl WeatherStore for PgWeatherStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn upsert_sample(&self, m: &DailyMeasurement) -> AppResult<bool> {
        // xmax is zero only for a freshly inserted tuple
        let inserted = sqlx::query_scalar::<_, bool>(
            r#"
            INSERT INTO weather_data (
                date, latitude, longitude, precipitation, temperature,
                temperature_max, temperature_min, relative_humidity, wind_speed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (date) DO UPDATE SET
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                precipitation = EXCLUDED.precipitation,
                temperature = EXCLUDED.temperature,
                temperature_max = EXCLUDED.temperature_max,
                temperature_min = EXCLUDED.temperature_min,
                relative_humidity = EXCLUDED.relative_humidity,
                wind_speed = EXCLUDED.wind_speed,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(m.date)
        .bind(m.latitude)
        .bind(m.longitude)
        .bind(m.precipitation)
        .bind(m.temperature)
        .bind(m.temperature_max)
        .bind(m.temperature_min)
        .bind(m.relative_humidity)
        .bind(m.wind_speed)
        .fetch_one(&self.db)
        .await?;

        Ok(inserted)
    }

    async fn list_samples(&self, filter: &SampleFilter) -> AppResult<Vec<WeatherSample>> {
        let sql = format!(
            r#"
            SELECT {SAMPLE_COLUMNS}
            FROM weather_data
            WHERE ($1::date IS NULL OR date >= $1)
              AND ($2::date IS NULL OR date <= $2)
              AND ($3::int IS NULL OR EXTRACT(YEAR FROM date)::int = $3)
              AND ($4::int IS NULL OR EXTRACT(MONTH FROM date)::int = $4)
            ORDER BY date DESC
            "#
        );

        let rows = sqlx::query_as::<_, SampleRow>(&sql)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(filter.year)
            .bind(filter.month.map(|m| m as i32))
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(WeatherSample::from).collect())
    }

    async fn samples_for_month(&self, year: i32, month: u32) -> AppResult<Vec<WeatherSample>> {
        let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Ok(Vec::new());
        };
        let Some(end) = start.checked_add_months(Months::new(1)) else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT {SAMPLE_COLUMNS} FROM weather_data WHERE date >= $1 AND date < $2 ORDER BY date"
        );
        let rows = sqlx::query_as::<_, SampleRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(WeatherSample::from).collect())
    }

    async fn upsert_prediction(&self, p: &NewMonthlyPrediction) -> AppResult<MonthlyPrediction> {
        let sql = format!(
            r#"
            INSERT INTO weather_predictions (
                date, year, month, condition, severity, monthly_precipitation,
                avg_temperature, avg_humidity, confidence_score, description, recommendations
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (year, month) DO UPDATE SET
                date = EXCLUDED.date,
                condition = EXCLUDED.condition,
                severity = EXCLUDED.severity,
                monthly_precipitation = EXCLUDED.monthly_precipitation,
                avg_temperature = EXCLUDED.avg_temperature,
                avg_humidity = EXCLUDED.avg_humidity,
                confidence_score = EXCLUDED.confidence_score,
                description = EXCLUDED.description,
                recommendations = EXCLUDED.recommendations
            RETURNING {PREDICTION_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, PredictionRow>(&sql)
            .bind(p.date)
            .bind(p.year)
            .bind(p.month as i32)
            .bind(p.condition.as_str())
            .bind(p.severity.as_str())
            .bind(p.monthly_precipitation)
            .bind(p.avg_temperature)
            .bind(p.avg_humidity)
            .bind(p.confidence_score)
            .bind(&p.description)
            .bind(&p.recommendations)
            .fetch_one(&self.db)
            .await?;

        row.try_into()
    }

    async fn get_prediction(&self, year: i32, month: u32) -> AppResult<Option<MonthlyPrediction>> {
        let sql = format!("SELECT {PREDICTION_COLUMNS} FROM weather_predictions WHERE year = $1 AND month = $2");
        sqlx::query_as::<_, PredictionRow>(&sql)
            .bind(year)
            .bind(month as i32)
            .fetch_optional(&self.db)
            .await?
            .map(MonthlyPrediction::try_from)
            .transpose()
    }

    async fn list_predictions(&self, filter: &PredictionFilter) -> AppResult<Vec<MonthlyPrediction>> {
        let sql = format!(
            r#"
            SELECT {PREDICTION_COLUMNS}
            FROM weather_predictions
            WHERE ($1::int IS NULL OR year = $1)
              AND ($2::int IS NULL OR month = $2)
              AND ($3::text IS NULL OR condition = $3)
              AND ($4::text IS NULL OR severity = $4)
            ORDER BY date DESC
            "#
        );

        let rows = sqlx::query_as::<_, PredictionRow>(&sql)
            .bind(filter.year)
            .bind(filter.month.map(|m| m as i32))
            .bind(filter.condition.map(|c| c.as_str()))
            .bind(filter.severity.map(|s| s.as_str()))
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(MonthlyPrediction::try_from).collect()
    }

    async fn upsert_forecast(&self, f: &NewYearlyForecast) -> AppResult<YearlyForecast> {
        let sql = format!(
            r#"
            INSERT INTO yearly_forecasts (
                year, total_precipitation, avg_temperature, drought_months,
                flood_risk_months, normal_months, overall_risk_level, summary
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (year) DO UPDATE SET
                total_precipitation = EXCLUDED.total_precipitation,
                avg_temperature = EXCLUDED.avg_temperature,
                drought_months = EXCLUDED.drought_months,
                flood_risk_months = EXCLUDED.flood_risk_months,
                normal_months = EXCLUDED.normal_months,
                overall_risk_level = EXCLUDED.overall_risk_level,
                summary = EXCLUDED.summary,
                updated_at = NOW()
            RETURNING {FORECAST_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ForecastRow>(&sql)
            .bind(f.year)
            .bind(f.total_precipitation)
            .bind(f.avg_temperature)
            .bind(f.drought_months as i32)
            .bind(f.flood_risk_months as i32)
            .bind(f.normal_months as i32)
            .bind(f.overall_risk_level.as_str())
            .bind(&f.summary)
            .fetch_one(&self.db)
            .await?;

        row.try_into()
    }

    async fn get_forecast(&self, year: i32) -> AppResult<Option<YearlyForecast>> {
        let sql = format!("SELECT {FORECAST_COLUMNS} FROM yearly_forecasts WHERE year = $1");
        sqlx::query_as::<_, ForecastRow>(&sql)
            .bind(year)
            .fetch_optional(&self.db)
            .await?
            .map(YearlyForecast::try_from)
            .transpose()
    }

    async fn forecasts_for_years(&self, years: &[i32]) -> AppResult<Vec<YearlyForecast>> {
        let sql = format!("SELECT {FORECAST_COLUMNS} FROM yearly_forecasts WHERE year = ANY($1) ORDER BY year");
        let rows = sqlx::query_as::<_, ForecastRow>(&sql)
            .bind(years)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(YearlyForecast::try_from).collect()
    }

    async fn list_forecasts(&self) -> AppResult<Vec<YearlyForecast>> {
        let sql = format!("SELECT {FORECAST_COLUMNS} FROM yearly_forecasts ORDER BY year DESC");
        let rows = sqlx::query_as::<_, ForecastRow>(&sql).fetch_all(&self.db).await?;

        rows.into_iter().map(YearlyForecast::try_from).collect()
    }
}
