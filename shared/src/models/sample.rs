//! Daily weather sample models

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One calendar day of measured weather for the monitored region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSample {
    pub id: Uuid,
    pub date: NaiveDate,
    pub latitude: Decimal,
    pub longitude: Decimal,
    /// Corrected total precipitation (mm/day)
    pub precipitation: Decimal,
    /// Mean temperature at 2m (°C)
    pub temperature: Decimal,
    pub temperature_max: Decimal,
    pub temperature_min: Decimal,
    /// Relative humidity at 2m (%)
    pub relative_humidity: Decimal,
    /// Wind speed at 2m (m/s)
    pub wind_speed: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Measured fields for a sample upsert, keyed by `date`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyMeasurement {
    pub date: NaiveDate,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub precipitation: Decimal,
    pub temperature: Decimal,
    pub temperature_max: Decimal,
    pub temperature_min: Decimal,
    pub relative_humidity: Decimal,
    pub wind_speed: Decimal,
}

/// Filter for listing stored samples
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl SampleFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
            && self.year.map_or(true, |year| date.year() == year)
            && self.month.map_or(true, |month| date.month() == month)
    }
}
