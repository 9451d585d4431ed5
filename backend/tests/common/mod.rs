//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use risk_forecast_backend::config::{DatabaseConfig, PowerConfig, RegionConfig, ServerConfig};
use risk_forecast_backend::store::{MemoryWeatherStore, WeatherStore};
use risk_forecast_backend::{AppState, Config};
use rust_decimal::Decimal;
use shared::{ClassificationThresholds, DailyMeasurement};

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Configuration whose provider URL points at a closed local port
pub fn test_config() -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "postgres://localhost/risk_test".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        power: PowerConfig {
            base_url: "http://127.0.0.1:9/api/temporal/daily/point".to_string(),
            timeout_secs: 2,
            ..PowerConfig::default()
        },
        region: RegionConfig::default(),
        thresholds: ClassificationThresholds::default(),
    }
}

pub fn memory_state() -> (Arc<MemoryWeatherStore>, AppState) {
    let store = Arc::new(MemoryWeatherStore::new());
    let state = AppState::new(store.clone(), test_config()).unwrap();
    (store, state)
}

/// State whose provider client targets `base_url`
pub fn memory_state_with_provider(base_url: &str) -> (Arc<MemoryWeatherStore>, AppState) {
    let mut config = test_config();
    config.power.base_url = base_url.to_string();
    let store = Arc::new(MemoryWeatherStore::new());
    let state = AppState::new(store.clone(), config).unwrap();
    (store, state)
}

pub fn measurement(day: NaiveDate, precipitation: &str, temperature: &str, humidity: &str) -> DailyMeasurement {
    DailyMeasurement {
        date: day,
        latitude: dec("3.1191"),
        longitude: dec("35.5973"),
        precipitation: dec(precipitation),
        temperature: dec(temperature),
        temperature_max: dec(temperature) + Decimal::from(5),
        temperature_min: dec(temperature) - Decimal::from(5),
        relative_humidity: dec(humidity),
        wind_speed: dec("3.0"),
    }
}

/// Store `days` consecutive samples from the first of the month
pub async fn seed_month(
    store: &dyn WeatherStore,
    year: i32,
    month: u32,
    days: u32,
    precipitation: &str,
    temperature: &str,
) {
    for day in 1..=days {
        store
            .upsert_sample(&measurement(date(year, month, day), precipitation, temperature, "40"))
            .await
            .unwrap();
    }
}
