//! NASA POWER client for daily point weather
//!
//! Fetches the daily parameter grid for the configured region and turns the
//! raw JSON payload into per-day measurements.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shared::{DailyMeasurement, GpsCoordinates};

use crate::config::PowerConfig;
use crate::error::{AppError, AppResult};

pub const PRECIPITATION: &str = "PRECTOTCORR";
pub const TEMPERATURE: &str = "T2M";
pub const TEMPERATURE_MAX: &str = "T2M_MAX";
pub const TEMPERATURE_MIN: &str = "T2M_MIN";
pub const RELATIVE_HUMIDITY: &str = "RH2M";
pub const WIND_SPEED: &str = "WS2M";

const DATE_KEY_FORMAT: &str = "%Y%m%d";

/// NASA POWER API client
#[derive(Clone)]
pub struct NasaPowerClient {
    client: Client,
    base_url: String,
    community: String,
    parameters: Vec<String>,
    coordinates: GpsCoordinates,
}

/// Measurements decoded from one payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyGrid {
    pub measurements: Vec<DailyMeasurement>,
    /// Date keys that were not `YYYYMMDD`
    pub skipped_keys: Vec<String>,
}

impl NasaPowerClient {
    /// Create a client for the configured endpoint and region
    pub fn new(config: &PowerConfig, coordinates: GpsCoordinates) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            community: config.community.clone(),
            parameters: config.parameters.clone(),
            coordinates,
        })
    }

    /// Create a client with custom base URL (for testing)
    pub fn with_base_url(base_url: String, coordinates: GpsCoordinates) -> AppResult<Self> {
        let config = PowerConfig {
            base_url,
            ..PowerConfig::default()
        };
        Self::new(&config, coordinates)
    }

    pub fn coordinates(&self) -> &GpsCoordinates {
        &self.coordinates
    }

    /// Fetch the raw daily payload for an inclusive date range
    pub async fn fetch_daily(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Value> {
        let query = [
            ("parameters", self.parameters.join(",")),
            ("community", self.community.clone()),
            ("longitude", self.coordinates.longitude.to_string()),
            ("latitude", self.coordinates.latitude.to_string()),
            ("start", start.format(DATE_KEY_FORMAT).to_string()),
            ("end", end.format(DATE_KEY_FORMAT).to_string()),
            ("format", "JSON".to_string()),
        ];

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("NASA POWER request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "NASA POWER error: {} - {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse NASA POWER response: {}", e)))
    }
}

/// POWER daily point response. Only the parameter grid is read.
#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    /// Parameter name to `YYYYMMDD` key to value
    parameter: BTreeMap<String, BTreeMap<String, Option<f64>>>,
}

/// Decode `properties.parameter` into daily measurements.
///
/// Dates come from the precipitation series. Any other parameter missing a
/// value for that date reads as zero. Returns `None` when the payload does
/// not have the expected shape.
pub fn parse_daily_payload(payload: &Value, coordinates: &GpsCoordinates) -> Option<DailyGrid> {
    let response = PowerResponse::deserialize(payload).ok()?;
    let parameters = response.properties.parameter;
    let precipitation = parameters.get(PRECIPITATION)?;

    let value_for = |name: &str, key: &str| -> Decimal {
        parameters
            .get(name)
            .and_then(|series| series.get(key).copied().flatten())
            .and_then(Decimal::from_f64)
            .unwrap_or_default()
    };

    let mut grid = DailyGrid::default();
    for key in precipitation.keys() {
        let Ok(date) = NaiveDate::parse_from_str(key, DATE_KEY_FORMAT) else {
            grid.skipped_keys.push(key.clone());
            continue;
        };

        grid.measurements.push(DailyMeasurement {
            date,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            precipitation: value_for(PRECIPITATION, key),
            temperature: value_for(TEMPERATURE, key),
            temperature_max: value_for(TEMPERATURE_MAX, key),
            temperature_min: value_for(TEMPERATURE_MIN, key),
            relative_humidity: value_for(RELATIVE_HUMIDITY, key),
            wind_speed: value_for(WIND_SPEED, key),
        });
    }

    Some(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn region() -> GpsCoordinates {
        GpsCoordinates::new(
            Decimal::from_str("3.1191").unwrap(),
            Decimal::from_str("35.5973").unwrap(),
        )
    }

    #[test]
    fn test_parse_full_payload() {
        let payload = json!({
            "properties": {
                "parameter": {
                    "PRECTOTCORR": {"20240101": 0.5, "20240102": 1.25},
                    "T2M": {"20240101": 32.0, "20240102": 31.5},
                    "T2M_MAX": {"20240101": 38.1, "20240102": 37.0},
                    "T2M_MIN": {"20240101": 24.3, "20240102": 23.9},
                    "RH2M": {"20240101": 40, "20240102": 41.5},
                    "WS2M": {"20240101": 3.2, "20240102": 2.8}
                }
            }
        });

        let grid = parse_daily_payload(&payload, &region()).unwrap();
        assert_eq!(grid.measurements.len(), 2);
        assert!(grid.skipped_keys.is_empty());

        let first = grid
            .measurements
            .iter()
            .find(|m| m.date == NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .unwrap();
        assert_eq!(first.precipitation, Decimal::from_str("0.5").unwrap());
        assert_eq!(first.temperature, Decimal::from(32));
        assert_eq!(first.relative_humidity, Decimal::from(40));
        assert_eq!(first.wind_speed, Decimal::from_str("3.2").unwrap());
        assert_eq!(first.latitude, region().latitude);
    }

    #[test]
    fn test_missing_parameter_defaults_to_zero() {
        let payload = json!({
            "properties": {
                "parameter": {
                    "PRECTOTCORR": {"20240101": 2.0},
                    "T2M": {}
                }
            }
        });

        let grid = parse_daily_payload(&payload, &region()).unwrap();
        let day = &grid.measurements[0];
        assert_eq!(day.precipitation, Decimal::from(2));
        assert_eq!(day.temperature, Decimal::ZERO);
        assert_eq!(day.temperature_max, Decimal::ZERO);
        assert_eq!(day.wind_speed, Decimal::ZERO);
    }

    #[test]
    fn test_malformed_payload() {
        assert!(parse_daily_payload(&json!({}), &region()).is_none());
        assert!(parse_daily_payload(&json!({"properties": {}}), &region()).is_none());
        assert!(parse_daily_payload(&json!({"properties": {"parameter": {"T2M": {}}}}), &region()).is_none());
        assert!(parse_daily_payload(&json!({"properties": {"parameter": []}}), &region()).is_none());
    }

    #[test]
    fn test_bad_date_keys_are_skipped() {
        let payload = json!({
            "properties": {
                "parameter": {
                    "PRECTOTCORR": {"20240101": 1.0, "2024-01-02": 1.0, "20241301": 1.0}
                }
            }
        });

        let grid = parse_daily_payload(&payload, &region()).unwrap();
        assert_eq!(grid.measurements.len(), 1);
        assert_eq!(grid.skipped_keys.len(), 2);
    }

    #[test]
    fn test_null_values_read_as_zero() {
        let payload = json!({
            "properties": {
                "parameter": {
                    "PRECTOTCORR": {"20240101": null, "20240102": 3},
                    "T2M": {"20240101": 30.5, "20240102": null}
                }
            }
        });

        let grid = parse_daily_payload(&payload, &region()).unwrap();
        assert_eq!(grid.measurements.len(), 2);
        assert_eq!(grid.measurements[0].precipitation, Decimal::ZERO);
        assert_eq!(grid.measurements[0].temperature, Decimal::from_str("30.5").unwrap());
        assert_eq!(grid.measurements[1].precipitation, Decimal::from(3));
        assert_eq!(grid.measurements[1].temperature, Decimal::ZERO);
    }

    #[test]
    fn test_non_numeric_series_is_malformed() {
        let payload = json!({
            "properties": {"parameter": {"PRECTOTCORR": {"20240101": "wet"}}}
        });
        assert!(parse_daily_payload(&payload, &region()).is_none());
    }

    #[test]
    fn test_fill_values_pass_through() {
        let payload = json!({
            "properties": {"parameter": {"PRECTOTCORR": {"20240101": -999.0}}}
        });

        let grid = parse_daily_payload(&payload, &region()).unwrap();
        assert_eq!(grid.measurements[0].precipitation, Decimal::from(-999));
    }
}
