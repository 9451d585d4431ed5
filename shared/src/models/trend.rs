//! Multi-year trend comparison

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::forecast::YearlyForecast;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    /// Ties report `Decreasing`
    pub fn between(first: u32, last: u32) -> Self {
        if last > first {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrendError {
    #[error("cannot compute trend: baseline precipitation for {year} is zero")]
    ZeroBaseline { year: i32 },
}

/// Deltas between the earliest and latest forecast of a comparison
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendSummary {
    pub from_year: i32,
    pub to_year: i32,
    pub precipitation_change_percent: Decimal,
    pub temperature_change_celsius: Decimal,
    pub drought_trend: TrendDirection,
    pub flood_trend: TrendDirection,
}

impl TrendSummary {
    pub fn between(first: &YearlyForecast, last: &YearlyForecast) -> Result<Self, TrendError> {
        if first.total_precipitation.is_zero() {
            return Err(TrendError::ZeroBaseline { year: first.year });
        }

        let precipitation_change = (last.total_precipitation - first.total_precipitation)
            / first.total_precipitation
            * Decimal::ONE_HUNDRED;
        let temperature_change = last.avg_temperature - first.avg_temperature;

        Ok(Self {
            from_year: first.year,
            to_year: last.year,
            precipitation_change_percent: precipitation_change.round_dp(2),
            temperature_change_celsius: temperature_change.round_dp(2),
            drought_trend: TrendDirection::between(first.drought_months, last.drought_months),
            flood_trend: TrendDirection::between(first.flood_risk_months, last.flood_risk_months),
        })
    }
}

/// Forecasts for the requested years plus the trend across them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearComparison {
    pub years_compared: usize,
    pub forecasts: Vec<YearlyForecast>,
    /// `None` when fewer than two forecasts were found
    pub trends: Option<TrendSummary>,
}

impl YearComparison {
    /// Sorts by year ascending; only the first and last forecast feed the
    /// trend, intermediate years are listed but not compared.
    pub fn build(mut forecasts: Vec<YearlyForecast>) -> Result<Self, TrendError> {
        forecasts.sort_by_key(|f| f.year);

        let trends = match (forecasts.first(), forecasts.last()) {
            (Some(first), Some(last)) if forecasts.len() >= 2 => {
                Some(TrendSummary::between(first, last)?)
            }
            _ => None,
        };

        Ok(Self {
            years_compared: forecasts.len(),
            forecasts,
            trends,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::RiskLevel;
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn forecast(year: i32, precip: &str, temp: &str, drought: u32, flood: u32) -> YearlyForecast {
        YearlyForecast {
            id: Uuid::new_v4(),
            year,
            total_precipitation: dec(precip),
            avg_temperature: dec(temp),
            drought_months: drought,
            flood_risk_months: flood,
            normal_months: 12 - drought - flood,
            overall_risk_level: RiskLevel::from_counts(drought, flood),
            summary: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_trend_precipitation_increase() {
        let first = forecast(2020, "100", "29.5", 1, 0);
        let last = forecast(2024, "150", "30.25", 4, 0);
        let trend = TrendSummary::between(&first, &last).unwrap();

        assert_eq!(trend.precipitation_change_percent, dec("50.00"));
        assert_eq!(trend.temperature_change_celsius, dec("0.75"));
        assert_eq!(trend.drought_trend, TrendDirection::Increasing);
        assert_eq!(trend.flood_trend, TrendDirection::Decreasing);
    }

    #[test]
    fn test_trend_ties_report_decreasing() {
        let first = forecast(2020, "100", "30", 2, 1);
        let last = forecast(2021, "100", "30", 2, 1);
        let trend = TrendSummary::between(&first, &last).unwrap();
        assert_eq!(trend.drought_trend, TrendDirection::Decreasing);
        assert_eq!(trend.flood_trend, TrendDirection::Decreasing);
        assert_eq!(trend.precipitation_change_percent, Decimal::ZERO);
    }

    #[test]
    fn test_trend_rounds_to_two_places() {
        let first = forecast(2020, "300", "30", 0, 0);
        let last = forecast(2021, "200", "28.123", 0, 0);
        let trend = TrendSummary::between(&first, &last).unwrap();
        assert_eq!(trend.precipitation_change_percent, dec("-33.33"));
        assert_eq!(trend.temperature_change_celsius, dec("-1.88"));
    }

    #[test]
    fn test_trend_zero_baseline_fails() {
        let first = forecast(2020, "0", "30", 12, 0);
        let last = forecast(2021, "120", "30", 0, 0);
        assert_eq!(
            TrendSummary::between(&first, &last),
            Err(TrendError::ZeroBaseline { year: 2020 })
        );
    }

    #[test]
    fn test_comparison_sorts_and_uses_endpoints_only() {
        let forecasts = vec![
            forecast(2024, "150", "30", 4, 0),
            forecast(2022, "900", "10", 0, 9),
            forecast(2020, "100", "30", 1, 0),
        ];
        let comparison = YearComparison::build(forecasts).unwrap();

        let years: Vec<i32> = comparison.forecasts.iter().map(|f| f.year).collect();
        assert_eq!(years, vec![2020, 2022, 2024]);
        assert_eq!(comparison.years_compared, 3);

        let trend = comparison.trends.unwrap();
        assert_eq!(trend.from_year, 2020);
        assert_eq!(trend.to_year, 2024);
        assert_eq!(trend.precipitation_change_percent, dec("50"));
        assert_eq!(trend.flood_trend, TrendDirection::Decreasing);
    }

    #[test]
    fn test_comparison_single_year_has_no_trend() {
        let comparison = YearComparison::build(vec![forecast(2020, "0", "30", 12, 0)]).unwrap();
        assert_eq!(comparison.years_compared, 1);
        assert!(comparison.trends.is_none());

        let empty = YearComparison::build(Vec::new()).unwrap();
        assert_eq!(empty.years_compared, 0);
        assert!(empty.trends.is_none());
    }

    #[test]
    fn test_trend_direction_serializes_lowercase() {
        let json = serde_json::to_string(&TrendDirection::Increasing).unwrap();
        assert_eq!(json, "\"increasing\"");
    }
}
