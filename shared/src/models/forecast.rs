//! Yearly risk forecast models and rollup rules

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::prediction::{one_decimal, ConditionCategory, MonthlyPrediction, ParseEnumError};

/// Year-level urgency derived from month counts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Ordered rule, first match wins
    pub fn from_counts(drought_months: u32, flood_months: u32) -> Self {
        if drought_months >= 6 || flood_months >= 3 {
            RiskLevel::Critical
        } else if drought_months >= 4 || flood_months >= 2 {
            RiskLevel::High
        } else if drought_months >= 2 || flood_months >= 1 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            other => Err(ParseEnumError {
                kind: "risk level",
                value: other.to_string(),
            }),
        }
    }
}

/// Stored annual forecast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearlyForecast {
    pub id: Uuid,
    pub year: i32,
    pub total_precipitation: Decimal,
    pub avg_temperature: Decimal,
    pub drought_months: u32,
    pub flood_risk_months: u32,
    pub normal_months: u32,
    pub overall_risk_level: RiskLevel,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by a yearly forecast upsert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewYearlyForecast {
    pub year: i32,
    pub total_precipitation: Decimal,
    pub avg_temperature: Decimal,
    pub drought_months: u32,
    pub flood_risk_months: u32,
    pub normal_months: u32,
    pub overall_risk_level: RiskLevel,
    pub summary: String,
}

/// Aggregates of one year's monthly predictions
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyRollup {
    pub months_covered: usize,
    pub total_precipitation: Decimal,
    /// Mean of the monthly means, not weighted by sample count
    pub avg_temperature: Decimal,
    pub drought_months: u32,
    pub flood_risk_months: u32,
    pub normal_months: u32,
    pub risk_level: RiskLevel,
}

impl YearlyRollup {
    /// Returns `None` for an empty slice. Months without a prediction are
    /// simply absent from every count and aggregate.
    pub fn from_predictions(predictions: &[MonthlyPrediction]) -> Option<Self> {
        if predictions.is_empty() {
            return None;
        }

        let total_precipitation: Decimal = predictions.iter().map(|p| p.monthly_precipitation).sum();
        let temperature_sum: Decimal = predictions.iter().map(|p| p.avg_temperature).sum();
        let avg_temperature = temperature_sum / Decimal::from(predictions.len());

        let count = |category: ConditionCategory| {
            predictions
                .iter()
                .filter(|p| p.condition.category() == category)
                .count() as u32
        };
        let drought_months = count(ConditionCategory::Drought);
        let flood_risk_months = count(ConditionCategory::Flood);
        let normal_months = count(ConditionCategory::Normal);

        Some(Self {
            months_covered: predictions.len(),
            total_precipitation,
            avg_temperature,
            drought_months,
            flood_risk_months,
            normal_months,
            risk_level: RiskLevel::from_counts(drought_months, flood_risk_months),
        })
    }

    /// Narrative summary for the forecast record
    pub fn summary(&self, region: &str, year: i32) -> String {
        let outlook = if self.drought_months > self.flood_risk_months {
            "The year is expected to be predominantly dry with significant drought risk. \
             Water conservation and drought preparedness are critical priorities."
        } else if self.flood_risk_months > self.drought_months {
            "Elevated flood risk is expected during certain months. \
             Flood preparedness and infrastructure monitoring are essential."
        } else {
            "Mixed weather conditions expected. Maintain balanced preparedness for both \
             drought and flood scenarios."
        };

        format!(
            "Weather Forecast Summary for {region} - {year}\n\n\
             Overall Risk Level: {risk}\n\n\
             Annual Precipitation: {precip}mm\n\
             Drought-affected months: {drought}\n\
             Flood risk months: {flood}\n\
             Normal conditions months: {normal}\n\n\
             {outlook}",
            risk = self.risk_level.as_str().to_uppercase(),
            precip = one_decimal(self.total_precipitation),
            drought = self.drought_months,
            flood = self.flood_risk_months,
            normal = self.normal_months,
        )
    }

    pub fn into_forecast(self, region: &str, year: i32) -> NewYearlyForecast {
        let summary = self.summary(region, year);
        NewYearlyForecast {
            year,
            total_precipitation: self.total_precipitation,
            avg_temperature: self.avg_temperature,
            drought_months: self.drought_months,
            flood_risk_months: self.flood_risk_months,
            normal_months: self.normal_months,
            overall_risk_level: self.risk_level,
            summary,
        }
    }
}
