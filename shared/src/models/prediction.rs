//! Monthly drought/flood condition models and classification rules

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

use super::sample::WeatherSample;

/// Days assumed per month when scoring data completeness
pub const EXPECTED_DAYS_PER_MONTH: u32 = 30;

/// Classified condition of a month
///
/// Discriminants index into the condition text table, keep them in sync.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Normal = 0,
    MildDrought = 1,
    ModerateDrought = 2,
    SevereDrought = 3,
    ModerateFlood = 4,
    SevereFlood = 5,
    ExtremeFlood = 6,
}

/// Coarse grouping of conditions used for yearly counts and alert listings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Drought,
    Flood,
    Normal,
}

/// Urgency tier attached to a condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Unknown enum name while parsing stored or requested values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

struct ConditionText {
    condition: Condition,
    label: &'static str,
    description: &'static str,
    recommendations: &'static str,
}

// Placeholders: {precipitation}, {temperature}, {humidity}
static CONDITION_TEXT: [ConditionText; 7] = [
    ConditionText {
        condition: Condition::Normal,
        label: "Normal",
        description: "Normal weather conditions. Rainfall at {precipitation}mm with temperature averaging {temperature}°C.",
        recommendations: "• Maintain regular monitoring of weather patterns\n\
                          • Continue normal agricultural and pastoral activities\n\
                          • Keep emergency preparedness plans updated",
    },
    ConditionText {
        condition: Condition::MildDrought,
        label: "Mild Drought",
        description: "Mild drought conditions observed. Rainfall at {precipitation}mm is below normal.",
        recommendations: "• Monitor rainfall patterns closely\n\
                          • Prepare for potential water shortages\n\
                          • Promote water conservation awareness",
    },
    ConditionText {
        condition: Condition::ModerateDrought,
        label: "Moderate Drought",
        description: "Moderate drought conditions with {precipitation}mm of rainfall. Temperature averaging {temperature}°C.",
        recommendations: "• Begin water conservation efforts\n\
                          • Monitor water sources and livestock health\n\
                          • Prepare drought response plans\n\
                          • Advise farmers on water-efficient practices",
    },
    ConditionText {
        condition: Condition::SevereDrought,
        label: "Severe Drought",
        description: "Severe drought conditions detected with only {precipitation}mm of rainfall. Average temperature of {temperature}°C with {humidity}% humidity.",
        recommendations: "• Implement water conservation measures immediately\n\
                          • Provide emergency water supplies to affected areas\n\
                          • Support livestock with supplementary feed and water\n\
                          • Monitor crop health and consider drought-resistant varieties",
    },
    ConditionText {
        condition: Condition::ModerateFlood,
        label: "Moderate Flood Risk",
        description: "Moderate flood risk detected. Rainfall of {precipitation}mm above normal levels.",
        recommendations: "• Issue flood watch advisories\n\
                          • Inspect drainage infrastructure\n\
                          • Prepare emergency response if needed",
    },
    ConditionText {
        condition: Condition::SevereFlood,
        label: "Severe Flood Risk",
        description: "Severe flood risk with {precipitation}mm of rainfall. Potential for flooding in low-lying areas.",
        recommendations: "• Issue flood alerts to affected communities\n\
                          • Prepare emergency shelters and supplies\n\
                          • Clear drainage systems\n\
                          • Monitor vulnerable areas",
    },
    ConditionText {
        condition: Condition::ExtremeFlood,
        label: "Extreme Flood Risk",
        description: "Extreme flood risk! Excessive rainfall of {precipitation}mm recorded. Immediate precautions recommended.",
        recommendations: "• Issue immediate flood warnings\n\
                          • Evacuate low-lying areas if necessary\n\
                          • Activate emergency response teams\n\
                          • Monitor water levels and weather updates continuously",
    },
];

// Indexed by Severity as usize
static SEVERITY_TEXT: [(&str, &str); 4] = [
    ("Low", "✓ LOW RISK: Normal monitoring sufficient"),
    ("Medium", "⚡ MODERATE ALERT: Monitor situation closely"),
    ("High", "⚠️ HIGH ALERT: Urgent attention needed"),
    ("Critical", "🚨 CRITICAL ALERT: Immediate action required!"),
];

impl Condition {
    pub const ALL: [Condition; 7] = [
        Condition::Normal,
        Condition::MildDrought,
        Condition::ModerateDrought,
        Condition::SevereDrought,
        Condition::ModerateFlood,
        Condition::SevereFlood,
        Condition::ExtremeFlood,
    ];

    fn text(self) -> &'static ConditionText {
        &CONDITION_TEXT[self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Normal => "normal",
            Condition::MildDrought => "mild_drought",
            Condition::ModerateDrought => "moderate_drought",
            Condition::SevereDrought => "severe_drought",
            Condition::ModerateFlood => "moderate_flood",
            Condition::SevereFlood => "severe_flood",
            Condition::ExtremeFlood => "extreme_flood",
        }
    }

    /// Human-readable name, e.g. "Severe Flood Risk"
    pub fn label(&self) -> &'static str {
        self.text().label
    }

    pub fn category(&self) -> ConditionCategory {
        match self {
            Condition::MildDrought | Condition::ModerateDrought | Condition::SevereDrought => {
                ConditionCategory::Drought
            }
            Condition::ModerateFlood | Condition::SevereFlood | Condition::ExtremeFlood => {
                ConditionCategory::Flood
            }
            Condition::Normal => ConditionCategory::Normal,
        }
    }

    /// Render the description template with the month's aggregates
    pub fn describe(&self, precipitation: Decimal, temperature: Decimal, humidity: Decimal) -> String {
        self.text()
            .description
            .replace("{precipitation}", &one_decimal(precipitation))
            .replace("{temperature}", &one_decimal(temperature))
            .replace("{humidity}", &one_decimal(humidity))
    }

    pub fn recommendations(&self) -> &'static str {
        self.text().recommendations
    }
}

/// Render with one decimal place, halves rounded away from zero.
/// `Decimal`'s precision formatting alone truncates.
pub fn one_decimal(value: Decimal) -> String {
    format!(
        "{:.1}",
        value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Condition {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "condition",
                value: s.to_string(),
            })
    }
}

impl ConditionCategory {
    pub fn conditions(&self) -> Vec<Condition> {
        Condition::ALL
            .into_iter()
            .filter(|c| c.category() == *self)
            .collect()
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub fn label(&self) -> &'static str {
        SEVERITY_TEXT[*self as usize].0
    }

    /// Alert banner shown alongside the current month's conditions
    pub fn alert_message(&self) -> &'static str {
        SEVERITY_TEXT[*self as usize].1
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(ParseEnumError {
                kind: "severity",
                value: other.to_string(),
            }),
        }
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// Monthly precipitation cutoffs (mm) below which a month is in drought
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DroughtThresholds {
    pub severe: Decimal,
    pub moderate: Decimal,
    pub mild: Decimal,
}

/// Monthly precipitation cutoffs (mm) above which a month carries flood risk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FloodThresholds {
    pub moderate: Decimal,
    pub severe: Decimal,
    pub extreme: Decimal,
}

/// Full set of precipitation bands used by the monthly classifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationThresholds {
    pub drought: DroughtThresholds,
    pub flood: FloodThresholds,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThresholdError {
    #[error("drought thresholds must satisfy severe < moderate < mild")]
    DroughtOrder,
    #[error("flood thresholds must satisfy moderate < severe < extreme")]
    FloodOrder,
    #[error("mild drought threshold must not exceed moderate flood threshold")]
    Overlap,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            drought: DroughtThresholds {
                severe: Decimal::from(10),
                moderate: Decimal::from(25),
                mild: Decimal::from(50),
            },
            flood: FloodThresholds {
                moderate: Decimal::from(150),
                severe: Decimal::from(250),
                extreme: Decimal::from(350),
            },
        }
    }
}

impl ClassificationThresholds {
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let d = &self.drought;
        let f = &self.flood;
        if !(d.severe < d.moderate && d.moderate < d.mild) {
            return Err(ThresholdError::DroughtOrder);
        }
        if !(f.moderate < f.severe && f.severe < f.extreme) {
            return Err(ThresholdError::FloodOrder);
        }
        if d.mild > f.moderate {
            return Err(ThresholdError::Overlap);
        }
        Ok(())
    }

    /// Classify a monthly precipitation total. Drought bands are checked
    /// before flood bands; all comparisons are strict.
    pub fn classify(&self, precipitation: Decimal) -> (Condition, Severity) {
        let d = &self.drought;
        let f = &self.flood;

        if precipitation < d.severe {
            (Condition::SevereDrought, Severity::Critical)
        } else if precipitation < d.moderate {
            (Condition::ModerateDrought, Severity::High)
        } else if precipitation < d.mild {
            (Condition::MildDrought, Severity::Medium)
        } else if precipitation > f.extreme {
            (Condition::ExtremeFlood, Severity::Critical)
        } else if precipitation > f.severe {
            (Condition::SevereFlood, Severity::High)
        } else if precipitation > f.moderate {
            (Condition::ModerateFlood, Severity::Medium)
        } else {
            (Condition::Normal, Severity::Low)
        }
    }
}

// ============================================================================
// Monthly aggregation
// ============================================================================

/// Exact aggregates over the samples present for one month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAggregate {
    pub sample_count: usize,
    pub total_precipitation: Decimal,
    pub avg_temperature: Decimal,
    pub avg_humidity: Decimal,
}

impl MonthlyAggregate {
    /// Returns `None` when there are no samples
    pub fn from_samples<'a, I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a WeatherSample>,
    {
        let mut count = 0usize;
        let mut precipitation = Decimal::ZERO;
        let mut temperature = Decimal::ZERO;
        let mut humidity = Decimal::ZERO;

        for sample in samples {
            count += 1;
            precipitation += sample.precipitation;
            temperature += sample.temperature;
            humidity += sample.relative_humidity;
        }

        if count == 0 {
            return None;
        }

        let n = Decimal::from(count);
        Some(Self {
            sample_count: count,
            total_precipitation: precipitation,
            avg_temperature: temperature / n,
            avg_humidity: humidity / n,
        })
    }

    /// Percentage of expected days present. Not clamped: a full 31-day month
    /// scores 103.33.
    pub fn confidence_score(&self) -> Decimal {
        confidence_score(self.sample_count)
    }
}

pub fn confidence_score(sample_count: usize) -> Decimal {
    (Decimal::from(sample_count) * Decimal::ONE_HUNDRED / Decimal::from(EXPECTED_DAYS_PER_MONTH))
        .round_dp(2)
}

// ============================================================================
// Monthly prediction records
// ============================================================================

/// Stored classification of one (year, month)
///
/// Serializes with `condition_display` and `severity_display` labels
/// alongside the stored fields.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MonthlyPrediction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub condition: Condition,
    pub severity: Severity,
    pub monthly_precipitation: Decimal,
    pub avg_temperature: Decimal,
    pub avg_humidity: Decimal,
    pub confidence_score: Decimal,
    pub description: String,
    pub recommendations: String,
    pub created_at: DateTime<Utc>,
}

impl Serialize for MonthlyPrediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MonthlyPrediction", 15)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("date", &self.date)?;
        state.serialize_field("year", &self.year)?;
        state.serialize_field("month", &self.month)?;
        state.serialize_field("condition", &self.condition)?;
        state.serialize_field("condition_display", self.condition.label())?;
        state.serialize_field("severity", &self.severity)?;
        state.serialize_field("severity_display", self.severity.label())?;
        state.serialize_field("monthly_precipitation", &self.monthly_precipitation)?;
        state.serialize_field("avg_temperature", &self.avg_temperature)?;
        state.serialize_field("avg_humidity", &self.avg_humidity)?;
        state.serialize_field("confidence_score", &self.confidence_score)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("recommendations", &self.recommendations)?;
        state.serialize_field("created_at", &self.created_at)?;
        state.end()
    }
}

/// Values written by a monthly prediction upsert
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMonthlyPrediction {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub condition: Condition,
    pub severity: Severity,
    pub monthly_precipitation: Decimal,
    pub avg_temperature: Decimal,
    pub avg_humidity: Decimal,
    pub confidence_score: Decimal,
    pub description: String,
    pub recommendations: String,
}

/// Filter for listing stored predictions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub condition: Option<Condition>,
    pub severity: Option<Severity>,
}

impl PredictionFilter {
    pub fn matches(&self, prediction: &MonthlyPrediction) -> bool {
        self.year.map_or(true, |y| prediction.year == y)
            && self.month.map_or(true, |m| prediction.month == m)
            && self.condition.map_or(true, |c| prediction.condition == c)
            && self.severity.map_or(true, |s| prediction.severity == s)
    }
}

/// Classify one month from its samples.
///
/// Samples outside (year, month) are ignored. Returns `None` when no sample
/// falls in the month or the month does not exist.
pub fn assess_month(
    year: i32,
    month: u32,
    samples: &[WeatherSample],
    thresholds: &ClassificationThresholds,
) -> Option<NewMonthlyPrediction> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    let aggregate = MonthlyAggregate::from_samples(
        samples
            .iter()
            .filter(|s| s.date.year() == year && s.date.month() == month),
    )?;

    let (condition, severity) = thresholds.classify(aggregate.total_precipitation);

    Some(NewMonthlyPrediction {
        date,
        year,
        month,
        condition,
        severity,
        monthly_precipitation: aggregate.total_precipitation,
        avg_temperature: aggregate.avg_temperature,
        avg_humidity: aggregate.avg_humidity,
        confidence_score: aggregate.confidence_score(),
        description: condition.describe(
            aggregate.total_precipitation,
            aggregate.avg_temperature,
            aggregate.avg_humidity,
        ),
        recommendations: condition.recommendations().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample(y: i32, m: u32, d: u32, precip: &str, temp: &str, humidity: &str) -> WeatherSample {
        let now = Utc::now();
        WeatherSample {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            latitude: dec("3.1191"),
            longitude: dec("35.5973"),
            precipitation: dec(precip),
            temperature: dec(temp),
            temperature_max: dec(temp) + Decimal::from(5),
            temperature_min: dec(temp) - Decimal::from(5),
            relative_humidity: dec(humidity),
            wind_speed: dec("3.2"),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_text_table_matches_discriminants() {
        for (index, entry) in CONDITION_TEXT.iter().enumerate() {
            assert_eq!(entry.condition as usize, index);
        }
        for condition in Condition::ALL {
            assert_eq!(condition.text().condition, condition);
        }
    }

    #[test]
    fn test_condition_round_trips_through_str() {
        for condition in Condition::ALL {
            assert_eq!(Condition::from_str(condition.as_str()), Ok(condition));
        }
        assert!(Condition::from_str("drizzle").is_err());
    }

    #[test]
    fn test_condition_categories() {
        assert_eq!(
            ConditionCategory::Drought.conditions(),
            vec![
                Condition::MildDrought,
                Condition::ModerateDrought,
                Condition::SevereDrought
            ]
        );
        assert_eq!(
            ConditionCategory::Flood.conditions(),
            vec![
                Condition::ModerateFlood,
                Condition::SevereFlood,
                Condition::ExtremeFlood
            ]
        );
        assert_eq!(ConditionCategory::Normal.conditions(), vec![Condition::Normal]);
    }

    #[test]
    fn test_classify_boundaries() {
        let t = ClassificationThresholds::default();

        // Exactly on a drought cutoff falls through to the next band
        assert_eq!(t.classify(dec("9.99")), (Condition::SevereDrought, Severity::Critical));
        assert_eq!(t.classify(dec("10")), (Condition::ModerateDrought, Severity::High));
        assert_eq!(t.classify(dec("25")), (Condition::MildDrought, Severity::Medium));
        assert_eq!(t.classify(dec("50")), (Condition::Normal, Severity::Low));

        // Exactly on a flood cutoff stays in the lower band
        assert_eq!(t.classify(dec("150")), (Condition::Normal, Severity::Low));
        assert_eq!(t.classify(dec("150.01")), (Condition::ModerateFlood, Severity::Medium));
        assert_eq!(t.classify(dec("250")), (Condition::ModerateFlood, Severity::Medium));
        assert_eq!(t.classify(dec("250.01")), (Condition::SevereFlood, Severity::High));
        assert_eq!(t.classify(dec("350")), (Condition::SevereFlood, Severity::High));
        assert_eq!(t.classify(dec("350.01")), (Condition::ExtremeFlood, Severity::Critical));
    }

    #[test]
    fn test_classify_drought_checked_before_flood() {
        // Misconfigured overlapping bands: drought still wins
        let t = ClassificationThresholds {
            drought: DroughtThresholds {
                severe: dec("10"),
                moderate: dec("20"),
                mild: dec("200"),
            },
            flood: FloodThresholds {
                moderate: dec("100"),
                severe: dec("150"),
                extreme: dec("180"),
            },
        };
        assert_eq!(t.classify(dec("190")).0, Condition::MildDrought);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(ClassificationThresholds::default().validate().is_ok());

        let mut t = ClassificationThresholds::default();
        t.drought.moderate = dec("5");
        assert_eq!(t.validate(), Err(ThresholdError::DroughtOrder));

        let mut t = ClassificationThresholds::default();
        t.flood.extreme = dec("200");
        assert_eq!(t.validate(), Err(ThresholdError::FloodOrder));

        let mut t = ClassificationThresholds::default();
        t.drought.mild = dec("160");
        assert_eq!(t.validate(), Err(ThresholdError::Overlap));
    }

    #[test]
    fn test_confidence_score_not_clamped() {
        assert_eq!(confidence_score(31), dec("103.33"));
        assert_eq!(confidence_score(30), dec("100"));
        assert_eq!(confidence_score(15), dec("50.00"));
        assert_eq!(confidence_score(1), dec("3.33"));
    }

    #[test]
    fn test_aggregate_empty_is_none() {
        assert!(MonthlyAggregate::from_samples(&Vec::<WeatherSample>::new()).is_none());
    }

    #[test]
    fn test_aggregate_sums_and_means() {
        let samples = vec![
            sample(2024, 3, 1, "2.5", "30", "40"),
            sample(2024, 3, 2, "0.5", "32", "50"),
            sample(2024, 3, 3, "3.0", "34", "60"),
        ];
        let agg = MonthlyAggregate::from_samples(&samples).unwrap();
        assert_eq!(agg.sample_count, 3);
        assert_eq!(agg.total_precipitation, dec("6.0"));
        assert_eq!(agg.avg_temperature, dec("32"));
        assert_eq!(agg.avg_humidity, dec("50"));
        assert_eq!(agg.confidence_score(), dec("10"));
    }

    #[test]
    fn test_assess_month_severe_drought_description() {
        let samples = vec![
            sample(2024, 1, 1, "2", "31", "20"),
            sample(2024, 1, 2, "3", "33", "30"),
        ];
        let prediction =
            assess_month(2024, 1, &samples, &ClassificationThresholds::default()).unwrap();

        assert_eq!(prediction.condition, Condition::SevereDrought);
        assert_eq!(prediction.severity, Severity::Critical);
        assert_eq!(prediction.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(prediction.description.contains("5.0mm"));
        assert!(prediction.description.contains("32.0°C"));
        assert!(prediction.description.contains("25.0% humidity"));
        assert!(prediction.recommendations.starts_with("• Implement water conservation"));
    }

    #[test]
    fn test_description_rounds_to_one_decimal() {
        let text = Condition::SevereDrought.describe(dec("4.96"), dec("31.96"), dec("24.99"));
        assert!(text.contains("only 5.0mm of rainfall"));
        assert!(text.contains("32.0°C"));
        assert!(text.contains("25.0% humidity"));
    }

    #[test]
    fn test_one_decimal() {
        assert_eq!(one_decimal(dec("0.05")), "0.1");
        assert_eq!(one_decimal(dec("4.94")), "4.9");
        assert_eq!(one_decimal(dec("-1.25")), "-1.3");
        assert_eq!(one_decimal(Decimal::from(240)), "240.0");
    }

    #[test]
    fn test_assess_month_ignores_other_months() {
        let samples = vec![
            sample(2024, 1, 31, "400", "25", "80"),
            sample(2024, 2, 1, "60", "25", "80"),
        ];
        let prediction =
            assess_month(2024, 2, &samples, &ClassificationThresholds::default()).unwrap();
        assert_eq!(prediction.monthly_precipitation, dec("60"));
        assert_eq!(prediction.condition, Condition::Normal);

        assert!(assess_month(2024, 3, &samples, &ClassificationThresholds::default()).is_none());
    }

    #[test]
    fn test_assess_month_rejects_invalid_month() {
        let samples = vec![sample(2024, 1, 1, "60", "25", "80")];
        assert!(assess_month(2024, 13, &samples, &ClassificationThresholds::default()).is_none());
    }

    #[test]
    fn test_prediction_json_carries_labels() {
        let stored = MonthlyPrediction {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            year: 2024,
            month: 3,
            condition: Condition::SevereFlood,
            severity: Severity::High,
            monthly_precipitation: dec("270"),
            avg_temperature: dec("27.5"),
            avg_humidity: dec("70"),
            confidence_score: dec("100"),
            description: String::new(),
            recommendations: String::new(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["condition"], "severe_flood");
        assert_eq!(json["condition_display"], Condition::SevereFlood.label());
        assert_eq!(json["severity"], "high");
        assert_eq!(json["severity_display"], "High");

        let back: MonthlyPrediction = serde_json::from_value(json).unwrap();
        assert_eq!(back, stored);
    }

    #[test]
    fn test_severity_alert_messages() {
        assert!(Severity::Critical.alert_message().contains("CRITICAL"));
        assert!(Severity::Low.alert_message().contains("LOW RISK"));
        assert_eq!(Severity::High.label(), "High");
        assert_eq!(Severity::from_str("medium"), Ok(Severity::Medium));
    }

    fn thresholds_strategy() -> impl Strategy<Value = ClassificationThresholds> {
        (1i64..100, 1i64..100, 1i64..100, 0i64..100, 1i64..100, 1i64..100, 1i64..100).prop_map(
            |(a, b, c, gap, d, e, f)| {
                let severe = Decimal::from(a);
                let moderate = severe + Decimal::from(b);
                let mild = moderate + Decimal::from(c);
                let flood_moderate = mild + Decimal::from(gap);
                let flood_severe = flood_moderate + Decimal::from(d);
                let extreme = flood_severe + Decimal::from(e + f);
                ClassificationThresholds {
                    drought: DroughtThresholds { severe, moderate, mild },
                    flood: FloodThresholds {
                        moderate: flood_moderate,
                        severe: flood_severe,
                        extreme,
                    },
                }
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Severity follows condition and drought bands never overlap flood bands
        #[test]
        fn prop_classification_is_consistent(
            thresholds in thresholds_strategy(),
            tenths in 0i64..10_000
        ) {
            prop_assert!(thresholds.validate().is_ok());

            let precipitation = Decimal::new(tenths, 1);
            let (condition, severity) = thresholds.classify(precipitation);

            match condition.category() {
                ConditionCategory::Drought => prop_assert!(precipitation < thresholds.drought.mild),
                ConditionCategory::Flood => prop_assert!(precipitation > thresholds.flood.moderate),
                ConditionCategory::Normal => {
                    prop_assert!(precipitation >= thresholds.drought.mild);
                    prop_assert!(precipitation <= thresholds.flood.moderate);
                }
            }

            let expected = match condition {
                Condition::Normal => Severity::Low,
                Condition::MildDrought | Condition::ModerateFlood => Severity::Medium,
                Condition::ModerateDrought | Condition::SevereFlood => Severity::High,
                Condition::SevereDrought | Condition::ExtremeFlood => Severity::Critical,
            };
            prop_assert_eq!(severity, expected);
        }

        /// Every threshold value is itself classified by the next band inward
        #[test]
        fn prop_boundaries_are_strict(thresholds in thresholds_strategy()) {
            let d = &thresholds.drought;
            let f = &thresholds.flood;
            prop_assert_eq!(thresholds.classify(d.severe).0, Condition::ModerateDrought);
            prop_assert_eq!(thresholds.classify(d.moderate).0, Condition::MildDrought);
            prop_assert_eq!(thresholds.classify(d.mild).0, Condition::Normal);
            prop_assert_eq!(thresholds.classify(f.moderate).0, Condition::Normal);
            prop_assert_eq!(thresholds.classify(f.severe).0, Condition::ModerateFlood);
            prop_assert_eq!(thresholds.classify(f.extreme).0, Condition::SevereFlood);
        }
    }
}
