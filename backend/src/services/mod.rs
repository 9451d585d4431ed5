//! Business logic services for the risk forecast platform

pub mod forecast;
pub mod ingestion;
pub mod prediction;

pub use forecast::{ForecastDetail, ForecastService};
pub use ingestion::{IngestionService, SyncOutcome};
pub use prediction::{ConditionAlerts, CurrentConditions, PredictionService};
