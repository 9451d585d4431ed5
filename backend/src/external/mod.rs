//! External API integrations

pub mod nasa_power;

pub use nasa_power::{parse_daily_payload, DailyGrid, NasaPowerClient};
