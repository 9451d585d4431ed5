//! Configuration management for the risk forecast platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with RISK_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{validate_gps_coordinates, ClassificationThresholds, GpsCoordinates};

pub const DEFAULT_POWER_URL: &str = "https://power.larc.nasa.gov/api/temporal/daily/point";
pub const DEFAULT_PARAMETERS: [&str; 6] = ["PRECTOTCORR", "T2M", "T2M_MAX", "T2M_MIN", "RH2M", "WS2M"];

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// NASA POWER provider configuration
    pub power: PowerConfig,

    /// Monitored region
    pub region: RegionConfig,

    /// Monthly precipitation bands
    pub thresholds: ClassificationThresholds,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PowerConfig {
    /// Daily point endpoint
    pub base_url: String,

    /// POWER user community (AG, RE, SB)
    pub community: String,

    /// Parameters requested per day
    pub parameters: Vec<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegionConfig {
    /// Display name used in forecast summaries
    pub name: String,

    pub latitude: Decimal,

    pub longitude: Decimal,
}

impl RegionConfig {
    pub fn coordinates(&self) -> GpsCoordinates {
        GpsCoordinates::new(self.latitude, self.longitude)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RISK_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("power.base_url", DEFAULT_POWER_URL)?
            .set_default("power.community", "AG")?
            .set_default("power.parameters", DEFAULT_PARAMETERS.to_vec())?
            .set_default("power.timeout_secs", 30)?
            .set_default("region.name", "Turkana County")?
            .set_default("region.latitude", "3.1191")?
            .set_default("region.longitude", "35.5973")?
            .set_default("thresholds.drought.severe", 10)?
            .set_default("thresholds.drought.moderate", 25)?
            .set_default("thresholds.drought.mild", 50)?
            .set_default("thresholds.flood.moderate", 150)?
            .set_default("thresholds.flood.severe", 250)?
            .set_default("thresholds.flood.extreme", 350)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables, e.g. RISK_DATABASE__URL
            .add_source(
                Environment::with_prefix("RISK")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("power.parameters")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds
            .validate()
            .map_err(|e| ConfigError::Message(format!("thresholds: {}", e)))?;
        validate_gps_coordinates(self.region.latitude, self.region.longitude)
            .map_err(|e| ConfigError::Message(format!("region: {}", e)))?;
        if self.power.parameters.is_empty() {
            return Err(ConfigError::Message(
                "power: at least one parameter is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_POWER_URL.to_string(),
            community: "AG".to_string(),
            parameters: DEFAULT_PARAMETERS.iter().map(|p| p.to_string()).collect(),
            timeout_secs: 30,
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            name: "Turkana County".to_string(),
            latitude: Decimal::new(31191, 4),
            longitude: Decimal::new(355973, 4),
        }
    }
}
