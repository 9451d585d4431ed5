//! Drought and flood risk forecasting for a single monitored region
//!
//! Pulls daily weather from NASA POWER, classifies each month against
//! precipitation thresholds, rolls months up into yearly forecasts and
//! compares years.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::NasaPowerClient;
use services::{ForecastService, IngestionService, PredictionService};
use store::WeatherStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WeatherStore>,
    pub config: Arc<Config>,
    pub power: NasaPowerClient,
}

impl AppState {
    pub fn new(store: Arc<dyn WeatherStore>, config: Config) -> AppResult<Self> {
        let power = NasaPowerClient::new(&config.power, config.region.coordinates())?;
        Ok(Self {
            store,
            config: Arc::new(config),
            power,
        })
    }

    pub fn ingestion_service(&self) -> IngestionService {
        IngestionService::new(self.store.clone(), self.power.clone())
    }

    pub fn prediction_service(&self) -> PredictionService {
        PredictionService::new(self.store.clone(), self.config.thresholds.clone())
    }

    pub fn forecast_service(&self) -> ForecastService {
        ForecastService::new(
            self.store.clone(),
            self.prediction_service(),
            self.config.region.name.clone(),
        )
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Drought & Flood Risk Forecast API v1"
}
