//! Route definitions for the risk forecast platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/weather-data", weather_data_routes())
        .nest("/predictions", prediction_routes())
        .nest("/yearly-forecast", forecast_routes())
}

/// Daily sample routes
fn weather_data_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_weather_data))
        .route("/sync", post(handlers::sync_weather_data))
}

/// Monthly prediction routes
fn prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_predictions))
        .route("/analyze-month", post(handlers::analyze_month))
        .route("/current-conditions", get(handlers::current_conditions))
        .route("/drought-alerts", get(handlers::drought_alerts))
        .route("/flood-alerts", get(handlers::flood_alerts))
}

/// Yearly forecast routes
fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_forecasts))
        .route("/generate", post(handlers::generate_forecast))
        .route("/current-year", get(handlers::current_year_forecast))
        .route("/compare", get(handlers::compare_years))
}
