//! Batch sync: pull recent history, classify a year and print its forecast

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;
use risk_forecast_backend::{
    store::{MemoryWeatherStore, PgWeatherStore, WeatherStore},
    AppState, Config,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "risk-sync", about = "Sync NASA POWER history and generate a yearly risk forecast")]
struct Args {
    /// Years of history to fetch (1-10).
    #[arg(short, long, default_value_t = 5)]
    years: u32,

    /// Year to forecast. Defaults to the current year.
    #[arg(short, long)]
    forecast_year: Option<i32>,

    /// Skip the NASA POWER fetch and use stored samples only.
    #[arg(long)]
    skip_sync: bool,

    /// Keep everything in memory instead of writing to the database.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "risk_sync=info,risk_forecast_backend=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    dotenvy::dotenv().ok();
    let config = Config::load().context("loading configuration")?;

    let store: Arc<dyn WeatherStore> = if args.dry_run {
        tracing::info!("Dry run: results are kept in memory only");
        Arc::new(MemoryWeatherStore::new())
    } else {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.database.url)
            .await
            .context("connecting to database")?;
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        Arc::new(PgWeatherStore::new(db_pool))
    };

    let state = AppState::new(store, config)?;
    let today = Utc::now().date_naive();
    let year = args.forecast_year.unwrap_or_else(|| today.year());

    if args.skip_sync {
        tracing::info!("Skipping NASA POWER sync");
    } else {
        let outcome = state.ingestion_service().sync(args.years, today).await?;
        tracing::info!(
            "Synced {} to {}: {} new records",
            outcome.start_date,
            outcome.end_date,
            outcome.records_added
        );
    }

    let predictions = state.prediction_service();
    let mut classified = 0;
    for month in 1..=12 {
        if predictions.classify_month(year, month).await?.is_some() {
            classified += 1;
        }
    }
    tracing::info!("Classified {} of 12 months for {}", classified, year);

    match state.forecast_service().forecast_year(year).await? {
        Some(forecast) => println!("{}", forecast.summary),
        None => anyhow::bail!("no weather data for {}; nothing to forecast", year),
    }

    Ok(())
}
