//! Yearly forecast and trend integration tests

mod common;

use common::{dec, memory_state, seed_month};
use risk_forecast_backend::store::WeatherStore;
use risk_forecast_backend::AppError;
use rust_decimal::Decimal;
use shared::{NewYearlyForecast, PredictionFilter, RiskLevel, TrendDirection, TrendError};

fn stored_forecast(year: i32, precipitation: &str, drought: u32, flood: u32) -> NewYearlyForecast {
    NewYearlyForecast {
        year,
        total_precipitation: dec(precipitation),
        avg_temperature: dec("30"),
        drought_months: drought,
        flood_risk_months: flood,
        normal_months: 12 - drought - flood,
        overall_risk_level: RiskLevel::from_counts(drought, flood),
        summary: String::new(),
    }
}

#[tokio::test]
async fn test_forecast_year_fills_coverage_and_rolls_up() {
    let (store, state) = memory_state();
    // Six severe drought months, six normal months
    for month in 1..=6 {
        seed_month(store.as_ref(), 2023, month, 1, "1", "30").await;
    }
    for month in 7..=12 {
        seed_month(store.as_ref(), 2023, month, 1, "100", "26").await;
    }

    let forecast = state
        .forecast_service()
        .forecast_year(2023)
        .await
        .unwrap()
        .expect("year has data");

    assert_eq!(forecast.drought_months, 6);
    assert_eq!(forecast.flood_risk_months, 0);
    assert_eq!(forecast.normal_months, 6);
    assert_eq!(forecast.overall_risk_level, RiskLevel::Critical);
    assert_eq!(forecast.total_precipitation, dec("606"));
    assert_eq!(forecast.avg_temperature, dec("28"));
    assert!(forecast.summary.contains("Turkana County - 2023"));
    assert!(forecast.summary.contains("Overall Risk Level: CRITICAL"));
    assert!(forecast.summary.contains("Annual Precipitation: 606.0mm"));

    let predictions = store
        .list_predictions(&PredictionFilter {
            year: Some(2023),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(predictions.len(), 12);
}

#[tokio::test]
async fn test_coverage_is_not_recomputed_when_present() {
    let (store, state) = memory_state();
    seed_month(store.as_ref(), 2021, 1, 5, "2", "30").await;
    seed_month(store.as_ref(), 2021, 2, 5, "2", "30").await;

    let service = state.forecast_service();
    state.prediction_service().classify_month(2021, 1).await.unwrap();

    // February is not classified because January already covers the year
    assert_eq!(service.ensure_monthly_coverage(2021).await.unwrap(), 1);
    assert!(store.get_prediction(2021, 2).await.unwrap().is_none());
    assert_eq!(service.ensure_monthly_coverage(2021).await.unwrap(), 1);
}

#[tokio::test]
async fn test_forecast_absent_without_data() {
    let (store, state) = memory_state();
    let forecast = state.forecast_service().forecast_year(2019).await.unwrap();
    assert!(forecast.is_none());
    assert!(store.get_forecast(2019).await.unwrap().is_none());
}

#[tokio::test]
async fn test_regenerating_forecast_keeps_one_record() {
    let (store, state) = memory_state();
    seed_month(store.as_ref(), 2020, 6, 3, "0", "31").await;
    let service = state.forecast_service();

    let first = service.forecast_year(2020).await.unwrap().unwrap();
    let second = service.forecast_year(2020).await.unwrap().unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(store.list_forecasts().await.unwrap().len(), 1);
    // One drought month out of one covered
    assert_eq!(second.overall_risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn test_with_months_embeds_predictions_in_order() {
    let (store, state) = memory_state();
    for month in [9, 3, 6] {
        seed_month(store.as_ref(), 2022, month, 2, "40", "27").await;
    }

    let service = state.forecast_service();
    let forecast = service.forecast_year(2022).await.unwrap().unwrap();
    let detail = service.with_months(forecast).await.unwrap();

    let months: Vec<u32> = detail.monthly_predictions.iter().map(|p| p.month).collect();
    assert_eq!(months, vec![3, 6, 9]);
}

#[tokio::test]
async fn test_compare_reports_first_to_last_trend() {
    let (store, state) = memory_state();
    store.upsert_forecast(&stored_forecast(2020, "100", 1, 0)).await.unwrap();
    store.upsert_forecast(&stored_forecast(2022, "5", 11, 0)).await.unwrap();
    store.upsert_forecast(&stored_forecast(2024, "150", 4, 0)).await.unwrap();

    let comparison = state
        .forecast_service()
        .compare_years(&[2024, 2020, 2022])
        .await
        .unwrap();

    assert_eq!(comparison.years_compared, 3);
    let trends = comparison.trends.unwrap();
    assert_eq!(trends.from_year, 2020);
    assert_eq!(trends.to_year, 2024);
    assert_eq!(trends.precipitation_change_percent, dec("50.00"));
    assert_eq!(trends.temperature_change_celsius, Decimal::ZERO);
    assert_eq!(trends.drought_trend, TrendDirection::Increasing);
    assert_eq!(trends.flood_trend, TrendDirection::Decreasing);
}

#[tokio::test]
async fn test_compare_single_year_has_no_trend() {
    let (store, state) = memory_state();
    store.upsert_forecast(&stored_forecast(2020, "100", 1, 0)).await.unwrap();

    let comparison = state
        .forecast_service()
        .compare_years(&[2020, 2021])
        .await
        .unwrap();
    assert_eq!(comparison.years_compared, 1);
    assert!(comparison.trends.is_none());
}

#[tokio::test]
async fn test_compare_zero_baseline_fails() {
    let (store, state) = memory_state();
    store.upsert_forecast(&stored_forecast(2020, "0", 12, 0)).await.unwrap();
    store.upsert_forecast(&stored_forecast(2021, "80", 2, 0)).await.unwrap();

    let result = state.forecast_service().compare_years(&[2020, 2021]).await;
    assert!(matches!(
        result,
        Err(AppError::TrendUndefined(TrendError::ZeroBaseline { year: 2020 }))
    ));
}

#[tokio::test]
async fn test_current_year_generates_once() {
    let (store, state) = memory_state();
    seed_month(store.as_ref(), 2026, 10, 5, "50", "29").await;

    let today = common::date(2026, 10, 19);
    let service = state.forecast_service();
    let generated = service.current_year(today).await.unwrap().unwrap();
    let fetched = service.current_year(today).await.unwrap().unwrap();

    assert_eq!(generated.id, fetched.id);
    assert_eq!(generated.updated_at, fetched.updated_at);
    assert_eq!(service.get(2026).await.unwrap().unwrap().id, generated.id);
}
