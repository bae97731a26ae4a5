use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use inventory_forecast::config::{BandPolicy, ConfidencePolicy, FeatureConfig, ForecastConfig};
use inventory_forecast::data::RawRecord;
use inventory_forecast::features::{EnrichedRecord, FeatureEngineer};
use inventory_forecast::models::{
    ForecastModel, LinearDeltaModel, TrainedForecastModel, TrainedLinearDelta,
};
use inventory_forecast::InventoryError;
use pretty_assertions::assert_eq;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

// Helper function to build an enriched single-product history
fn history(stocks: &[u32], last_promotion: bool) -> Vec<EnrichedRecord> {
    let raw: Vec<RawRecord> = stocks
        .iter()
        .enumerate()
        .map(|(day, &stock)| RawRecord {
            product_id: 1,
            date: start() + Duration::days(day as i64),
            stock,
            price: 10.0,
            promotion: last_promotion && day + 1 == stocks.len(),
        })
        .collect();

    FeatureEngineer::new(&FeatureConfig::default())
        .unwrap()
        .enrich(&raw)
}

fn train(stocks: &[u32], promotion: bool) -> TrainedLinearDelta {
    LinearDeltaModel::new(&ForecastConfig::default())
        .unwrap()
        .train(&history(stocks, promotion))
        .unwrap()
}

fn predicted(trained: &TrainedLinearDelta) -> Vec<u32> {
    trained
        .forecast()
        .unwrap()
        .iter()
        .map(|p| p.predicted)
        .collect()
}

#[test]
fn test_model_name() {
    let model = LinearDeltaModel::new(&ForecastConfig::default()).unwrap();
    assert_eq!(model.name(), "Linear Delta (window=7)");
}

#[test]
fn test_forecast_covers_next_seven_days() {
    let trained = train(&[80, 77, 75, 70, 68, 66, 61, 60, 58, 55], false);
    let points = trained.forecast().unwrap();

    assert_eq!(points.len(), 7);
    let last = start() + Duration::days(9);
    for (k, point) in points.iter().enumerate() {
        assert_eq!(point.date, last + Duration::days(k as i64 + 1));
        assert_eq!(point.confidence, 0.85);
        assert!(point.is_consistent());
        assert!(point.upper <= 100);
    }
}

#[test]
fn test_steady_decline_clamps_at_zero() {
    let trained = train(&[100, 90, 80, 70, 60, 50, 40, 30, 20, 10], false);

    assert_eq!(trained.average_delta(), -10.0);
    assert_eq!(predicted(&trained), vec![0; 7]);

    let first = &trained.forecast().unwrap()[0];
    assert_eq!(first.lower, 0);
    assert_eq!(first.upper, 15);
}

#[test]
fn test_growth_clamps_at_ceiling() {
    let trained = train(&[90, 95, 100], false);
    // Train slice is [90, 95]
    assert_eq!(trained.average_delta(), 5.0);

    for point in trained.forecast().unwrap() {
        assert_eq!(point.predicted, 100);
        assert_eq!(point.upper, 100);
        assert_eq!(point.lower, 85);
    }
}

#[test]
fn test_promotion_offset_applied_before_clamping() {
    let stocks = [50, 52, 54, 56, 58];
    let plain = train(&stocks, false);
    let promoted = train(&stocks, true);

    assert!(!plain.promotion_applied());
    assert!(promoted.promotion_applied());
    for k in 1..=7 {
        assert_relative_eq!(promoted.unclamped(k), plain.unclamped(k) - 5.0);
    }

    // Train slice [50, 52, 54, 56] gives delta 2 from last stock 58
    assert_eq!(predicted(&plain), vec![60, 62, 64, 66, 68, 70, 72]);
    assert_eq!(predicted(&promoted), vec![55, 57, 59, 61, 63, 65, 67]);
}

#[test]
fn test_promotion_near_floor() {
    let trained = train(&[3, 3, 3, 3, 3], true);
    assert_relative_eq!(trained.unclamped(1), -2.0);
    assert_eq!(predicted(&trained), vec![0; 7]);
}

#[test]
fn test_three_record_history() {
    let trained = train(&[30, 20, 10], false);
    assert_eq!(trained.average_delta(), -10.0);
    assert_eq!(predicted(&trained), vec![0; 7]);
}

#[test]
fn test_single_record_history_is_flat() {
    let trained = train(&[40], false);
    assert_eq!(trained.average_delta(), 0.0);
    assert_eq!(predicted(&trained), vec![40; 7]);
}

#[test]
fn test_delta_uses_only_trailing_window() {
    // 20 records: train slice is the first 16, window covers indices 9..16
    let mut stocks = vec![100; 9];
    stocks.extend([90, 88, 86, 84, 82, 80, 78, 40, 40, 40, 40]);
    let trained = train(&stocks, false);

    assert_relative_eq!(trained.average_delta(), -2.0);
}

#[test]
fn test_empty_history_is_an_error() {
    let model = LinearDeltaModel::new(&ForecastConfig::default()).unwrap();
    assert!(matches!(model.train(&[]), Err(InventoryError::DataError(_))));
}

#[test]
fn test_band_and_confidence_policies() {
    let config = ForecastConfig {
        band: BandPolicy::Widening {
            base: 5.0,
            per_day: 2.0,
        },
        confidence: ConfidencePolicy::Decaying {
            start: 0.9,
            per_day: 0.05,
            floor: 0.7,
        },
        ..ForecastConfig::default()
    };
    let trained = LinearDeltaModel::new(&config)
        .unwrap()
        .train(&history(&[50, 50, 50, 50], false))
        .unwrap();
    let points = trained.forecast().unwrap();

    assert_eq!((points[0].lower, points[0].upper), (43, 57));
    assert_eq!((points[6].lower, points[6].upper), (31, 69));
    assert_relative_eq!(points[0].confidence, 0.9);
    assert_relative_eq!(points[2].confidence, 0.8);
    assert_relative_eq!(points[6].confidence, 0.7);
}

#[test]
fn test_custom_horizon() {
    let config = ForecastConfig {
        horizon: 14,
        ..ForecastConfig::default()
    };
    let trained = LinearDeltaModel::new(&config)
        .unwrap()
        .train(&history(&[50, 49], false))
        .unwrap();

    assert_eq!(trained.forecast().unwrap().len(), 14);
}

#[test]
fn test_invalid_model_parameters() {
    let short_window = ForecastConfig {
        delta_window: 1,
        ..ForecastConfig::default()
    };
    assert!(LinearDeltaModel::new(&short_window).is_err());

    let no_horizon = ForecastConfig {
        horizon: 0,
        ..ForecastConfig::default()
    };
    assert!(LinearDeltaModel::new(&no_horizon).is_err());
}
