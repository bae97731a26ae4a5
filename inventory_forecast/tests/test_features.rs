use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use inventory_forecast::config::FeatureConfig;
use inventory_forecast::data::RawRecord;
use inventory_forecast::features::{product_history, product_ids, FeatureEngineer};
use pretty_assertions::assert_eq;
use rstest::rstest;

// Day 0 is Monday 2024-01-01
fn record(product_id: u32, day: i64, stock: u32, price: f64, promotion: bool) -> RawRecord {
    RawRecord {
        product_id,
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(day),
        stock,
        price,
        promotion,
    }
}

fn series(stocks: &[u32]) -> Vec<RawRecord> {
    stocks
        .iter()
        .enumerate()
        .map(|(day, &stock)| record(1, day as i64, stock, 10.0, false))
        .collect()
}

fn engineer() -> FeatureEngineer {
    FeatureEngineer::new(&FeatureConfig::default()).unwrap()
}

#[test]
fn test_first_record_lag_fields_are_zero() {
    let enriched = engineer().enrich(&series(&[50, 40]));
    let first = &enriched[0];

    assert_eq!(first.previous_stock, 0);
    assert_eq!(first.previous_price, 0.0);
    assert_eq!(first.prev_day_sales, 0);
    assert_eq!(first.price_change, 0.0);
    assert_eq!(first.rolling_mean_short, 50.0);
    assert_eq!(first.rolling_mean_long, 50.0);
    assert_eq!(first.trend_short, 0.0);
}

#[test]
fn test_lag_fields_follow_previous_record() {
    let raw = vec![
        record(1, 0, 50, 10.0, false),
        record(1, 1, 42, 9.5, true),
        record(1, 2, 97, 11.0, false),
    ];
    let enriched = engineer().enrich(&raw);

    assert_eq!(enriched[1].previous_stock, 50);
    assert_eq!(enriched[1].prev_day_sales, 8);
    assert_relative_eq!(enriched[1].price_change, -0.5);
    assert_eq!(enriched[1].previous_price, 10.0);

    // Restock shows up as negative sales
    assert_eq!(enriched[2].prev_day_sales, -55);
    assert_relative_eq!(enriched[2].price_change, 1.5);
}

#[test]
fn test_rolling_means_exclude_current_record() {
    let enriched = engineer().enrich(&series(&[50, 40, 30, 20, 10, 60, 70, 80]));

    // Short window warms up over the first three records
    assert_eq!(enriched[1].rolling_mean_short, 40.0);
    assert_eq!(enriched[2].rolling_mean_short, 30.0);
    assert_relative_eq!(enriched[3].rolling_mean_short, 40.0);
    assert_relative_eq!(enriched[3].trend_short, -20.0);
    assert_relative_eq!(enriched[4].rolling_mean_short, 30.0);

    // Long window is still warming up at index 6, full at index 7
    assert_eq!(enriched[6].rolling_mean_long, 70.0);
    assert_relative_eq!(enriched[7].rolling_mean_long, 280.0 / 7.0);
}

#[rstest]
#[case(19, true, true)]
#[case(20, false, true)]
#[case(29, false, true)]
#[case(30, false, false)]
fn test_threshold_flags(#[case] stock: u32, #[case] critical: bool, #[case] reorder: bool) {
    let enriched = engineer().enrich(&series(&[stock]));
    assert_eq!(enriched[0].is_critical, critical);
    assert_eq!(enriched[0].needs_reorder, reorder);
}

#[rstest]
#[case(0, 0, false)]
#[case(4, 4, false)]
#[case(5, 5, true)]
#[case(6, 6, true)]
#[case(7, 0, false)]
fn test_calendar_fields(#[case] day: i64, #[case] day_of_week: u32, #[case] weekend: bool) {
    let enriched = engineer().enrich(&[record(1, day, 50, 1.0, false)]);
    assert_eq!(enriched[0].day_of_week, day_of_week);
    assert_eq!(enriched[0].is_weekend, weekend);
    assert_eq!(enriched[0].month, 1);
    assert_eq!(enriched[0].day_of_month, 1 + day as u32);
}

#[test]
fn test_days_since_restock() {
    let enriched = engineer().enrich(&series(&[96, 80, 70, 99, 90]));
    let days: Vec<usize> = enriched.iter().map(|r| r.days_since_restock).collect();
    assert_eq!(days, vec![0, 1, 2, 0, 1]);

    // Without any restock the count runs from the first record
    let enriched = engineer().enrich(&series(&[50, 40, 30]));
    let days: Vec<usize> = enriched.iter().map(|r| r.days_since_restock).collect();
    assert_eq!(days, vec![0, 1, 2]);
}

#[test]
fn test_groups_are_chronological_in_first_appearance_order() {
    let raw = vec![
        record(2, 1, 60, 1.0, false),
        record(1, 2, 40, 1.0, false),
        record(1, 0, 50, 1.0, false),
        record(2, 0, 70, 1.0, false),
    ];
    let enriched = engineer().enrich(&raw);

    let order: Vec<(u32, u32)> = enriched.iter().map(|r| (r.product_id(), r.stock())).collect();
    assert_eq!(order, vec![(1, 50), (1, 40), (2, 70), (2, 60)]);
    assert_eq!(product_ids(&enriched), vec![1, 2]);

    // Lags never cross product boundaries
    assert_eq!(enriched[2].previous_stock, 0);
    assert_eq!(enriched[3].prev_day_sales, 10);
}

#[test]
fn test_product_history() {
    let raw = vec![record(1, 0, 50, 1.0, false), record(2, 0, 60, 1.0, false)];
    let enriched = engineer().enrich(&raw);

    let history = product_history(&enriched, 2);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].stock(), 60);
    assert!(product_history(&enriched, 99).is_empty());
}

#[test]
fn test_empty_input() {
    assert!(engineer().enrich(&[]).is_empty());
}

#[test]
fn test_zero_window_rejected() {
    let config = FeatureConfig {
        short_window: 0,
        ..FeatureConfig::default()
    };
    assert!(FeatureEngineer::new(&config).is_err());
}
