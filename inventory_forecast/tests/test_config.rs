use inventory_forecast::config::{BandPolicy, ConfidencePolicy, RowPolicy, Settings};
use inventory_forecast::InventoryError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert!(settings.validate().is_ok());

    assert_eq!(settings.parser.row_policy, RowPolicy::Skip);
    assert_eq!(settings.features.critical_threshold, 20);
    assert_eq!(settings.features.reorder_threshold, 30);
    assert_eq!(settings.forecast.horizon, 7);
    assert_eq!(settings.forecast.train_ratio, 0.8);
    assert_eq!(settings.forecast.promotion_offset, -5.0);
    assert_eq!(settings.forecast.band, BandPolicy::Fixed { margin: 15.0 });
    assert_eq!(settings.forecast.confidence, ConfidencePolicy::Fixed { level: 0.85 });
    assert_eq!(settings.aggregation.critical_products_limit, 5);
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
}

#[test]
fn test_partial_document() {
    let source = r#"
        [parser]
        row_policy = "reject"

        [forecast]
        horizon = 14
        band = { kind = "widening", base = 5.0, per_day = 1.5 }
        confidence = { kind = "decaying", start = 0.9, per_day = 0.02, floor = 0.6 }

        [aggregation]
        low_stock_level = 15
    "#;
    let settings = Settings::from_toml_str(source).unwrap();

    assert_eq!(settings.parser.row_policy, RowPolicy::Reject);
    assert_eq!(settings.forecast.horizon, 14);
    assert_eq!(settings.forecast.train_ratio, 0.8);
    assert_eq!(
        settings.forecast.band,
        BandPolicy::Widening {
            base: 5.0,
            per_day: 1.5
        }
    );
    assert_eq!(settings.forecast.band.margin(2), 8.0);
    assert_eq!(settings.aggregation.low_stock_level, 15);
    assert_eq!(settings.aggregation.critical_min_stock, 20);
}

#[test]
fn test_unknown_field_rejected() {
    let result = Settings::from_toml_str("[forecast]\nhorizn = 7\n");
    assert!(matches!(result, Err(InventoryError::ConfigError(_))));
}

#[rstest]
#[case("[forecast]\ntrain_ratio = 1.0\n")]
#[case("[forecast]\ntrain_ratio = 0.0\n")]
#[case("[forecast]\nhorizon = 0\n")]
#[case("[forecast]\ndelta_window = 1\n")]
#[case("[forecast]\nstock_floor = -1.0\n")]
#[case("[forecast]\nstock_ceiling = 99.5\n")]
#[case("[forecast]\nband = { kind = \"fixed\", margin = -1.0 }\n")]
#[case("[forecast]\nconfidence = { kind = \"fixed\", level = 1.5 }\n")]
#[case("[features]\nshort_window = 0\n")]
#[case("[evaluation]\nr2_min = 0.9\nr2_max = 0.8\n")]
#[case("[aggregation]\ncritical_products_limit = 0\n")]
fn test_invalid_values_rejected(#[case] source: &str) {
    assert!(Settings::from_toml_str(source).is_err());
}

#[test]
fn test_inverted_stock_range() {
    let result = Settings::from_toml_str("[forecast]\nstock_floor = 50.0\nstock_ceiling = 10.0\n");
    assert!(matches!(result, Err(InventoryError::MathError(_))));
}

#[test]
fn test_confidence_levels() {
    let decaying = ConfidencePolicy::Decaying {
        start: 0.9,
        per_day: 0.1,
        floor: 0.65,
    };
    assert_eq!(decaying.level(1), 0.9);
    assert_eq!(decaying.level(5), 0.65);
    assert_eq!(ConfidencePolicy::default().level(7), 0.85);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[evaluation]").unwrap();
    writeln!(file, "mae_rmse_ratio = 1.0").unwrap();

    let settings = Settings::load(file.path()).unwrap();
    assert_eq!(settings.evaluation.mae_rmse_ratio, 1.0);
    assert_eq!(settings.evaluation.r2_max, 0.90);

    assert!(matches!(
        Settings::load("nonexistent_settings.toml"),
        Err(InventoryError::IoError(_))
    ));
}
