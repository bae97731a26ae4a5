//! Pipeline settings
//!
//! Every section and field has a default matching the dashboard's fixed
//! constants, so an empty TOML document (or no file at all) reproduces the
//! stock behaviour. Settings are validated once, before any run.

use crate::error::{InventoryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use stock_math::Bounds;
use tracing::debug;

/// What the record parser does with a row that does not fit the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Drop the row and log a warning
    #[default]
    Skip,
    /// Stop parsing and return an error naming the row and column
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    pub row_policy: RowPolicy,
}

/// Thresholds and windows used by the feature engineer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// Stock strictly below this is flagged critical
    pub critical_threshold: u32,
    /// Stock strictly below this is flagged for reorder
    pub reorder_threshold: u32,
    pub short_window: usize,
    pub long_window: usize,
    /// Stock at or above this level counts as a restock
    pub restock_level: u32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            critical_threshold: 20,
            reorder_threshold: 30,
            short_window: 3,
            long_window: 7,
            restock_level: 95,
        }
    }
}

/// Width of the interval around each forecast point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BandPolicy {
    /// Same margin on every day
    Fixed { margin: f64 },
    /// `base + per_day * k` on day k
    Widening { base: f64, per_day: f64 },
}

impl Default for BandPolicy {
    fn default() -> Self {
        BandPolicy::Fixed { margin: 15.0 }
    }
}

impl BandPolicy {
    /// Margin for 1-indexed forecast day `step`
    pub fn margin(&self, step: usize) -> f64 {
        match *self {
            BandPolicy::Fixed { margin } => margin,
            BandPolicy::Widening { base, per_day } => base + per_day * step as f64,
        }
    }

    fn validate(&self) -> Result<()> {
        let (a, b) = match *self {
            BandPolicy::Fixed { margin } => (margin, 0.0),
            BandPolicy::Widening { base, per_day } => (base, per_day),
        };
        if !a.is_finite() || !b.is_finite() || a < 0.0 || b < 0.0 {
            return Err(InventoryError::InvalidParameter(
                "Band margins must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Confidence attached to each forecast point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfidencePolicy {
    Fixed { level: f64 },
    /// `start - per_day * (k - 1)`, never below `floor`
    Decaying { start: f64, per_day: f64, floor: f64 },
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        ConfidencePolicy::Fixed { level: 0.85 }
    }
}

impl ConfidencePolicy {
    /// Confidence for 1-indexed forecast day `step`
    pub fn level(&self, step: usize) -> f64 {
        match *self {
            ConfidencePolicy::Fixed { level } => level,
            ConfidencePolicy::Decaying {
                start,
                per_day,
                floor,
            } => (start - per_day * step.saturating_sub(1) as f64).max(floor),
        }
    }

    fn validate(&self) -> Result<()> {
        let in_unit = |v: f64| v > 0.0 && v <= 1.0;
        let valid = match *self {
            ConfidencePolicy::Fixed { level } => in_unit(level),
            ConfidencePolicy::Decaying {
                start,
                per_day,
                floor,
            } => in_unit(start) && in_unit(floor) && floor <= start && per_day >= 0.0,
        };
        if !valid {
            return Err(InventoryError::InvalidParameter(
                "Confidence levels must lie in (0, 1] with floor <= start".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters of the linear-delta forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Number of future days projected
    pub horizon: usize,
    /// Share of the history used as the train slice
    pub train_ratio: f64,
    /// Number of trailing train records the average delta is taken over
    pub delta_window: usize,
    /// Added to every projected day when the last record is under promotion
    pub promotion_offset: f64,
    pub stock_floor: f64,
    pub stock_ceiling: f64,
    pub band: BandPolicy,
    pub confidence: ConfidencePolicy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 7,
            train_ratio: 0.8,
            delta_window: 7,
            promotion_offset: -5.0,
            stock_floor: 0.0,
            stock_ceiling: 100.0,
            band: BandPolicy::default(),
            confidence: ConfidencePolicy::default(),
        }
    }
}

impl ForecastConfig {
    /// Valid stock range every projected value is clamped into
    pub fn bounds(&self) -> Result<Bounds> {
        Ok(Bounds::new(self.stock_floor, self.stock_ceiling)?)
    }
}

/// Parameters of the carry-forward baseline evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationConfig {
    /// MAE is reported as this multiple of RMSE
    pub mae_rmse_ratio: f64,
    /// Lower bound (inclusive) of the synthetic R² draw
    pub r2_min: f64,
    /// Upper bound (exclusive) of the synthetic R² draw
    pub r2_max: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            mae_rmse_ratio: 0.8,
            r2_min: 0.75,
            r2_max: 0.90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregationConfig {
    /// Products whose minimum stock is below this are critical
    pub critical_min_stock: u32,
    /// Products with more critical days than this are critical
    pub critical_days_limit: u32,
    /// Maximum number of critical products reported
    pub critical_products_limit: usize,
    /// Minimum stock below which a product counts towards the low-stock insight
    pub low_stock_level: u32,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            critical_min_stock: 20,
            critical_days_limit: 3,
            critical_products_limit: 5,
            low_stock_level: 10,
        }
    }
}

/// Complete pipeline settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub parser: ParserConfig,
    pub features: FeatureConfig,
    pub forecast: ForecastConfig,
    pub evaluation: EvaluationConfig,
    pub aggregation: AggregationConfig,
}

impl Settings {
    /// Parse and validate settings from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Check every parameter the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        let features = &self.features;
        if features.short_window == 0 || features.long_window == 0 {
            return Err(InventoryError::InvalidParameter(
                "Rolling windows must be positive".to_string(),
            ));
        }

        let forecast = &self.forecast;
        if forecast.horizon == 0 {
            return Err(InventoryError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }
        if !(forecast.train_ratio > 0.0 && forecast.train_ratio < 1.0) {
            return Err(InventoryError::InvalidParameter(format!(
                "Train ratio must be between 0 and 1, got {}",
                forecast.train_ratio
            )));
        }
        if forecast.delta_window < 2 {
            return Err(InventoryError::InvalidParameter(
                "Delta window must cover at least 2 records".to_string(),
            ));
        }
        if !forecast.promotion_offset.is_finite() {
            return Err(InventoryError::InvalidParameter(
                "Promotion offset must be finite".to_string(),
            ));
        }
        forecast.bounds()?;
        if forecast.stock_floor < 0.0
            || forecast.stock_floor.fract() != 0.0
            || forecast.stock_ceiling.fract() != 0.0
        {
            return Err(InventoryError::InvalidParameter(
                "Stock range must be whole, non-negative quantities".to_string(),
            ));
        }
        forecast.band.validate()?;
        forecast.confidence.validate()?;

        let evaluation = &self.evaluation;
        if !(evaluation.mae_rmse_ratio.is_finite() && evaluation.mae_rmse_ratio >= 0.0) {
            return Err(InventoryError::InvalidParameter(
                "MAE/RMSE ratio must be finite and non-negative".to_string(),
            ));
        }
        if !(evaluation.r2_min.is_finite()
            && evaluation.r2_max.is_finite()
            && evaluation.r2_min < evaluation.r2_max)
        {
            return Err(InventoryError::InvalidParameter(format!(
                "R² range [{}, {}) is empty",
                evaluation.r2_min, evaluation.r2_max
            )));
        }

        if self.aggregation.critical_products_limit == 0 {
            return Err(InventoryError::InvalidParameter(
                "Critical products limit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
