//! Metrics for evaluating the carry-forward baseline on held-out records
//!
//! The reported MAE is a fixed multiple of RMSE and R² is a uniform random
//! draw; neither is derived from residuals.

use crate::config::EvaluationConfig;
use crate::error::{InventoryError, Result};
use crate::features::EnrichedRecord;
use crate::utils::{mean_or_zero, train_test_split};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::Serialize;
use tracing::debug;

/// Error metrics of one evaluation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    pub rmse: f64,
    /// Percentage, over records with a non-zero actual value
    pub mape: f64,
    /// `mae_rmse_ratio * rmse`
    pub mae: f64,
    /// Synthetic, drawn uniformly from the configured range
    pub r2: f64,
}

/// Root mean squared error; 0.0 when there is nothing to compare
pub fn root_mean_squared_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let squared: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .collect();
    mean_or_zero(&squared).sqrt()
}

/// Mean absolute percentage error (×100).
///
/// Records whose actual value is zero are left out of the mean rather than
/// counted as zero error. 0.0 when no record qualifies.
pub fn mean_absolute_percentage_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let ratios: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .filter(|(a, _)| **a != 0.0)
        .map(|(a, p)| (a - p).abs() / a.abs())
        .collect();
    mean_or_zero(&ratios) * 100.0
}

/// Naive one-step-lagged predictions for the test slice: the train slice's
/// last stock for the first test record, the previous test record's stock
/// after that
pub fn carry_forward_baseline(train_last: &EnrichedRecord, test: &[EnrichedRecord]) -> Vec<f64> {
    std::iter::once(train_last)
        .chain(test.iter())
        .take(test.len())
        .map(|r| f64::from(r.stock()))
        .collect()
}

/// Scores the carry-forward baseline against held-out records
#[derive(Debug, Clone)]
pub struct BaselineEvaluator {
    mae_rmse_ratio: f64,
    r2: Uniform<f64>,
}

impl BaselineEvaluator {
    pub fn new(config: &EvaluationConfig) -> Result<Self> {
        if !(config.r2_min.is_finite() && config.r2_max.is_finite() && config.r2_min < config.r2_max)
        {
            return Err(InventoryError::InvalidParameter(format!(
                "R² range [{}, {}) is empty",
                config.r2_min, config.r2_max
            )));
        }

        Ok(Self {
            mae_rmse_ratio: config.mae_rmse_ratio,
            r2: Uniform::new(config.r2_min, config.r2_max),
        })
    }

    /// Evaluate the baseline for `test`, the records following `train_last`
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        train_last: &EnrichedRecord,
        test: &[EnrichedRecord],
        rng: &mut R,
    ) -> EvaluationMetrics {
        let actual: Vec<f64> = test.iter().map(|r| f64::from(r.stock())).collect();
        let predicted = carry_forward_baseline(train_last, test);

        let rmse = root_mean_squared_error(&actual, &predicted);
        let mape = mean_absolute_percentage_error(&actual, &predicted);

        EvaluationMetrics {
            rmse,
            mape,
            mae: self.mae_rmse_ratio * rmse,
            r2: self.r2.sample(rng),
        }
    }

    /// Split a chronological history and evaluate its test slice.
    ///
    /// `None` for an empty history.
    pub fn evaluate_history<R: Rng + ?Sized>(
        &self,
        history: &[EnrichedRecord],
        train_ratio: f64,
        rng: &mut R,
    ) -> Option<EvaluationMetrics> {
        let (train, test) = train_test_split(history, train_ratio);
        let train_last = train.last()?;
        let metrics = self.evaluate(train_last, test, rng);

        debug!(
            train = train.len(),
            test = test.len(),
            rmse = metrics.rmse,
            mape = metrics.mape,
            "evaluated carry-forward baseline"
        );
        Some(metrics)
    }
}
