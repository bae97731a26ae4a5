//! Forecasting models for product inventory histories

use crate::error::Result;
use crate::features::EnrichedRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;

/// One projected future day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Projected stock, a whole number inside the stock range
    pub predicted: u32,
    pub lower: u32,
    pub upper: u32,
    pub confidence: f64,
}

impl ForecastPoint {
    /// Whether the interval contains the point estimate
    pub fn is_consistent(&self) -> bool {
        self.lower <= self.predicted && self.predicted <= self.upper
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Project the configured number of future days
    fn forecast(&self) -> Result<Vec<ForecastPoint>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on one product's chronological history
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on a non-empty chronological history
    fn train(&self, history: &[EnrichedRecord]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod linear_delta;

pub use linear_delta::{LinearDeltaModel, TrainedLinearDelta};
