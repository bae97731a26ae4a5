//! Linear extrapolation of the recent average daily stock delta

use crate::config::{BandPolicy, ConfidencePolicy, ForecastConfig};
use crate::error::{InventoryError, Result};
use crate::features::EnrichedRecord;
use crate::models::{ForecastModel, ForecastPoint, TrainedForecastModel};
use crate::utils::{future_dates, train_test_split};
use chrono::NaiveDate;
use stock_math::trend::{average_delta, LinearProjection};
use tracing::debug;

/// Naive forecaster: last stock plus the average daily delta per day ahead
#[derive(Debug, Clone)]
pub struct LinearDeltaModel {
    name: String,
    config: ForecastConfig,
}

/// Linear delta model fitted to one product history
#[derive(Debug, Clone)]
pub struct TrainedLinearDelta {
    name: String,
    last_date: NaiveDate,
    projection: LinearProjection,
    promotion_applied: bool,
    horizon: usize,
    band: BandPolicy,
    confidence: ConfidencePolicy,
}

impl LinearDeltaModel {
    /// Create a new linear delta model
    pub fn new(config: &ForecastConfig) -> Result<Self> {
        if config.delta_window < 2 {
            return Err(InventoryError::InvalidParameter(
                "Delta window must cover at least 2 records".to_string(),
            ));
        }
        if config.horizon == 0 {
            return Err(InventoryError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Linear Delta (window={})", config.delta_window),
            config: config.clone(),
        })
    }
}

impl ForecastModel for LinearDeltaModel {
    type Trained = TrainedLinearDelta;

    fn train(&self, history: &[EnrichedRecord]) -> Result<Self::Trained> {
        let last = history
            .last()
            .ok_or_else(|| InventoryError::DataError("Empty product history".to_string()))?;

        let (train, _) = train_test_split(history, self.config.train_ratio);
        let stocks: Vec<f64> = train.iter().map(|r| f64::from(r.stock())).collect();
        let delta = average_delta(&stocks, self.config.delta_window);

        let promotion_applied = last.promotion();
        let offset = if promotion_applied {
            self.config.promotion_offset
        } else {
            0.0
        };

        let projection = LinearProjection::new(
            f64::from(last.stock()),
            delta,
            offset,
            self.config.bounds()?,
        )?;

        debug!(
            product_id = last.product_id(),
            train = train.len(),
            delta,
            promotion_applied,
            "trained linear delta model"
        );

        Ok(TrainedLinearDelta {
            name: self.name.clone(),
            last_date: last.date(),
            projection,
            promotion_applied,
            horizon: self.config.horizon,
            band: self.config.band,
            confidence: self.config.confidence,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedLinearDelta {
    /// Average daily delta the projection steps by
    pub fn average_delta(&self) -> f64 {
        self.projection.delta()
    }

    /// Whether the promotion offset was applied to every day
    pub fn promotion_applied(&self) -> bool {
        self.promotion_applied
    }

    /// Projection for day `step` before rounding and clamping
    pub fn unclamped(&self, step: usize) -> f64 {
        self.projection.raw(step)
    }

    fn point(&self, step: usize, date: NaiveDate) -> ForecastPoint {
        let bounds = self.projection.bounds();
        let predicted = self.projection.at(step);
        let margin = self.band.margin(step);

        ForecastPoint {
            date,
            predicted: predicted as u32,
            lower: bounds.clamp((predicted - margin).round()) as u32,
            upper: bounds.clamp((predicted + margin).round()) as u32,
            confidence: self.confidence.level(step),
        }
    }
}

impl TrainedForecastModel for TrainedLinearDelta {
    fn forecast(&self) -> Result<Vec<ForecastPoint>> {
        let points = future_dates(self.last_date, self.horizon)
            .into_iter()
            .enumerate()
            .map(|(i, date)| self.point(i + 1, date))
            .collect();

        Ok(points)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
