//! End-to-end dashboard pipeline
//!
//! [`Dashboard`] enriches the table once; the selected product is a plain
//! argument of [`Dashboard::forecast_for`] and [`Dashboard::snapshot`], so
//! selecting another product is just another call with nothing to reset.

use crate::aggregate::{Aggregator, Insights, ProductSummary, PromotionImpact};
use crate::config::Settings;
use crate::data::{DataLoader, RawRecord};
use crate::error::Result;
use crate::features::{product_history, product_ids, EnrichedRecord, FeatureEngineer};
use crate::metrics::{BaselineEvaluator, EvaluationMetrics};
use crate::models::{ForecastModel, ForecastPoint, LinearDeltaModel, TrainedForecastModel};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Forecast and baseline metrics for one selected product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductForecast {
    pub product_id: u32,
    pub model: String,
    /// Empty when the product has no history
    pub points: Vec<ForecastPoint>,
    /// `None` when the product has no history
    pub metrics: Option<EvaluationMetrics>,
    pub average_delta: f64,
    pub promotion_applied: bool,
}

impl ProductForecast {
    fn empty(product_id: u32, model: &str) -> Self {
        Self {
            product_id,
            model: model.to_string(),
            points: Vec::new(),
            metrics: None,
            average_delta: 0.0,
            promotion_applied: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Everything the overview and product views display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub records: Vec<EnrichedRecord>,
    pub summaries: BTreeMap<u32, ProductSummary>,
    pub critical_products: Vec<ProductSummary>,
    pub promotion_impact: PromotionImpact,
    pub insights: Insights,
    pub selected: Option<ProductForecast>,
}

/// Enriched inventory table plus the configured pipeline stages
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<EnrichedRecord>,
    train_ratio: f64,
    model: LinearDeltaModel,
    evaluator: BaselineEvaluator,
    aggregator: Aggregator,
}

impl Dashboard {
    /// Validate settings and enrich `raw`
    pub fn new(raw: &[RawRecord], settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let engineer = FeatureEngineer::new(&settings.features)?;
        let records = engineer.enrich(raw);
        info!(records = records.len(), "dashboard data ready");

        Ok(Self {
            records,
            train_ratio: settings.forecast.train_ratio,
            model: LinearDeltaModel::new(&settings.forecast)?,
            evaluator: BaselineEvaluator::new(&settings.evaluation)?,
            aggregator: Aggregator::new(&settings.aggregation),
        })
    }

    /// Parse CSV text with the configured row policy, then enrich it
    pub fn from_csv_text(text: &str, settings: &Settings) -> Result<Self> {
        let raw = DataLoader::from_text(text, settings.parser.row_policy)?;
        Self::new(&raw, settings)
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    /// Product ids in display order
    pub fn product_ids(&self) -> Vec<u32> {
        product_ids(&self.records)
    }

    /// Forecast and evaluate one product.
    ///
    /// An unknown product yields an empty forecast without metrics.
    pub fn forecast_for<R: Rng + ?Sized>(
        &self,
        product_id: u32,
        rng: &mut R,
    ) -> Result<ProductForecast> {
        let history = product_history(&self.records, product_id);
        if history.is_empty() {
            debug!(product_id, "no history for product");
            return Ok(ProductForecast::empty(product_id, self.model.name()));
        }

        let trained = self.model.train(&history)?;
        let points = trained.forecast()?;
        let metrics = self
            .evaluator
            .evaluate_history(&history, self.train_ratio, rng);

        Ok(ProductForecast {
            product_id,
            model: trained.name().to_string(),
            points,
            metrics,
            average_delta: trained.average_delta(),
            promotion_applied: trained.promotion_applied(),
        })
    }

    /// Overview aggregates plus, when a product is selected, its forecast
    pub fn snapshot<R: Rng + ?Sized>(
        &self,
        selected: Option<u32>,
        rng: &mut R,
    ) -> Result<DashboardSnapshot> {
        let summaries = self.aggregator.summarize(&self.records);
        let critical_products = self.aggregator.critical_products(&summaries);
        let promotion_impact = self.aggregator.promotion_impact(&self.records);
        let insights = self.aggregator.insights(&self.records, &summaries);

        let selected = match selected {
            Some(product_id) => Some(self.forecast_for(product_id, rng)?),
            None => None,
        };

        Ok(DashboardSnapshot {
            records: self.records.clone(),
            summaries,
            critical_products,
            promotion_impact,
            insights,
            selected,
        })
    }
}
