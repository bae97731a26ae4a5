//! Feature engineering over per-product daily histories
//!
//! Records are stable-sorted by date across the whole table first and then
//! grouped by product in order of first appearance, so every group is
//! chronological and equal dates keep their input order. Each group is
//! enriched in one forward pass: lag fields only ever look at the previous
//! record of the same product, and rolling means only at records strictly
//! before the current one.

use crate::config::FeatureConfig;
use crate::data::RawRecord;
use crate::error::Result;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::HashMap;
use stock_math::moving_averages::SimpleMovingAverage;
use tracing::debug;

/// A raw record plus calendar, lag, rolling-mean and threshold fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub raw: RawRecord,

    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    pub day_of_month: u32,
    pub month: u32,
    pub is_weekend: bool,

    /// Stock of the previous record of this product, 0 on the first
    pub previous_stock: u32,
    /// Price of the previous record of this product, 0 on the first
    pub previous_price: f64,
    /// Previous stock minus current stock; negative after a restock
    pub prev_day_sales: i64,
    pub price_change: f64,

    /// Mean stock of the preceding short window, or own stock while warming up
    pub rolling_mean_short: f64,
    /// Mean stock of the preceding long window, or own stock while warming up
    pub rolling_mean_long: f64,
    /// Stock minus the short rolling mean
    pub trend_short: f64,
    /// Records since the latest restock at or before this one
    pub days_since_restock: usize,

    pub is_critical: bool,
    pub needs_reorder: bool,
}

impl EnrichedRecord {
    pub fn product_id(&self) -> u32 {
        self.raw.product_id
    }

    pub fn date(&self) -> NaiveDate {
        self.raw.date
    }

    pub fn stock(&self) -> u32 {
        self.raw.stock
    }

    pub fn price(&self) -> f64 {
        self.raw.price
    }

    pub fn promotion(&self) -> bool {
        self.raw.promotion
    }
}

/// Derives [`EnrichedRecord`]s from raw inventory rows
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    config: FeatureConfig,
    short: SimpleMovingAverage,
    long: SimpleMovingAverage,
}

impl FeatureEngineer {
    /// Create a feature engineer; fails on a zero-length rolling window
    pub fn new(config: &FeatureConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            short: SimpleMovingAverage::new(config.short_window)?,
            long: SimpleMovingAverage::new(config.long_window)?,
        })
    }

    /// Enrich records given in any order.
    ///
    /// Output is grouped by product (first appearance after the date sort)
    /// and chronological within each group.
    pub fn enrich(&self, records: &[RawRecord]) -> Vec<EnrichedRecord> {
        let mut sorted = records.to_vec();
        sorted.sort_by_key(|r| r.date);

        let mut order: Vec<u32> = Vec::new();
        let mut groups: HashMap<u32, Vec<RawRecord>> = HashMap::new();
        for record in sorted {
            let product_id = record.product_id;
            groups
                .entry(product_id)
                .or_insert_with(|| {
                    order.push(product_id);
                    Vec::new()
                })
                .push(record);
        }

        let mut enriched = Vec::with_capacity(records.len());
        for product_id in &order {
            if let Some(group) = groups.remove(product_id) {
                self.enrich_group(group, &mut enriched);
            }
        }

        debug!(
            records = enriched.len(),
            products = order.len(),
            "enriched inventory records"
        );
        enriched
    }

    fn enrich_group(&self, group: Vec<RawRecord>, out: &mut Vec<EnrichedRecord>) {
        let mut short = self.short.clone();
        let mut long = self.long.clone();
        let mut previous: Option<(u32, f64)> = None;
        let mut last_restock: Option<usize> = None;

        for (index, raw) in group.into_iter().enumerate() {
            let stock = f64::from(raw.stock);
            let rolling_mean_short = short.value_or(stock);
            let rolling_mean_long = long.value_or(stock);

            if raw.stock >= self.config.restock_level {
                last_restock = Some(index);
            }

            let (previous_stock, previous_price, prev_day_sales, price_change) = match previous {
                Some((prev_stock, prev_price)) => (
                    prev_stock,
                    prev_price,
                    i64::from(prev_stock) - i64::from(raw.stock),
                    raw.price - prev_price,
                ),
                None => (0, 0.0, 0, 0.0),
            };

            let weekday = raw.date.weekday();
            previous = Some((raw.stock, raw.price));
            short.update(stock);
            long.update(stock);

            out.push(EnrichedRecord {
                day_of_week: weekday.num_days_from_monday(),
                day_of_month: raw.date.day(),
                month: raw.date.month(),
                is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
                previous_stock,
                previous_price,
                prev_day_sales,
                price_change,
                rolling_mean_short,
                rolling_mean_long,
                trend_short: stock - rolling_mean_short,
                days_since_restock: last_restock.map_or(index, |r| index - r),
                is_critical: raw.stock < self.config.critical_threshold,
                needs_reorder: raw.stock < self.config.reorder_threshold,
                raw,
            });
        }
    }
}

/// Chronological history of one product; empty for an unknown id
pub fn product_history(records: &[EnrichedRecord], product_id: u32) -> Vec<EnrichedRecord> {
    records
        .iter()
        .filter(|r| r.product_id() == product_id)
        .cloned()
        .collect()
}

/// Distinct product ids in order of first appearance
pub fn product_ids(records: &[EnrichedRecord]) -> Vec<u32> {
    let mut ids: Vec<u32> = Vec::new();
    for record in records {
        if !ids.contains(&record.product_id()) {
            ids.push(record.product_id());
        }
    }
    ids
}
