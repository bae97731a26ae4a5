//! Per-product summaries and table-wide aggregates for the overview

use crate::config::AggregationConfig;
use crate::features::EnrichedRecord;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregate over all enriched records of one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub product_id: u32,
    pub days: usize,
    pub avg_stock: f64,
    /// Sample standard deviation; 0 with fewer than two records
    pub std_stock: f64,
    pub min_stock: u32,
    pub max_stock: u32,
    pub avg_price: f64,
    pub critical_days: u32,
    pub promotion_days: u32,
}

/// Mean stock and mean sales of the records in one promotion bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PromotionBucket {
    pub records: usize,
    pub avg_stock: f64,
    /// Positive previous-day sales summed, divided by the bucket's record count
    pub avg_sales: f64,
}

/// Records split by promotion flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PromotionImpact {
    pub with_promotion: PromotionBucket,
    pub without_promotion: PromotionBucket,
}

impl PromotionImpact {
    /// Relative change in mean sales under promotion, in percent
    pub fn sales_uplift_pct(&self) -> Option<f64> {
        let base = self.without_promotion.avg_sales;
        if self.with_promotion.records == 0 || base <= 0.0 {
            return None;
        }
        Some((self.with_promotion.avg_sales / base - 1.0) * 100.0)
    }
}

/// Mean previous-day sales on weekends against weekdays
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WeekdayPattern {
    pub weekend_sales: f64,
    pub weekday_sales: f64,
}

impl WeekdayPattern {
    /// Weekend uplift in percent, only when weekends actually sell more
    pub fn weekend_uplift_pct(&self) -> Option<f64> {
        if self.weekday_sales > 0.0 && self.weekend_sales > self.weekday_sales {
            Some((self.weekend_sales / self.weekday_sales - 1.0) * 100.0)
        } else {
            None
        }
    }
}

/// Narrative figures shown under the overview
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Insights {
    /// Products whose minimum stock fell below the low-stock level
    pub low_stock_products: usize,
    pub low_stock_level: u32,
    pub weekday_pattern: WeekdayPattern,
}

#[derive(Debug)]
struct Accumulator {
    stocks: Vec<f64>,
    price_sum: f64,
    min_stock: u32,
    max_stock: u32,
    critical_days: u32,
    promotion_days: u32,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            stocks: Vec::new(),
            price_sum: 0.0,
            min_stock: u32::MAX,
            max_stock: 0,
            critical_days: 0,
            promotion_days: 0,
        }
    }

    fn push(&mut self, record: &EnrichedRecord) {
        self.stocks.push(f64::from(record.stock()));
        self.price_sum += record.price();
        self.min_stock = self.min_stock.min(record.stock());
        self.max_stock = self.max_stock.max(record.stock());
        self.critical_days += u32::from(record.is_critical);
        self.promotion_days += u32::from(record.promotion());
    }

    fn finish(self, product_id: u32) -> ProductSummary {
        let days = self.stocks.len();
        let std_stock = if days < 2 {
            0.0
        } else {
            self.stocks.iter().std_dev()
        };

        ProductSummary {
            product_id,
            days,
            avg_stock: self.stocks.iter().sum::<f64>() / days as f64,
            std_stock,
            min_stock: self.min_stock,
            max_stock: self.max_stock,
            avg_price: self.price_sum / days as f64,
            critical_days: self.critical_days,
            promotion_days: self.promotion_days,
        }
    }
}

#[derive(Debug, Default)]
struct BucketAccumulator {
    records: usize,
    stock_sum: f64,
    sales_sum: f64,
}

impl BucketAccumulator {
    fn push(&mut self, record: &EnrichedRecord) {
        self.records += 1;
        self.stock_sum += f64::from(record.stock());
        if record.prev_day_sales > 0 {
            self.sales_sum += record.prev_day_sales as f64;
        }
    }

    fn finish(self) -> PromotionBucket {
        if self.records == 0 {
            return PromotionBucket::default();
        }
        PromotionBucket {
            records: self.records,
            avg_stock: self.stock_sum / self.records as f64,
            avg_sales: self.sales_sum / self.records as f64,
        }
    }
}

/// Builds overview aggregates from enriched records
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    pub fn new(config: &AggregationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Per-product summaries keyed by product id
    pub fn summarize(&self, records: &[EnrichedRecord]) -> BTreeMap<u32, ProductSummary> {
        let mut accumulators: BTreeMap<u32, Accumulator> = BTreeMap::new();
        for record in records {
            accumulators
                .entry(record.product_id())
                .or_insert_with(Accumulator::new)
                .push(record);
        }

        let summaries: BTreeMap<u32, ProductSummary> = accumulators
            .into_iter()
            .map(|(id, acc)| (id, acc.finish(id)))
            .collect();

        debug!(products = summaries.len(), "summarized products");
        summaries
    }

    /// Mean stock and mean positive sales with and without promotion
    pub fn promotion_impact(&self, records: &[EnrichedRecord]) -> PromotionImpact {
        let mut with_promotion = BucketAccumulator::default();
        let mut without_promotion = BucketAccumulator::default();

        for record in records {
            if record.promotion() {
                with_promotion.push(record);
            } else {
                without_promotion.push(record);
            }
        }

        PromotionImpact {
            with_promotion: with_promotion.finish(),
            without_promotion: without_promotion.finish(),
        }
    }

    /// Products at risk: minimum stock below the critical level or too many
    /// critical days, lowest minimum stock first, capped to the limit
    pub fn critical_products(
        &self,
        summaries: &BTreeMap<u32, ProductSummary>,
    ) -> Vec<ProductSummary> {
        let mut critical: Vec<ProductSummary> = summaries
            .values()
            .filter(|s| {
                s.min_stock < self.config.critical_min_stock
                    || s.critical_days > self.config.critical_days_limit
            })
            .cloned()
            .collect();

        critical.sort_by_key(|s| s.min_stock);
        critical.truncate(self.config.critical_products_limit);
        critical
    }

    /// Mean previous-day sales (restocks netted in) on weekends and weekdays
    pub fn weekday_pattern(&self, records: &[EnrichedRecord]) -> WeekdayPattern {
        let (weekend, weekday): (Vec<&EnrichedRecord>, Vec<&EnrichedRecord>) =
            records.iter().partition(|r| r.is_weekend);

        let mean_sales = |group: &[&EnrichedRecord]| {
            if group.is_empty() {
                0.0
            } else {
                group.iter().map(|r| r.prev_day_sales as f64).sum::<f64>() / group.len() as f64
            }
        };

        WeekdayPattern {
            weekend_sales: mean_sales(weekend.as_slice()),
            weekday_sales: mean_sales(weekday.as_slice()),
        }
    }

    pub fn insights(
        &self,
        records: &[EnrichedRecord],
        summaries: &BTreeMap<u32, ProductSummary>,
    ) -> Insights {
        let low_stock_products = summaries
            .values()
            .filter(|s| s.min_stock < self.config.low_stock_level)
            .count();

        Insights {
            low_stock_products,
            low_stock_level: self.config.low_stock_level,
            weekday_pattern: self.weekday_pattern(records),
        }
    }
}
