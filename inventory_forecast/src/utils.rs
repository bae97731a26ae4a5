//! Utility functions for the inventory_forecast crate

use chrono::{Duration, NaiveDate};

/// Index where the train slice ends for a history of `len` records.
///
/// `floor(len * train_ratio)`, raised to 1 when that would leave no training
/// record at all. Returns 0 only for an empty history.
pub fn split_index(len: usize, train_ratio: f64) -> usize {
    if len == 0 {
        return 0;
    }

    let split = (len as f64 * train_ratio).floor() as usize;
    split.clamp(1, len)
}

/// Split a chronological history into leading train and trailing test slices
pub fn train_test_split<T>(data: &[T], train_ratio: f64) -> (&[T], &[T]) {
    data.split_at(split_index(data.len(), train_ratio))
}

/// Calendar days following `last`, one per step
pub fn future_dates(last: NaiveDate, horizon: usize) -> Vec<NaiveDate> {
    (1..=horizon)
        .map(|step| last + Duration::days(step as i64))
        .collect()
}

/// Arithmetic mean, 0.0 for an empty input
pub fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
