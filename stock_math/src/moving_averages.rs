//! Trailing moving average over a fixed number of observations
//!
//! The window only ever holds values that were pushed *before* the value
//! being evaluated, so reading it ahead of `update` yields the mean of the
//! strictly preceding observations.

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) over the last `period` observations
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Push a new observation into the window
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if !self.is_full() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }

    /// Current SMA value, or `fallback` while the window is still filling
    pub fn value_or(&self, fallback: f64) -> f64 {
        self.value().unwrap_or(fallback)
    }

    /// Whether `period` observations have been seen
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.period
    }

    /// Number of observations currently held
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_calculation() {
        let mut sma = SimpleMovingAverage::new(3).unwrap();

        // Not enough data yet
        assert!(sma.value().is_err());

        sma.update(2.0);
        sma.update(4.0);
        assert!(sma.value().is_err());
        assert_eq!(sma.value_or(-1.0), -1.0);

        sma.update(6.0);
        assert_eq!(sma.value().unwrap(), 4.0); // (2 + 4 + 6) / 3

        // The window slides, dropping the oldest value
        sma.update(8.0);
        assert_eq!(sma.value().unwrap(), 6.0); // (4 + 6 + 8) / 3
        assert_eq!(sma.len(), 3);
    }

    #[test]
    fn test_zero_period_rejected() {
        assert!(SimpleMovingAverage::new(0).is_err());
    }

    #[test]
    fn test_reset() {
        let mut sma = SimpleMovingAverage::new(2).unwrap();
        sma.update(1.0);
        sma.update(3.0);
        assert!(sma.is_full());

        sma.reset();
        assert!(sma.is_empty());
        assert!(sma.value().is_err());
    }
}
