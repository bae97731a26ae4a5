//! # Stock Math
//!
//! Numeric building blocks for inventory series.
//! This crate provides the trailing-window averages, consecutive-delta
//! statistics and clamped projections used by the inventory forecaster.

use thiserror::Error;

pub mod moving_averages;
pub mod trend;

/// Errors that can occur in inventory math calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for inventory math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Inclusive numeric range a projected quantity is clamped into
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Bounds {
    floor: f64,
    ceiling: f64,
}

impl Bounds {
    /// Create bounds, rejecting an inverted or non-finite range
    pub fn new(floor: f64, ceiling: f64) -> Result<Self> {
        if !floor.is_finite() || !ceiling.is_finite() || floor > ceiling {
            return Err(MathError::InvalidInput(format!(
                "Invalid bounds: floor {} must not exceed ceiling {}",
                floor, ceiling
            )));
        }

        Ok(Self { floor, ceiling })
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Clamp a value into the bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.floor, self.ceiling)
    }
}
