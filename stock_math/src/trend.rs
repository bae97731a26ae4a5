//! Consecutive-delta trend estimation and linear projection

use crate::{Bounds, MathError, Result};

/// Mean of consecutive differences (`values[i] - values[i - 1]`) over the
/// last `window` values.
///
/// Returns 0.0 when fewer than two values fall inside the window.
pub fn average_delta(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    let tail = &values[start..];

    if tail.len() < 2 {
        return 0.0;
    }

    let total: f64 = tail.windows(2).map(|pair| pair[1] - pair[0]).sum();
    total / (tail.len() - 1) as f64
}

/// Straight-line projection from a last observed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearProjection {
    last: f64,
    delta: f64,
    offset: f64,
    bounds: Bounds,
}

impl LinearProjection {
    /// Create a projection stepping by `delta` per period from `last`,
    /// shifted by a constant `offset` and clamped into `bounds`
    pub fn new(last: f64, delta: f64, offset: f64, bounds: Bounds) -> Result<Self> {
        if !last.is_finite() || !delta.is_finite() || !offset.is_finite() {
            return Err(MathError::InvalidInput(
                "Projection inputs must be finite".to_string(),
            ));
        }

        Ok(Self {
            last,
            delta,
            offset,
            bounds,
        })
    }

    /// Unclamped value `step` periods ahead
    pub fn raw(&self, step: usize) -> f64 {
        self.last + self.delta * step as f64 + self.offset
    }

    /// Value `step` periods ahead, rounded to a whole unit and clamped
    pub fn at(&self, step: usize) -> f64 {
        self.bounds.clamp(self.raw(step).round())
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_delta_uses_trailing_window() {
        let values = [100.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0];
        assert_eq!(average_delta(&values, 7), -10.0);

        // Only the last three values: 50 -> 40 -> 30
        assert_eq!(average_delta(&values, 3), -10.0);

        let mixed = [10.0, 20.0, 15.0];
        assert_eq!(average_delta(&mixed, 7), 2.5);
    }

    #[test]
    fn test_average_delta_degenerate_windows() {
        assert_eq!(average_delta(&[], 7), 0.0);
        assert_eq!(average_delta(&[42.0], 7), 0.0);
        assert_eq!(average_delta(&[1.0, 2.0, 3.0], 1), 0.0);
    }

    #[test]
    fn test_projection_clamps_and_rounds() {
        let bounds = Bounds::new(0.0, 100.0).unwrap();
        let projection = LinearProjection::new(10.0, -10.0, 0.0, bounds).unwrap();

        assert_eq!(projection.raw(1), 0.0);
        assert_eq!(projection.at(2), 0.0);

        let rising = LinearProjection::new(95.0, 2.4, 0.0, bounds).unwrap();
        assert_eq!(rising.at(1), 97.0);
        assert_eq!(rising.at(3), 100.0);
    }

    #[test]
    fn test_projection_offset() {
        let bounds = Bounds::new(0.0, 100.0).unwrap();
        let projection = LinearProjection::new(50.0, 1.0, -5.0, bounds).unwrap();
        assert_eq!(projection.at(1), 46.0);
        assert!(LinearProjection::new(f64::INFINITY, 0.0, 0.0, bounds).is_err());
    }
}
