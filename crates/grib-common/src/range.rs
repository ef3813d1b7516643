//! Value ranges used to normalize field data before color mapping.

use serde::{Deserialize, Serialize};

/// A closed `[min, max]` interval of data values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Compute the range of the finite values in `values`.
    ///
    /// NaN and infinite values (missing points) are skipped. Returns `None`
    /// when no finite value exists.
    pub fn from_values(values: &[f32]) -> Option<Self> {
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), &v| {
                (min.min(v), max.max(v))
            });

        if min.is_finite() && max.is_finite() {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Range centered on zero that covers this one: `[-m, m]` with
    /// `m = max(|min|, |max|)`.
    pub fn symmetric_around_zero(&self) -> Self {
        let m = self.min.abs().max(self.max.abs());
        Self { min: -m, max: m }
    }

    /// Width of the interval. May be zero or negative for inverted ranges.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Whether the range can be used as a normalization divisor.
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        span == 0.0 || !span.is_finite()
    }

    /// Map `value` into `[0, 1]` relative to this range.
    ///
    /// Degenerate ranges map every value to the midpoint `0.5`.
    pub fn normalize(&self, value: f32) -> f32 {
        if self.is_degenerate() {
            return 0.5;
        }
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }

    /// Inverse of [`normalize`](Self::normalize) for `t` in `[0, 1]`.
    pub fn denormalize(&self, t: f32) -> f32 {
        self.min + t * self.span()
    }
}
