//! Single-pass summary statistics over a decoded density array.
//!
//! Used by formats that do not carry trustworthy statistics in their header
//! (DSN6); CCP4 maps report mean and rms directly.

use serde::Serialize;

/// Mean and population standard deviation of a scalar field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapStats {
    pub mean: f64,
    pub stddev: f64,
}

/// Computes mean and population standard deviation in one pass.
///
/// The variance is obtained as `sum_sq/n - mean²` and clamped to zero before
/// the square root, since floating-point cancellation can push it slightly
/// negative for near-constant data. An empty slice yields zeros.
pub fn compute(values: &[f32]) -> MapStats {
    if values.is_empty() {
        return MapStats {
            mean: 0.0,
            stddev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mut sum = 0.0f64;
    let mut sq_sum = 0.0f64;
    for &v in values {
        let v = v as f64;
        sum += v;
        sq_sum += v * v;
    }
    let mean = sum / n;
    let variance = (sq_sum / n - mean * mean).max(0.0);
    MapStats {
        mean,
        stddev: variance.sqrt(),
    }
}
