//! Evaluation grid
//!
//! Two-dimensional output of the heatmap generator. Rows follow the y axis,
//! columns follow the x axis: `z[[i, j]]` is the value at `(x_axis[j], y_axis[i])`.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Heatmap / surface data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    /// X-axis values (columns), e.g. spot or strike
    pub x_axis: Vec<f64>,
    /// Y-axis values (rows), e.g. volatility or maturity
    pub y_axis: Vec<f64>,
    /// Values, shape (y_axis.len(), x_axis.len())
    pub z: Array2<f64>,
}

impl Grid {
    /// Number of (rows, columns)
    pub fn dim(&self) -> (usize, usize) {
        self.z.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    /// Value at row `i` (y index), column `j` (x index)
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.z.get((i, j)).copied()
    }

    /// Rows as nested vectors, for renderers that want plain arrays
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.z.outer_iter().map(|row| row.to_vec()).collect()
    }

    /// Smallest finite value
    pub fn min(&self) -> Option<f64> {
        self.z
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.min(v))))
    }

    /// Largest finite value
    pub fn max(&self) -> Option<f64> {
        self.z
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f64| a.max(v))))
    }

    /// Bilinear interpolation at (x, y), clamped to the axis bounds
    pub fn interpolate(&self, x: f64, y: f64) -> Option<f64> {
        if self.is_empty() {
            return None;
        }

        let (xi_lo, xi_hi, x_frac) = find_bracket(&self.x_axis, x)?;
        let (yi_lo, yi_hi, y_frac) = find_bracket(&self.y_axis, y)?;

        let v00 = self.z[[yi_lo, xi_lo]];
        let v01 = self.z[[yi_lo, xi_hi]];
        let v10 = self.z[[yi_hi, xi_lo]];
        let v11 = self.z[[yi_hi, xi_hi]];

        let v0 = v00 * (1.0 - x_frac) + v01 * x_frac;
        let v1 = v10 * (1.0 - x_frac) + v11 * x_frac;

        Some(v0 * (1.0 - y_frac) + v1 * y_frac)
    }
}

/// Bracketing indices and interpolation fraction on an ascending axis
fn find_bracket(axis: &[f64], value: f64) -> Option<(usize, usize, f64)> {
    if axis.is_empty() {
        return None;
    }

    // Clamp to bounds
    if value <= axis[0] {
        return Some((0, 0, 0.0));
    }
    let last = axis.len() - 1;
    if value >= axis[last] {
        return Some((last, last, 0.0));
    }

    let hi = axis.partition_point(|&a| a < value);
    let lo = hi - 1;
    let frac = (value - axis[lo]) / (axis[hi] - axis[lo]);
    Some((lo, hi, frac))
}

/// `n` evenly spaced points from `start` to `stop` inclusive
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}
