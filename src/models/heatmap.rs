//! Price and Greek heatmaps
//!
//! Evaluates a function of two variables over a rectangular grid. Cells are
//! independent, so large grids are split by row across the rayon pool and
//! reassembled by index; the result is identical to sequential evaluation.

use ndarray::Array2;
use rayon::prelude::*;

use super::black_scholes;
use crate::core::{GreekKind, Grid, OptionSpec, OptionsError, OptionsResult};

/// Grids with at least this many cells are evaluated in parallel by default
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Evaluate `f(x, y)` over every grid cell: `z[[i, j]] = f(x_axis[j], y_axis[i])`
pub fn evaluate_grid<F>(x_axis: &[f64], y_axis: &[f64], f: F) -> Grid
where
    F: Fn(f64, f64) -> f64,
{
    let z = Array2::from_shape_fn((y_axis.len(), x_axis.len()), |(i, j)| f(x_axis[j], y_axis[i]));
    Grid {
        x_axis: x_axis.to_vec(),
        y_axis: y_axis.to_vec(),
        z,
    }
}

/// Parallel [`evaluate_grid`]
pub fn evaluate_grid_par<F>(x_axis: &[f64], y_axis: &[f64], f: F) -> Grid
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    let rows: Vec<Vec<f64>> = y_axis
        .par_iter()
        .map(|&y| x_axis.iter().map(|&x| f(x, y)).collect())
        .collect();
    let z = Array2::from_shape_fn((y_axis.len(), x_axis.len()), |(i, j)| rows[i][j]);
    Grid {
        x_axis: x_axis.to_vec(),
        y_axis: y_axis.to_vec(),
        z,
    }
}

/// Fallible grid evaluation; the first failing cell aborts the whole grid
pub fn try_evaluate_grid<F>(x_axis: &[f64], y_axis: &[f64], f: F) -> OptionsResult<Grid>
where
    F: Fn(f64, f64) -> OptionsResult<f64>,
{
    let mut values = Vec::with_capacity(x_axis.len() * y_axis.len());
    for &y in y_axis {
        for &x in x_axis {
            values.push(f(x, y)?);
        }
    }
    assemble(x_axis, y_axis, values)
}

/// Parallel [`try_evaluate_grid`]
pub fn try_evaluate_grid_par<F>(x_axis: &[f64], y_axis: &[f64], f: F) -> OptionsResult<Grid>
where
    F: Fn(f64, f64) -> OptionsResult<f64> + Sync,
{
    let rows = y_axis
        .par_iter()
        .map(|&y| x_axis.iter().map(|&x| f(x, y)).collect::<OptionsResult<Vec<f64>>>())
        .collect::<OptionsResult<Vec<Vec<f64>>>>()?;
    assemble(x_axis, y_axis, rows.into_iter().flatten().collect())
}

fn assemble(x_axis: &[f64], y_axis: &[f64], values: Vec<f64>) -> OptionsResult<Grid> {
    let z = Array2::from_shape_vec((y_axis.len(), x_axis.len()), values)
        .map_err(|e| OptionsError::invalid_input(format!("grid shape: {}", e)))?;
    Ok(Grid {
        x_axis: x_axis.to_vec(),
        y_axis: y_axis.to_vec(),
        z,
    })
}

/// Heatmap builder holding the sequential/parallel switch-over point
#[derive(Debug, Clone, Copy)]
pub struct GridEvaluator {
    pub parallel_threshold: usize,
}

impl Default for GridEvaluator {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl GridEvaluator {
    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }

    /// Evaluate a fallible cell function, in parallel for large grids
    pub fn evaluate<F>(&self, x_axis: &[f64], y_axis: &[f64], f: F) -> OptionsResult<Grid>
    where
        F: Fn(f64, f64) -> OptionsResult<f64> + Sync,
    {
        let cells = x_axis.len() * y_axis.len();
        let parallel = cells >= self.parallel_threshold;
        tracing::debug!(
            rows = y_axis.len(),
            cols = x_axis.len(),
            parallel,
            "evaluating grid"
        );

        if parallel {
            try_evaluate_grid_par(x_axis, y_axis, f)
        } else {
            try_evaluate_grid(x_axis, y_axis, f)
        }
    }

    /// Option price over (spot, volatility), other inputs from `base`
    pub fn price_heatmap(
        &self,
        base: &OptionSpec,
        spots: &[f64],
        vols: &[f64],
    ) -> OptionsResult<Grid> {
        self.evaluate(spots, vols, |spot, vol| {
            black_scholes::price(&base.with_spot(spot).with_volatility(vol))
        })
    }

    /// One Greek over (spot, volatility), other inputs from `base`
    pub fn greek_heatmap(
        &self,
        base: &OptionSpec,
        greek: GreekKind,
        spots: &[f64],
        vols: &[f64],
    ) -> OptionsResult<Grid> {
        self.evaluate(spots, vols, |spot, vol| {
            let g = black_scholes::greeks(&base.with_spot(spot).with_volatility(vol))?;
            Ok(g.get(greek))
        })
    }

    /// One Greek over (strike, volatility), other inputs from `base`
    pub fn greek_heatmap_over_strike_vol(
        &self,
        base: &OptionSpec,
        greek: GreekKind,
        strikes: &[f64],
        vols: &[f64],
    ) -> OptionsResult<Grid> {
        self.evaluate(strikes, vols, |strike, vol| {
            let g = black_scholes::greeks(&base.with_strike(strike).with_volatility(vol))?;
            Ok(g.get(greek))
        })
    }

    /// Option price over (strike, maturity), other inputs from `base`
    pub fn price_heatmap_over_strike_maturity(
        &self,
        base: &OptionSpec,
        strikes: &[f64],
        maturities: &[f64],
    ) -> OptionsResult<Grid> {
        self.evaluate(strikes, maturities, |strike, time| {
            black_scholes::price(&base.with_strike(strike).with_time(time))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{linspace, OptionType};

    fn base() -> OptionSpec {
        OptionSpec::call(100.0, 100.0, 1.0, 0.01, 0.2).unwrap()
    }

    #[test]
    fn test_grid_shape_and_indexing() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0];
        let grid = evaluate_grid(&xs, &ys, |x, y| x * 100.0 + y);

        assert_eq!(grid.dim(), (2, 3));
        for (i, &y) in ys.iter().enumerate() {
            for (j, &x) in xs.iter().enumerate() {
                assert_eq!(grid.z[[i, j]], x * 100.0 + y);
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let spots = linspace(70.0, 130.0, 40);
        let vols = linspace(0.05, 1.0, 30);
        let seq = GridEvaluator::sequential().price_heatmap(&base(), &spots, &vols).unwrap();
        let par = GridEvaluator::new(1).price_heatmap(&base(), &spots, &vols).unwrap();
        assert_eq!(seq, par);

        let f = |x: f64, y: f64| x.sin() * y;
        assert_eq!(evaluate_grid(&spots, &vols, f), evaluate_grid_par(&spots, &vols, f));
    }

    #[test]
    fn test_invalid_cell_fails_whole_grid() {
        let spots = linspace(70.0, 130.0, 5);
        let vols = vec![0.2, 0.0, 0.3];
        for evaluator in [GridEvaluator::sequential(), GridEvaluator::new(1)] {
            let err = evaluator.price_heatmap(&base(), &spots, &vols).unwrap_err();
            assert!(err.is_invalid_input());
        }
    }

    #[test]
    fn test_delta_heatmap_is_bounded_and_monotone_in_spot() {
        let spots = linspace(70.0, 130.0, 30);
        let vols = linspace(0.05, 1.0, 30);
        let grid = GridEvaluator::default()
            .greek_heatmap(&base(), GreekKind::Delta, &spots, &vols)
            .unwrap();

        for row in grid.to_rows() {
            assert!(row.iter().all(|&d| (0.0..=1.0).contains(&d)));
            assert!(row.windows(2).all(|w| w[1] >= w[0]));
        }
    }

    #[test]
    fn test_strike_axis_heatmaps() {
        let strikes = linspace(80.0, 120.0, 9);
        let vols = linspace(0.1, 0.5, 5);
        let put = base().with_type(OptionType::Put);
        let gamma = GridEvaluator::default()
            .greek_heatmap_over_strike_vol(&put, GreekKind::Gamma, &strikes, &vols)
            .unwrap();
        assert_eq!(gamma.dim(), (5, 9));
        assert!(gamma.min().unwrap() > 0.0);

        let maturities = linspace(0.1, 2.0, 4);
        let prices = GridEvaluator::default()
            .price_heatmap_over_strike_maturity(&base(), &strikes, &maturities)
            .unwrap();
        // Call value falls with strike
        for row in prices.to_rows() {
            assert!(row.windows(2).all(|w| w[1] <= w[0]));
        }
    }

    #[test]
    fn test_empty_axes() {
        let grid = evaluate_grid(&[], &[1.0, 2.0], |x, y| x + y);
        assert_eq!(grid.dim(), (2, 0));
        let grid = try_evaluate_grid_par(&[1.0], &[], |x, y| Ok(x + y)).unwrap();
        assert!(grid.is_empty());
    }
}
