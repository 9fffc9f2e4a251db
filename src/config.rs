//! Engine configuration
//!
//! Scalar parameters a presentation layer hands to the engine: rate,
//! quantity and the resolution of the payoff and heatmap grids.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{linspace, OptionsError, OptionsResult};
use crate::models::{GridEvaluator, DEFAULT_PARALLEL_THRESHOLD};
use crate::payoff::price_grid;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Risk-free rate
    /// Default: 0.01
    pub risk_free_rate: f64,

    /// Units per strategy
    /// Default: 1
    pub quantity: u32,

    /// Prices at maturity for payoff curves
    pub payoff_grid: PriceGridConfig,

    /// Spot/volatility axes for heatmaps
    pub heatmap: HeatmapConfig,

    /// Grids with at least this many cells are evaluated in parallel
    /// Default: 4096
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.01,
            quantity: 1,
            payoff_grid: PriceGridConfig::default(),
            heatmap: HeatmapConfig::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Dense grids for detailed charts
    pub fn fine() -> Self {
        Self {
            payoff_grid: PriceGridConfig {
                points: 1200,
                ..Default::default()
            },
            heatmap: HeatmapConfig {
                resolution: 60,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Sparse grids for quick previews
    pub fn coarse() -> Self {
        Self {
            payoff_grid: PriceGridConfig {
                points: 61,
                ..Default::default()
            },
            heatmap: HeatmapConfig {
                resolution: 10,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> OptionsResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(OptionsError::config(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if self.quantity == 0 {
            return Err(OptionsError::config("quantity must be at least 1"));
        }
        self.payoff_grid.validate()?;
        self.heatmap.validate()
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json_str(json: &str) -> OptionsResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| OptionsError::serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> OptionsResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        tracing::info!("Loaded engine config from {:?}", path);
        Ok(config)
    }

    /// Payoff price grid
    pub fn price_grid(&self) -> OptionsResult<Vec<f64>> {
        self.payoff_grid.grid()
    }

    /// Payoff grid spanning half to one and a half times the strike
    pub fn relative_price_grid(&self, strike: f64) -> OptionsResult<Vec<f64>> {
        price_grid(0.5 * strike, 1.5 * strike, self.payoff_grid.points)
    }

    pub fn evaluator(&self) -> GridEvaluator {
        GridEvaluator::new(self.parallel_threshold)
    }
}

/// Evenly spaced prices at maturity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceGridConfig {
    /// Default: 40.0
    pub lower: f64,
    /// Default: 160.0
    pub upper: f64,
    /// Default: 300
    pub points: usize,
}

impl Default for PriceGridConfig {
    fn default() -> Self {
        Self {
            lower: 40.0,
            upper: 160.0,
            points: 300,
        }
    }
}

impl PriceGridConfig {
    pub fn validate(&self) -> OptionsResult<()> {
        self.grid().map(|_| ()).map_err(|e| OptionsError::config(e.to_string()))
    }

    pub fn grid(&self) -> OptionsResult<Vec<f64>> {
        price_grid(self.lower, self.upper, self.points)
    }
}

/// Spot and volatility axes of a heatmap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Default: 70.0
    pub spot_min: f64,
    /// Default: 130.0
    pub spot_max: f64,
    /// Default: 0.05
    pub vol_min: f64,
    /// Default: 1.0
    pub vol_max: f64,
    /// Points per axis
    /// Default: 20
    pub resolution: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            spot_min: 70.0,
            spot_max: 130.0,
            vol_min: 0.05,
            vol_max: 1.0,
            resolution: 20,
        }
    }
}

impl HeatmapConfig {
    pub fn validate(&self) -> OptionsResult<()> {
        if !(self.spot_min > 0.0) || !(self.spot_max > self.spot_min) || !self.spot_max.is_finite()
        {
            return Err(OptionsError::config(format!(
                "heatmap spot range must satisfy 0 < min < max, got [{}, {}]",
                self.spot_min, self.spot_max
            )));
        }
        if !(self.vol_min > 0.0) || !(self.vol_max > self.vol_min) || !self.vol_max.is_finite() {
            return Err(OptionsError::config(format!(
                "heatmap vol range must satisfy 0 < min < max, got [{}, {}]",
                self.vol_min, self.vol_max
            )));
        }
        if self.resolution < 2 {
            return Err(OptionsError::config(format!(
                "heatmap resolution must be at least 2, got {}",
                self.resolution
            )));
        }
        Ok(())
    }

    pub fn spot_axis(&self) -> Vec<f64> {
        linspace(self.spot_min, self.spot_max, self.resolution)
    }

    pub fn vol_axis(&self) -> Vec<f64> {
        linspace(self.vol_min, self.vol_max, self.resolution)
    }
}
