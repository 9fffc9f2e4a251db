//! Pricing Models
//!
//! Implements:
//! - Black-Scholes (closed-form European price and Greeks)
//! - Chain analytics (model vs. market, per-strike Greeks)
//! - Heatmap evaluation of prices and Greeks over two-dimensional grids

pub mod black_scholes;
pub mod chain;
pub mod heatmap;

pub use black_scholes::*;
pub use chain::*;
pub use heatmap::*;
