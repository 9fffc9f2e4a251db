//! Payoff at maturity
//!
//! - Single legs: intrinsic value net of premium over a price grid
//! - Strategies: validated multi-leg combinations with break-even solving

pub mod leg;
pub mod strategy;

pub use leg::*;
pub use strategy::*;
