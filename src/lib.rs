//! # BSM Options - European Option Pricing and Strategy Payoffs
//!
//! A pure, stateless options engine built on the Black-Scholes-Merton model.
//!
//! ## Key Components
//!
//! - **Black-Scholes**: Closed-form European price and Greeks in reporting units
//! - **Chain Analytics**: Model vs. market prices and per-strike Greeks for a quoted chain
//! - **Payoffs**: Single-leg P&L at maturity over a price grid
//! - **Strategies**: Eleven multi-leg strategies with shape validation and break-evens
//! - **Heatmaps**: Prices and Greeks over (spot, vol) and other two-axis grids
//!
//! ## Usage
//!
//! ```rust
//! use bsm_options::prelude::*;
//!
//! let spec = OptionSpec::call(100.0, 100.0, 1.0, 0.01, 0.2).unwrap();
//! let price = bs_price(&spec).unwrap();
//! assert!((price - 8.4333).abs() < 1e-3);
//!
//! let inputs = StrategyInputs {
//!     spot: 100.0,
//!     strike_1: 95.0,
//!     strike_2: 105.0,
//!     time_to_maturity: 0.5,
//!     risk_free_rate: 0.01,
//!     volatility: 0.2,
//! };
//! let spread = Strategy::from_model(StrategyKind::BullCallSpread, &inputs, 1).unwrap();
//! let grid = EngineConfig::default().price_grid().unwrap();
//! let report = spread.report(&grid);
//! assert_eq!(report.break_even.len(), 1);
//! ```
//!
//! ## Units
//!
//! - Vega: per 1 volatility point
//! - Theta: per calendar day
//! - Rho: per 1 rate point
//!
//! ## What This Engine Does NOT Do
//!
//! - Price American exercise or dividends
//! - Solve for implied volatility
//! - Fetch market data or render charts

pub mod config;
pub mod core;
pub mod models;
pub mod payoff;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        linspace, ContractSnapshot, GreekKind, Greeks, Grid, OptionSpec, OptionType,
        OptionsError, OptionsResult, Position, QuoteChain,
    };

    // Models
    pub use crate::models::{
        greeks as bs_greeks, greeks_table, model_vs_market, norm_cdf, norm_pdf,
        price as bs_price, price_and_greeks, GridEvaluator, MarketComparison, StrikeGreeks,
    };

    // Payoffs
    pub use crate::payoff::{
        compose_strategy, leg_payoff, price_grid, BreakEven, Leg, PayoffCurve, Strategy,
        StrategyInputs, StrategyKind, StrategyReport,
    };

    // Config
    pub use crate::config::{EngineConfig, HeatmapConfig, PriceGridConfig};
}

// Re-export main types at crate root
pub use crate::config::EngineConfig;
pub use crate::core::{OptionsError, OptionsResult};
