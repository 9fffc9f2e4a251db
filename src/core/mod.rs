//! Core data types for the pricing engine
//!
//! Defines fundamental types:
//! - OptionSpec: spot, strike, maturity, rate, vol, type (call/put)
//! - Greeks: sensitivities in reporting units
//! - ContractSnapshot / QuoteChain: market data handed in by a collaborator
//! - Grid: heatmap output

pub mod option;
pub mod quote;
pub mod grid;
pub mod greeks;
pub mod error;

pub use option::*;
pub use quote::*;
pub use grid::*;
pub use greeks::*;
pub use error::*;
