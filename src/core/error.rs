//! Error types for the pricing engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionsError {
    /// Model inputs violate the positivity invariants or produce a non-finite intermediate
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Strategy legs do not match the shape required by the strategy kind
    #[error("Invalid strategy shape: {0}")]
    InvalidStrategyShape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type OptionsResult<T> = Result<T, OptionsError>;

impl OptionsError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_strategy_shape(msg: impl Into<String>) -> Self {
        Self::InvalidStrategyShape(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// True for the input-validation failure kind
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// True for the strategy-shape failure kind
    pub fn is_invalid_strategy_shape(&self) -> bool {
        matches!(self, Self::InvalidStrategyShape(_))
    }
}
