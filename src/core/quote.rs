//! Option quote data
//!
//! Snapshot of an option chain handed in by a market-data collaborator:
//! per-contract last price, implied volatility and open interest, plus the
//! underlying spot and the chain's expiry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{OptionsError, OptionsResult};
use super::option::{OptionSpec, OptionType};

/// Days per year used to turn an expiry date into a maturity
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

/// One quoted contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSnapshot {
    /// Exchange contract symbol, if known
    pub contract_symbol: Option<String>,
    /// Strike price
    pub strike: f64,
    /// Last traded price
    pub last_price: f64,
    /// Implied volatility as a decimal (0.25 = 25%)
    pub implied_volatility: f64,
    /// Open interest
    pub open_interest: u64,
}

impl ContractSnapshot {
    pub fn new(strike: f64, last_price: f64, implied_volatility: f64, open_interest: u64) -> Self {
        Self {
            contract_symbol: None,
            strike,
            last_price,
            implied_volatility,
            open_interest,
        }
    }

    /// Strike and implied volatility are usable as model inputs
    pub fn has_model_inputs(&self) -> bool {
        self.strike.is_finite()
            && self.strike > 0.0
            && self.implied_volatility.is_finite()
            && self.implied_volatility > 0.0
    }

    /// Last price is usable as a premium
    pub fn has_price(&self) -> bool {
        self.last_price.is_finite() && self.last_price >= 0.0
    }
}

/// Quotes for a single expiry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteChain {
    /// Underlying symbol
    pub underlying: String,
    /// Underlying spot price
    pub spot: f64,
    /// Expiry date
    pub expiry: NaiveDate,
    /// Call quotes by strike
    pub calls: Vec<ContractSnapshot>,
    /// Put quotes by strike
    pub puts: Vec<ContractSnapshot>,
}

impl QuoteChain {
    pub fn new(underlying: impl Into<String>, spot: f64, expiry: NaiveDate) -> Self {
        Self {
            underlying: underlying.into(),
            spot,
            expiry,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Add a call quote
    pub fn add_call(&mut self, quote: ContractSnapshot) {
        self.calls.push(quote);
        self.calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    /// Add a put quote
    pub fn add_put(&mut self, quote: ContractSnapshot) {
        self.puts.push(quote);
        self.puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    /// Quotes of one side of the chain
    pub fn side(&self, option_type: OptionType) -> &[ContractSnapshot] {
        match option_type {
            OptionType::Call => &self.calls,
            OptionType::Put => &self.puts,
        }
    }

    /// Quote at strike
    pub fn quote_at(&self, option_type: OptionType, strike: f64) -> Option<&ContractSnapshot> {
        self.side(option_type)
            .iter()
            .find(|q| (q.strike - strike).abs() < 0.01)
    }

    /// Get all strikes
    pub fn strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self
            .calls
            .iter()
            .chain(self.puts.iter())
            .map(|q| q.strike)
            .collect();
        strikes.sort_by(f64::total_cmp);
        strikes.dedup();
        strikes
    }

    /// Strike closest to spot
    pub fn atm_strike(&self) -> Option<f64> {
        self.strikes()
            .into_iter()
            .min_by(|a, b| (self.spot - a).abs().total_cmp(&(self.spot - b).abs()))
    }

    /// Maturity in years: whole calendar days to expiry over 365
    pub fn time_to_expiry(&self, as_of: NaiveDate) -> OptionsResult<f64> {
        let days = (self.expiry - as_of).num_days();
        if days <= 0 {
            return Err(OptionsError::invalid_input(format!(
                "expiry {} is not after {}",
                self.expiry, as_of
            )));
        }
        Ok(days as f64 / CALENDAR_DAYS_PER_YEAR)
    }

    /// Implied volatility smile: (strike, iv) sorted by strike, unusable rows dropped
    pub fn smile(&self, option_type: OptionType) -> Vec<(f64, f64)> {
        let mut smile: Vec<(f64, f64)> = self
            .side(option_type)
            .iter()
            .filter(|q| q.has_model_inputs())
            .map(|q| (q.strike, q.implied_volatility))
            .collect();
        smile.sort_by(|a, b| a.0.total_cmp(&b.0));
        smile
    }

    /// Model inputs for a quoted contract at its own implied volatility
    pub fn spec_for(
        &self,
        quote: &ContractSnapshot,
        option_type: OptionType,
        rate: f64,
        as_of: NaiveDate,
    ) -> OptionsResult<OptionSpec> {
        OptionSpec::new(
            self.spot,
            quote.strike,
            self.time_to_expiry(as_of)?,
            rate,
            quote.implied_volatility,
            option_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> QuoteChain {
        let mut chain = QuoteChain::new(
            "SPY",
            100.0,
            NaiveDate::from_ymd_opt(2025, 12, 19).unwrap(),
        );
        chain.add_call(ContractSnapshot::new(110.0, 2.1, 0.18, 500));
        chain.add_call(ContractSnapshot::new(90.0, 12.4, 0.24, 120));
        chain.add_call(ContractSnapshot::new(100.0, 5.6, 0.0, 900));
        chain.add_put(ContractSnapshot::new(95.0, 3.2, 0.22, 300));
        chain.add_put(ContractSnapshot::new(100.0, 4.9, f64::NAN, 40));
        chain
    }

    #[test]
    fn test_time_to_expiry() {
        let chain = chain();
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 22).unwrap();
        let t = chain.time_to_expiry(as_of).unwrap();
        assert!((t - 180.0 / 365.0).abs() < 1e-12);

        let late = NaiveDate::from_ymd_opt(2025, 12, 19).unwrap();
        assert!(chain.time_to_expiry(late).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_smile_drops_unusable_rows() {
        let chain = chain();
        assert_eq!(chain.smile(OptionType::Call), vec![(90.0, 0.24), (110.0, 0.18)]);
        assert_eq!(chain.smile(OptionType::Put), vec![(95.0, 0.22)]);
    }

    #[test]
    fn test_lookup() {
        let chain = chain();
        assert_eq!(chain.strikes(), vec![90.0, 95.0, 100.0, 110.0]);
        assert_eq!(chain.atm_strike(), Some(100.0));
        assert_eq!(chain.quote_at(OptionType::Call, 90.0).map(|q| q.last_price), Some(12.4));
        assert!(chain.quote_at(OptionType::Put, 90.0).is_none());
    }
}
