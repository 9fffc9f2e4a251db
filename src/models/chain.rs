//! Chain analytics
//!
//! Black-Scholes evaluated across a quoted chain, each contract at its own
//! implied volatility: model vs. market prices and a per-strike Greeks table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::black_scholes;
use crate::core::{ContractSnapshot, Greeks, OptionType, OptionsResult, QuoteChain};

/// Market price next to the model price at the quoted IV
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketComparison {
    pub strike: f64,
    pub implied_volatility: f64,
    pub market_price: f64,
    pub model_price: f64,
}

impl MarketComparison {
    /// Market minus model
    pub fn difference(&self) -> f64 {
        self.market_price - self.model_price
    }
}

/// Greeks of one quoted strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeGreeks {
    pub strike: f64,
    pub implied_volatility: f64,
    pub greeks: Greeks,
}

fn usable<'a>(
    chain: &'a QuoteChain,
    option_type: OptionType,
    need_price: bool,
) -> impl Iterator<Item = &'a ContractSnapshot> + 'a {
    chain.side(option_type).iter().filter(move |q| {
        let ok = q.has_model_inputs() && (!need_price || q.has_price());
        if !ok {
            tracing::warn!(
                underlying = %chain.underlying,
                strike = q.strike,
                iv = q.implied_volatility,
                "skipping quote without usable model inputs"
            );
        }
        ok
    })
}

/// Model vs. market price for every usable quote on one side of the chain
pub fn model_vs_market(
    chain: &QuoteChain,
    option_type: OptionType,
    rate: f64,
    as_of: NaiveDate,
) -> OptionsResult<Vec<MarketComparison>> {
    let rows = usable(chain, option_type, true)
        .map(|q| {
            let spec = chain.spec_for(q, option_type, rate, as_of)?;
            Ok(MarketComparison {
                strike: q.strike,
                implied_volatility: q.implied_volatility,
                market_price: q.last_price,
                model_price: black_scholes::price(&spec)?,
            })
        })
        .collect::<OptionsResult<Vec<_>>>()?;

    tracing::debug!(
        underlying = %chain.underlying,
        side = ?option_type,
        rows = rows.len(),
        "model vs market"
    );
    Ok(rows)
}

/// Greeks for every usable quote on one side of the chain
pub fn greeks_table(
    chain: &QuoteChain,
    option_type: OptionType,
    rate: f64,
    as_of: NaiveDate,
) -> OptionsResult<Vec<StrikeGreeks>> {
    usable(chain, option_type, false)
        .map(|q| {
            let spec = chain.spec_for(q, option_type, rate, as_of)?;
            Ok(StrikeGreeks {
                strike: q.strike,
                implied_volatility: q.implied_volatility,
                greeks: black_scholes::greeks(&spec)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionSpec;

    fn chain() -> QuoteChain {
        let mut chain = QuoteChain::new("SPY", 100.0, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        chain.add_call(ContractSnapshot::new(95.0, 9.0, 0.21, 10));
        chain.add_call(ContractSnapshot::new(105.0, 3.5, 0.19, 10));
        chain.add_call(ContractSnapshot::new(120.0, 0.4, 0.0, 3));
        chain.add_put(ContractSnapshot::new(95.0, 2.9, 0.23, 10));
        chain.add_put(ContractSnapshot::new(90.0, f64::NAN, 0.25, 10));
        chain
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_model_vs_market_uses_row_iv() {
        let rows = model_vs_market(&chain(), OptionType::Call, 0.01, as_of()).unwrap();
        assert_eq!(rows.len(), 2);

        let expected = black_scholes::price(&OptionSpec::call(100.0, 95.0, 1.0, 0.01, 0.21).unwrap())
            .unwrap();
        assert_eq!(rows[0].strike, 95.0);
        assert!((rows[0].model_price - expected).abs() < 1e-12);
        assert!((rows[0].difference() - (9.0 - expected)).abs() < 1e-12);
    }

    #[test]
    fn test_unpriced_rows_skipped_only_when_price_needed() {
        let chain = chain();
        assert_eq!(model_vs_market(&chain, OptionType::Put, 0.01, as_of()).unwrap().len(), 1);

        let table = greeks_table(&chain, OptionType::Put, 0.01, as_of()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.iter().all(|r| r.greeks.delta < 0.0 && r.greeks.rho < 0.0));
    }

    #[test]
    fn test_expired_chain_is_an_error() {
        let late = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert!(greeks_table(&chain(), OptionType::Call, 0.01, late).is_err());
    }
}
