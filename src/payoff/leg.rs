//! Single-leg payoff at maturity
//!
//! A leg is one traded option with a known entry premium. Its profit/loss
//! at maturity is the intrinsic value net of the premium, signed by the
//! position.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::{
    linspace, Greeks, OptionSpec, OptionType, OptionsError, OptionsResult, Position, QuoteChain,
};
use crate::models::black_scholes;

/// One traded option with its entry price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Contract pricing inputs
    pub spec: OptionSpec,
    /// Long (bought) or short (written)
    pub position: Position,
    /// Premium per unit, theoretical or market-observed
    pub premium: f64,
}

impl Leg {
    pub fn new(spec: OptionSpec, position: Position, premium: f64) -> OptionsResult<Self> {
        let leg = Self {
            spec,
            position,
            premium,
        };
        leg.validate()?;
        Ok(leg)
    }

    pub fn long(spec: OptionSpec, premium: f64) -> OptionsResult<Self> {
        Self::new(spec, Position::Long, premium)
    }

    pub fn short(spec: OptionSpec, premium: f64) -> OptionsResult<Self> {
        Self::new(spec, Position::Short, premium)
    }

    /// Leg whose premium is the Black-Scholes price of its contract
    pub fn priced(spec: OptionSpec, position: Position) -> OptionsResult<Self> {
        let premium = black_scholes::price(&spec)?;
        Self::new(spec, position, premium)
    }

    /// Leg priced at the chain's last traded price for the quoted strike
    pub fn from_market(
        chain: &QuoteChain,
        option_type: OptionType,
        strike: f64,
        position: Position,
        rate: f64,
        as_of: NaiveDate,
    ) -> OptionsResult<Self> {
        let quote = chain.quote_at(option_type, strike).ok_or_else(|| {
            OptionsError::invalid_input(format!(
                "no {:?} quote at strike {} for {}",
                option_type, strike, chain.underlying
            ))
        })?;
        let spec = chain.spec_for(quote, option_type, rate, as_of)?;
        Self::new(spec, position, quote.last_price)
    }

    pub fn validate(&self) -> OptionsResult<()> {
        self.spec.validate()?;
        if !self.premium.is_finite() || self.premium < 0.0 {
            return Err(OptionsError::invalid_input(format!(
                "premium must be non-negative and finite, got {}",
                self.premium
            )));
        }
        Ok(())
    }

    pub fn option_type(&self) -> OptionType {
        self.spec.option_type
    }

    pub fn strike(&self) -> f64 {
        self.spec.strike
    }

    /// Intrinsic value at the given price at maturity
    pub fn intrinsic_at(&self, price: f64) -> f64 {
        self.spec.option_type.intrinsic(price, self.spec.strike)
    }

    /// Net P&L per unit at the given price at maturity
    pub fn pnl_at(&self, price: f64) -> f64 {
        self.position.sign() * (self.intrinsic_at(price) - self.premium)
    }

    /// Premium cash flow at entry: positive when received, negative when paid
    pub fn net_premium(&self) -> f64 {
        -self.position.sign() * self.premium
    }

    /// Greeks of the position (sign follows the trade direction)
    pub fn greeks(&self) -> OptionsResult<Greeks> {
        Ok(black_scholes::greeks(&self.spec)?.scale(self.position.sign()))
    }
}

/// Net profit/loss at maturity over a price grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayoffCurve {
    /// Prices at maturity, strictly increasing
    pub prices: Vec<f64>,
    /// P&L at each price
    pub pnl: Vec<f64>,
}

impl PayoffCurve {
    /// Evaluate `f` at every grid price
    pub fn from_fn(grid: &[f64], f: impl Fn(f64) -> f64) -> Self {
        Self {
            prices: grid.to_vec(),
            pnl: grid.iter().map(|&s| f(s)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// (price, pnl) pairs
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.prices.iter().copied().zip(self.pnl.iter().copied())
    }

    /// Highest P&L on the grid and the price where it occurs
    pub fn max_point(&self) -> Option<(f64, f64)> {
        self.points()
            .fold(None, |best: Option<(f64, f64)>, p| match best {
                Some(b) if b.1 >= p.1 => Some(b),
                _ => Some(p),
            })
    }

    /// Lowest P&L on the grid and the price where it occurs
    pub fn min_point(&self) -> Option<(f64, f64)> {
        self.points()
            .fold(None, |best: Option<(f64, f64)>, p| match best {
                Some(b) if b.1 <= p.1 => Some(b),
                _ => Some(p),
            })
    }

    pub fn max_pnl(&self) -> Option<f64> {
        self.max_point().map(|(_, v)| v)
    }

    pub fn min_pnl(&self) -> Option<f64> {
        self.min_point().map(|(_, v)| v)
    }

    /// Linear interpolation of the P&L at `price`; `None` outside the grid
    pub fn value_at(&self, price: f64) -> Option<f64> {
        let first = *self.prices.first()?;
        let last = *self.prices.last()?;
        if !(price >= first && price <= last) {
            return None;
        }

        let hi = self.prices.partition_point(|&p| p < price);
        if hi == 0 || self.prices[hi] == price {
            return Some(self.pnl[hi]);
        }
        let lo = hi - 1;
        let frac = (price - self.prices[lo]) / (self.prices[hi] - self.prices[lo]);
        Some(self.pnl[lo] + frac * (self.pnl[hi] - self.pnl[lo]))
    }

    /// Prices where the P&L crosses zero, found by linear interpolation
    /// between neighbouring grid points. Ascending.
    pub fn zero_crossings(&self) -> Vec<f64> {
        let mut roots = Vec::new();
        for (i, (p, v)) in self.points().enumerate() {
            // Grid point exactly on zero; skip the rest of a flat zero run
            if v == 0.0 {
                if i == 0 || self.pnl[i - 1] != 0.0 {
                    roots.push(p);
                }
                continue;
            }
            if let (Some(&p1), Some(&v1)) = (self.prices.get(i + 1), self.pnl.get(i + 1)) {
                if v1 != 0.0 && v.signum() != v1.signum() {
                    roots.push(p + (p1 - p) * (-v) / (v1 - v));
                }
            }
        }
        roots
    }
}

/// Payoff curve of a single leg over a price grid
pub fn leg_payoff(leg: &Leg, grid: &[f64]) -> OptionsResult<PayoffCurve> {
    leg.validate()?;
    Ok(PayoffCurve::from_fn(grid, |s| leg.pnl_at(s)))
}

/// Evenly spaced, strictly increasing, positive price grid
pub fn price_grid(lower: f64, upper: f64, points: usize) -> OptionsResult<Vec<f64>> {
    if !(lower > 0.0) || !upper.is_finite() || upper <= lower {
        return Err(OptionsError::invalid_input(format!(
            "price grid needs 0 < lower < upper, got [{}, {}]",
            lower, upper
        )));
    }
    if points < 2 {
        return Err(OptionsError::invalid_input(format!(
            "price grid needs at least 2 points, got {}",
            points
        )));
    }
    Ok(linspace(lower, upper, points))
}
