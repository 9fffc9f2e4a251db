//! Option contract definitions
//!
//! Pricing inputs for a single European option and the trade direction
//! of a position in it.

use serde::{Deserialize, Serialize};

use super::error::{OptionsError, OptionsResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// Trade direction of a leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Long,
    Short,
}

impl Position {
    /// +1 for long, -1 for short
    pub fn sign(&self) -> f64 {
        match self {
            Position::Long => 1.0,
            Position::Short => -1.0,
        }
    }
}

/// Pricing inputs for one European option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Underlying spot price
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Time to maturity in years
    pub time_to_maturity: f64,
    /// Continuously compounded risk-free rate
    pub risk_free_rate: f64,
    /// Annualized volatility
    pub volatility: f64,
    /// Option type (Call/Put)
    pub option_type: OptionType,
}

impl OptionSpec {
    /// Build a spec, rejecting inputs for which the closed form is undefined
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_maturity: f64,
        risk_free_rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> OptionsResult<Self> {
        let spec = Self {
            spot,
            strike,
            time_to_maturity,
            risk_free_rate,
            volatility,
            option_type,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn call(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> OptionsResult<Self> {
        Self::new(spot, strike, time, rate, vol, OptionType::Call)
    }

    pub fn put(spot: f64, strike: f64, time: f64, rate: f64, vol: f64) -> OptionsResult<Self> {
        Self::new(spot, strike, time, rate, vol, OptionType::Put)
    }

    /// Check the positivity invariants and finiteness of every field
    pub fn validate(&self) -> OptionsResult<()> {
        check_positive("spot", self.spot)?;
        check_positive("strike", self.strike)?;
        check_positive("time to maturity", self.time_to_maturity)?;
        check_positive("volatility", self.volatility)?;
        if !self.risk_free_rate.is_finite() {
            return Err(OptionsError::invalid_input(format!(
                "risk-free rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }

    /// Same contract with a different spot
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    pub fn with_strike(self, strike: f64) -> Self {
        Self { strike, ..self }
    }

    pub fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    pub fn with_time(self, time_to_maturity: f64) -> Self {
        Self {
            time_to_maturity,
            ..self
        }
    }

    pub fn with_rate(self, risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            ..self
        }
    }

    pub fn with_type(self, option_type: OptionType) -> Self {
        Self {
            option_type,
            ..self
        }
    }

    /// Moneyness: K/S
    pub fn moneyness(&self) -> f64 {
        self.strike / self.spot
    }

    /// Discount factor e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_maturity).exp()
    }

    /// Intrinsic value at the current spot
    pub fn intrinsic(&self) -> f64 {
        self.option_type.intrinsic(self.spot, self.strike)
    }

    /// Is this option in the money?
    pub fn is_itm(&self) -> bool {
        match self.option_type {
            OptionType::Call => self.spot > self.strike,
            OptionType::Put => self.spot < self.strike,
        }
    }

    /// Is this option at the money (within tolerance)?
    pub fn is_atm(&self, tolerance: f64) -> bool {
        (self.strike - self.spot).abs() / self.spot < tolerance
    }

    /// Is this option out of the money?
    pub fn is_otm(&self) -> bool {
        !self.is_itm() && !self.is_atm(0.01)
    }
}

fn check_positive(name: &str, value: f64) -> OptionsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(OptionsError::invalid_input(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.phi(), 1.0);
        assert_eq!(OptionType::Put.phi(), -1.0);

        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        assert!(OptionSpec::call(0.0, 100.0, 1.0, 0.01, 0.2).is_err());
        assert!(OptionSpec::call(100.0, -5.0, 1.0, 0.01, 0.2).is_err());
        assert!(OptionSpec::put(100.0, 100.0, 0.0, 0.01, 0.2).is_err());
        assert!(OptionSpec::put(100.0, 100.0, 1.0, 0.01, 0.0).is_err());
        assert!(OptionSpec::put(100.0, 100.0, 1.0, f64::NAN, 0.2).is_err());

        let err = OptionSpec::call(0.0, 100.0, 1.0, 0.01, 0.2).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_negative_rate_is_allowed() {
        assert!(OptionSpec::call(100.0, 100.0, 1.0, -0.005, 0.2).is_ok());
    }

    #[test]
    fn test_moneyness() {
        let spec = OptionSpec::call(500.0, 500.0, 0.5, 0.01, 0.2).unwrap();

        // ATM
        assert!(spec.is_atm(0.01));
        // ITM call
        assert!(spec.with_spot(510.0).is_itm());
        // OTM call
        assert!(spec.with_spot(490.0).is_otm());
        // OTM put at higher spot
        assert!(spec.with_type(OptionType::Put).with_spot(510.0).is_otm());
    }
}
