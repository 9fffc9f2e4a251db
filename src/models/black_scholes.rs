//! Black-Scholes Model
//!
//! Provides:
//! - European option pricing
//! - Analytic Greeks (delta, gamma, vega, theta, rho)
//!
//! Every price and sensitivity in the crate goes through this module, so the
//! d1/d2 terms are computed in exactly one place.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use statrs::function::erf::erfc;

use crate::core::{Greeks, OptionSpec, OptionType, OptionsError, OptionsResult};

/// Days per year used to express theta per calendar day
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Intermediate quantities shared by the price and every Greek
#[derive(Debug, Clone, Copy)]
pub struct D1D2 {
    pub d1: f64,
    pub d2: f64,
    pub sqrt_t: f64,
    /// σ√T
    pub vol_sqrt_t: f64,
    /// e^(-rT)
    pub discount: f64,
}

/// Compute d1 and d2, rejecting inputs where the closed form is undefined
pub fn d1_d2(spec: &OptionSpec) -> OptionsResult<D1D2> {
    spec.validate()?;

    let sqrt_t = spec.time_to_maturity.sqrt();
    let vol_sqrt_t = spec.volatility * sqrt_t;
    if !(vol_sqrt_t > 0.0) || !vol_sqrt_t.is_finite() {
        return Err(OptionsError::invalid_input(format!(
            "sigma * sqrt(T) is degenerate ({})",
            vol_sqrt_t
        )));
    }

    let d1 = ((spec.spot / spec.strike).ln()
        + (spec.risk_free_rate + 0.5 * spec.volatility * spec.volatility) * spec.time_to_maturity)
        / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;
    let discount = spec.discount_factor();

    if !d1.is_finite() || !d2.is_finite() || !discount.is_finite() {
        return Err(OptionsError::invalid_input(format!(
            "non-finite d1/d2 for spot={}, strike={}, T={}, sigma={}",
            spec.spot, spec.strike, spec.time_to_maturity, spec.volatility
        )));
    }

    Ok(D1D2 {
        d1,
        d2,
        sqrt_t,
        vol_sqrt_t,
        discount,
    })
}

/// Black-Scholes European option price
pub fn price(spec: &OptionSpec) -> OptionsResult<f64> {
    let d = d1_d2(spec)?;
    Ok(price_from_terms(spec, &d))
}

fn price_from_terms(spec: &OptionSpec, d: &D1D2) -> f64 {
    let value = match spec.option_type {
        OptionType::Call => {
            spec.spot * norm_cdf(d.d1) - spec.strike * d.discount * norm_cdf(d.d2)
        }
        OptionType::Put => {
            spec.strike * d.discount * norm_cdf(-d.d2) - spec.spot * norm_cdf(-d.d1)
        }
    };
    // Rounding can leave deep out-of-the-money values a hair below zero
    value.max(0.0)
}

/// Black-Scholes Greeks in reporting units
pub fn greeks(spec: &OptionSpec) -> OptionsResult<Greeks> {
    let d = d1_d2(spec)?;
    Ok(greeks_from_terms(spec, &d))
}

fn greeks_from_terms(spec: &OptionSpec, d: &D1D2) -> Greeks {
    let s = spec.spot;
    let k = spec.strike;
    let r = spec.risk_free_rate;
    let t = spec.time_to_maturity;
    let vol = spec.volatility;
    let pdf_d1 = norm_pdf(d.d1);

    // Delta
    let delta = match spec.option_type {
        OptionType::Call => norm_cdf(d.d1),
        OptionType::Put => norm_cdf(d.d1) - 1.0,
    };

    // Gamma (same for call and put)
    let gamma = pdf_d1 / (s * d.vol_sqrt_t);

    // Vega (same for call and put, per 1% vol move)
    let vega = s * pdf_d1 * d.sqrt_t / 100.0;

    // Theta (per day)
    let decay = -s * pdf_d1 * vol / (2.0 * d.sqrt_t);
    let theta = match spec.option_type {
        OptionType::Call => decay - r * k * d.discount * norm_cdf(d.d2),
        OptionType::Put => decay + r * k * d.discount * norm_cdf(-d.d2),
    };

    // Rho (per 1% rate move)
    let rho = match spec.option_type {
        OptionType::Call => k * t * d.discount * norm_cdf(d.d2) / 100.0,
        OptionType::Put => -k * t * d.discount * norm_cdf(-d.d2) / 100.0,
    };

    Greeks::new(delta, gamma, vega, theta / DAYS_PER_YEAR, rho)
}

/// Price and Greeks from a single d1/d2 evaluation
pub fn price_and_greeks(spec: &OptionSpec) -> OptionsResult<(f64, Greeks)> {
    let d = d1_d2(spec)?;
    Ok((price_from_terms(spec, &d), greeks_from_terms(spec, &d)))
}

/// Call and put prices for the same inputs
pub fn call_put_prices(spec: &OptionSpec) -> OptionsResult<(f64, f64)> {
    let call = spec.with_type(OptionType::Call);
    let d = d1_d2(&call)?;
    let put = call.with_type(OptionType::Put);
    Ok((price_from_terms(&call, &d), price_from_terms(&put, &d)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm_call() -> OptionSpec {
        OptionSpec::call(100.0, 100.0, 1.0, 0.01, 0.20).unwrap()
    }

    #[test]
    fn test_norm_cdf() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-12);
        assert!((norm_cdf(1.96) - 0.975).abs() < 0.001);
        assert!((norm_cdf(-1.96) - 0.025).abs() < 0.001);
        assert!((norm_cdf(0.15) - 0.559_617_7).abs() < 1e-6);
    }

    #[test]
    fn test_norm_pdf() {
        assert!((norm_pdf(0.0) - 0.398_942_28).abs() < 1e-8);
        assert!((norm_pdf(1.0) - norm_pdf(-1.0)).abs() < 1e-15);
    }

    #[test]
    fn test_bs_price() {
        let call_price = price(&atm_call()).unwrap();
        assert!((call_price - 8.4333).abs() < 1e-3, "call = {}", call_price);

        // Put-call parity check
        let put_price = price(&atm_call().with_type(OptionType::Put)).unwrap();
        let parity = call_price - put_price - (100.0 - 100.0 * (-0.01_f64).exp());
        assert!(parity.abs() < 1e-10);
    }

    #[test]
    fn test_greeks() {
        let g = greeks(&atm_call()).unwrap();

        assert!((g.delta - 0.5596).abs() < 1e-3, "delta = {}", g.delta);
        assert!((g.gamma - 0.019_72).abs() < 1e-4, "gamma = {}", g.gamma);
        assert!((g.vega - 0.3945).abs() < 1e-3, "vega = {}", g.vega);
        assert!((g.theta - (-0.012_11)).abs() < 1e-4, "theta = {}", g.theta);
        assert!((g.rho - 0.4753).abs() < 1e-3, "rho = {}", g.rho);
    }

    #[test]
    fn test_put_greeks_match_finite_differences() {
        let put = OptionSpec::put(95.0, 105.0, 0.75, 0.03, 0.25).unwrap();
        let g = greeks(&put).unwrap();
        let p = |s: OptionSpec| price(&s).unwrap();

        let hs = 1e-3;
        let fd_delta = (p(put.with_spot(95.0 + hs)) - p(put.with_spot(95.0 - hs))) / (2.0 * hs);
        assert!((g.delta - fd_delta).abs() < 1e-6);

        let fd_gamma = (p(put.with_spot(95.0 + hs)) - 2.0 * p(put) + p(put.with_spot(95.0 - hs)))
            / (hs * hs);
        assert!((g.gamma - fd_gamma).abs() < 1e-4);

        let hv = 1e-5;
        let fd_vega = (p(put.with_volatility(0.25 + hv)) - p(put.with_volatility(0.25 - hv)))
            / (2.0 * hv)
            / 100.0;
        assert!((g.vega - fd_vega).abs() < 1e-6);

        let hr = 1e-6;
        let fd_rho = (p(put.with_rate(0.03 + hr)) - p(put.with_rate(0.03 - hr))) / (2.0 * hr) / 100.0;
        assert!(g.rho < 0.0);
        assert!((g.rho - fd_rho).abs() < 1e-6);

        // Theta is the negated maturity derivative, per day
        let ht = 1e-6;
        let fd_theta = -(p(put.with_time(0.75 + ht)) - p(put.with_time(0.75 - ht))) / (2.0 * ht)
            / DAYS_PER_YEAR;
        assert!((g.theta - fd_theta).abs() < 1e-6);
    }

    #[test]
    fn test_call_theta_and_rho_match_finite_differences() {
        let call = OptionSpec::call(110.0, 100.0, 0.5, 0.04, 0.3).unwrap();
        let g = greeks(&call).unwrap();
        let p = |s: OptionSpec| price(&s).unwrap();

        let ht = 1e-6;
        let fd_theta = -(p(call.with_time(0.5 + ht)) - p(call.with_time(0.5 - ht))) / (2.0 * ht)
            / DAYS_PER_YEAR;
        assert!((g.theta - fd_theta).abs() < 1e-6);

        let hr = 1e-6;
        let fd_rho = (p(call.with_rate(0.04 + hr)) - p(call.with_rate(0.04 - hr))) / (2.0 * hr) / 100.0;
        assert!((g.rho - fd_rho).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_zero_spot() {
        let spec = OptionSpec {
            spot: 0.0,
            ..atm_call()
        };
        assert!(price(&spec).unwrap_err().is_invalid_input());
        assert!(greeks(&spec).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_rejects_underflowing_vol_sqrt_t() {
        let spec = OptionSpec {
            time_to_maturity: 1e-300,
            volatility: 1e-200,
            ..atm_call()
        };
        assert!(price(&spec).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_price_and_greeks_agree_with_separate_calls() {
        let spec = atm_call().with_type(OptionType::Put);
        let (p, g) = price_and_greeks(&spec).unwrap();
        assert_eq!(p, price(&spec).unwrap());
        assert_eq!(g, greeks(&spec).unwrap());

        let (c, pp) = call_put_prices(&spec).unwrap();
        assert_eq!(pp, p);
        assert_eq!(c, price(&atm_call()).unwrap());
    }

    #[test]
    fn test_expiry_limit_approaches_intrinsic() {
        let call = OptionSpec::call(110.0, 100.0, 1e-8, 0.01, 0.2).unwrap();
        assert_eq!(call.intrinsic(), 10.0);
        assert!((price(&call).unwrap() - call.intrinsic()).abs() < 1e-6);

        let put = OptionSpec::put(90.0, 100.0, 1e-8, 0.01, 0.2).unwrap();
        assert!((price(&put).unwrap() - put.intrinsic()).abs() < 1e-6);

        let otm = OptionSpec::call(90.0, 100.0, 1e-8, 0.01, 0.2).unwrap();
        assert_eq!(otm.intrinsic(), 0.0);
        assert!(price(&otm).unwrap() < 1e-9);
    }
}
