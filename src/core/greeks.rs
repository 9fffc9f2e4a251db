//! Option Greeks
//!
//! First and second order sensitivities, in reporting units.

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Vega: dV/dσ per 1 vol point
    pub vega: f64,
    /// Theta: -dV/dT per calendar day
    pub theta: f64,
    /// Rho: dV/dr per 1 rate point
    pub rho: f64,
}

/// Selector for a single Greek, used by heatmaps and tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GreekKind {
    Delta,
    Gamma,
    Vega,
    Theta,
    Rho,
}

impl GreekKind {
    pub const ALL: [GreekKind; 5] = [
        GreekKind::Delta,
        GreekKind::Gamma,
        GreekKind::Vega,
        GreekKind::Theta,
        GreekKind::Rho,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            GreekKind::Delta => "Delta",
            GreekKind::Gamma => "Gamma",
            GreekKind::Vega => "Vega",
            GreekKind::Theta => "Theta",
            GreekKind::Rho => "Rho",
        }
    }
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, vega: f64, theta: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            vega,
            theta,
            rho,
        }
    }

    /// Value of the selected Greek
    pub fn get(&self, kind: GreekKind) -> f64 {
        match kind {
            GreekKind::Delta => self.delta,
            GreekKind::Gamma => self.gamma,
            GreekKind::Vega => self.vega,
            GreekKind::Theta => self.theta,
            GreekKind::Rho => self.rho,
        }
    }

    /// Scale Greeks by a factor (e.g., signed quantity)
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            delta: self.delta * factor,
            gamma: self.gamma * factor,
            vega: self.vega * factor,
            theta: self.theta * factor,
            rho: self.rho * factor,
        }
    }

    /// Add two Greeks (for multi-leg positions)
    pub fn add(&self, other: &Greeks) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            vega: self.vega + other.vega,
            theta: self.theta + other.theta,
            rho: self.rho + other.rho,
        }
    }
}

impl std::iter::Sum for Greeks {
    fn sum<I: Iterator<Item = Greeks>>(iter: I) -> Self {
        iter.fold(Greeks::default(), |acc, g| acc.add(&g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_add() {
        let g = Greeks::new(0.5, 0.02, 0.4, -0.02, 0.3);
        let short = g.scale(-2.0);
        assert_eq!(short.delta, -1.0);
        assert_eq!(short.gamma, -0.04);

        let flat = g.add(&g.scale(-1.0));
        for kind in GreekKind::ALL {
            assert!(flat.get(kind).abs() < 1e-15, "{} not flat", kind.name());
        }
    }

    #[test]
    fn test_sum() {
        let legs = vec![Greeks::new(0.6, 0.01, 0.3, -0.01, 0.2); 3];
        let total: Greeks = legs.into_iter().sum();
        assert!((total.delta - 1.8).abs() < 1e-12);
        assert!((total.rho - 0.6).abs() < 1e-12);
    }
}
