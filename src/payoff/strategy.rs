//! Multi-leg strategies
//!
//! A closed catalog of named strategies, each with a fixed leg shape.
//! Construction validates the shape; the combined payoff is the signed sum
//! of the leg payoffs (plus the underlying for a covered call) times the
//! quantity.
//!
//! Max/min P&L are read off the evaluated curve, so for strategies whose
//! payoff is unbounded they are only as wide as the price grid.
//! [`StrategyReport::max_pnl_grid_bounded`] and
//! [`StrategyReport::min_pnl_grid_bounded`] flag when prices outside the grid
//! go further, on either side; `payoff_max`/`payoff_min` carry the true
//! extremes where they exist.

use serde::{Deserialize, Serialize};

use super::leg::{Leg, PayoffCurve};
use crate::core::{Greeks, OptionSpec, OptionType, OptionsError, OptionsResult, Position};

/// Named strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    LongCall,
    ShortCall,
    LongPut,
    ShortPut,
    /// Long call at the low strike, short call at the high strike
    BullCallSpread,
    /// Short call at the low strike, long call at the high strike
    BearCallSpread,
    /// Short put at the high strike, long put at the low strike
    BullPutSpread,
    /// Long put at the high strike, short put at the low strike
    BearPutSpread,
    /// Long OTM put and long OTM call
    Strangle,
    /// Long call and long put at the same strike
    Straddle,
    /// Long underlying plus a short call
    CoveredCall,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 11] = [
        StrategyKind::LongCall,
        StrategyKind::ShortCall,
        StrategyKind::LongPut,
        StrategyKind::ShortPut,
        StrategyKind::BullCallSpread,
        StrategyKind::BearCallSpread,
        StrategyKind::BullPutSpread,
        StrategyKind::BearPutSpread,
        StrategyKind::Strangle,
        StrategyKind::Straddle,
        StrategyKind::CoveredCall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::LongCall => "Long Call",
            StrategyKind::ShortCall => "Short Call",
            StrategyKind::LongPut => "Long Put",
            StrategyKind::ShortPut => "Short Put",
            StrategyKind::BullCallSpread => "Bull Call Spread",
            StrategyKind::BearCallSpread => "Bear Call Spread",
            StrategyKind::BullPutSpread => "Bull Put Spread",
            StrategyKind::BearPutSpread => "Bear Put Spread",
            StrategyKind::Strangle => "Strangle",
            StrategyKind::Straddle => "Straddle",
            StrategyKind::CoveredCall => "Covered Call",
        }
    }

    /// Number of option legs
    pub fn leg_count(&self) -> usize {
        match self {
            StrategyKind::LongCall
            | StrategyKind::ShortCall
            | StrategyKind::LongPut
            | StrategyKind::ShortPut
            | StrategyKind::CoveredCall => 1,
            _ => 2,
        }
    }

    /// Profit has no upper bound as the underlying rises
    pub fn unbounded_profit(&self) -> bool {
        matches!(
            self,
            StrategyKind::LongCall | StrategyKind::Strangle | StrategyKind::Straddle
        )
    }

    /// Loss has no lower bound as the underlying rises
    pub fn unbounded_loss(&self) -> bool {
        matches!(self, StrategyKind::ShortCall)
    }
}

/// Break-even price(s) at maturity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BreakEven {
    /// P&L never crosses zero
    None,
    Single(f64),
    /// Lower and upper break-even, ascending
    Pair(f64, f64),
}

impl BreakEven {
    pub fn to_vec(&self) -> Vec<f64> {
        match *self {
            BreakEven::None => Vec::new(),
            BreakEven::Single(x) => vec![x],
            BreakEven::Pair(lo, hi) => vec![lo, hi],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BreakEven::None => 0,
            BreakEven::Single(_) => 1,
            BreakEven::Pair(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BreakEven::None)
    }

    /// Single root, or the pair with a non-positive lower root dropped
    fn from_roots(lower: f64, upper: f64) -> Self {
        match (lower > 0.0, upper > 0.0) {
            (true, true) => BreakEven::Pair(lower, upper),
            (false, true) => BreakEven::Single(upper),
            _ => BreakEven::None,
        }
    }

    fn positive(x: f64) -> Self {
        if x > 0.0 && x.is_finite() {
            BreakEven::Single(x)
        } else {
            BreakEven::None
        }
    }
}

/// Market inputs for building a strategy from model prices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyInputs {
    pub spot: f64,
    /// Main strike (the single strike, or the lower one of a pair)
    pub strike_1: f64,
    /// Second strike for two-strike strategies
    pub strike_2: f64,
    pub time_to_maturity: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
}

impl StrategyInputs {
    fn spec(&self, strike: f64, option_type: OptionType) -> OptionsResult<OptionSpec> {
        OptionSpec::new(
            self.spot,
            strike,
            self.time_to_maturity,
            self.risk_free_rate,
            self.volatility,
            option_type,
        )
    }
}

/// A validated multi-leg position
///
/// Deserialization goes through [`Strategy::new`], so a decoded strategy
/// has passed the same shape checks as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrategyParts")]
pub struct Strategy {
    kind: StrategyKind,
    /// Ordered by ascending strike
    legs: Vec<Leg>,
    quantity: u32,
}

/// Unvalidated wire form of a [`Strategy`]
#[derive(Debug, Clone, Deserialize)]
struct StrategyParts {
    kind: StrategyKind,
    legs: Vec<Leg>,
    quantity: u32,
}

impl TryFrom<StrategyParts> for Strategy {
    type Error = OptionsError;

    fn try_from(parts: StrategyParts) -> OptionsResult<Self> {
        Strategy::new(parts.kind, parts.legs, parts.quantity)
    }
}

impl Strategy {
    /// Validate the legs against the kind's required shape
    pub fn new(kind: StrategyKind, mut legs: Vec<Leg>, quantity: u32) -> OptionsResult<Self> {
        if quantity == 0 {
            return Err(OptionsError::invalid_strategy_shape(
                "quantity must be at least 1",
            ));
        }
        if legs.len() != kind.leg_count() {
            return Err(OptionsError::invalid_strategy_shape(format!(
                "{} needs {} leg(s), got {}",
                kind.name(),
                kind.leg_count(),
                legs.len()
            )));
        }
        for leg in &legs {
            leg.validate()?;
        }

        check_shape(kind, &legs)?;

        legs.sort_by(|a, b| a.strike().total_cmp(&b.strike()));
        Ok(Self {
            kind,
            legs,
            quantity,
        })
    }

    /// Build a strategy whose premiums are Black-Scholes prices
    ///
    /// Two-strike kinds use the lower of `strike_1`/`strike_2` as the low
    /// strike. A straddle charges the call premium on both legs.
    pub fn from_model(
        kind: StrategyKind,
        inputs: &StrategyInputs,
        quantity: u32,
    ) -> OptionsResult<Self> {
        use OptionType::{Call, Put};
        use Position::{Long, Short};

        let low = inputs.strike_1.min(inputs.strike_2);
        let high = inputs.strike_1.max(inputs.strike_2);
        let leg = |strike: f64, option_type: OptionType, position: Position| {
            inputs
                .spec(strike, option_type)
                .and_then(|spec| Leg::priced(spec, position))
        };

        let legs = match kind {
            StrategyKind::LongCall => vec![leg(inputs.strike_1, Call, Long)?],
            StrategyKind::ShortCall => vec![leg(inputs.strike_1, Call, Short)?],
            StrategyKind::LongPut => vec![leg(inputs.strike_1, Put, Long)?],
            StrategyKind::ShortPut => vec![leg(inputs.strike_1, Put, Short)?],
            StrategyKind::BullCallSpread => vec![leg(low, Call, Long)?, leg(high, Call, Short)?],
            StrategyKind::BearCallSpread => vec![leg(low, Call, Short)?, leg(high, Call, Long)?],
            StrategyKind::BullPutSpread => vec![leg(low, Put, Long)?, leg(high, Put, Short)?],
            StrategyKind::BearPutSpread => vec![leg(low, Put, Short)?, leg(high, Put, Long)?],
            StrategyKind::Strangle => vec![leg(low, Put, Long)?, leg(high, Call, Long)?],
            StrategyKind::Straddle => {
                let call = leg(inputs.strike_1, Call, Long)?;
                let put = Leg::long(inputs.spec(inputs.strike_1, Put)?, call.premium)?;
                vec![call, put]
            }
            StrategyKind::CoveredCall => vec![leg(inputs.strike_1, Call, Short)?],
        };

        Self::new(kind, legs, quantity)
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Entry price of the implicit underlying in a covered call
    pub fn underlying_entry(&self) -> Option<f64> {
        match self.kind {
            StrategyKind::CoveredCall => self.legs.first().map(|l| l.spec.spot),
            _ => None,
        }
    }

    /// P&L per unit at maturity, before quantity
    pub fn unit_pnl_at(&self, price: f64) -> f64 {
        let options: f64 = self.legs.iter().map(|l| l.pnl_at(price)).sum();
        let underlying = self.underlying_entry().map_or(0.0, |entry| price - entry);
        options + underlying
    }

    /// Total P&L at maturity
    pub fn pnl_at(&self, price: f64) -> f64 {
        self.quantity as f64 * self.unit_pnl_at(price)
    }

    /// Total P&L over a price grid
    pub fn payoff(&self, grid: &[f64]) -> PayoffCurve {
        PayoffCurve::from_fn(grid, |s| self.pnl_at(s))
    }

    /// Slope of the total P&L above the highest strike
    pub fn upside_slope(&self) -> f64 {
        let calls: f64 = self
            .legs
            .iter()
            .filter(|l| l.option_type() == OptionType::Call)
            .map(|l| l.position.sign())
            .sum();
        let underlying = if self.underlying_entry().is_some() { 1.0 } else { 0.0 };
        self.quantity as f64 * (calls + underlying)
    }

    /// Zero and every strike: the P&L is linear between these prices
    fn kinks(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(0.0).chain(self.legs.iter().map(Leg::strike))
    }

    /// Highest P&L over all prices at maturity; `None` when unbounded
    pub fn max_payoff(&self) -> Option<f64> {
        if self.upside_slope() > 0.0 {
            return None;
        }
        self.kinks().map(|s| self.pnl_at(s)).reduce(f64::max)
    }

    /// Lowest P&L over all prices at maturity; `None` when unbounded
    pub fn min_payoff(&self) -> Option<f64> {
        if self.upside_slope() < 0.0 {
            return None;
        }
        self.kinks().map(|s| self.pnl_at(s)).reduce(f64::min)
    }

    /// Whether the P&L beyond `[lower, upper]` rises above `max` or falls
    /// below `min`, as (max cut off, min cut off)
    fn cut_off_by(&self, lower: f64, upper: f64, max: f64, min: f64) -> (bool, bool) {
        let slope = self.upside_slope();
        let outside: Vec<f64> = self
            .kinks()
            .filter(|&s| s < lower || s > upper)
            .map(|s| self.pnl_at(s))
            .collect();
        let tol = |v: f64| 1e-9 * (1.0 + v.abs());

        let max_cut = slope > 0.0 || outside.iter().any(|&v| v > max + tol(max));
        let min_cut = slope < 0.0 || outside.iter().any(|&v| v < min - tol(min));
        (max_cut, min_cut)
    }

    /// Premium cash flow at entry over all legs and units
    pub fn net_premium(&self) -> f64 {
        self.quantity as f64 * self.legs.iter().map(Leg::net_premium).sum::<f64>()
    }

    /// Position Greeks; the covered call's underlying adds one delta per unit
    pub fn net_greeks(&self) -> OptionsResult<Greeks> {
        let mut total = Greeks::default();
        for leg in &self.legs {
            total = total.add(&leg.greeks()?);
        }
        if self.underlying_entry().is_some() {
            total.delta += 1.0;
        }
        Ok(total.scale(self.quantity as f64))
    }

    /// Closed-form break-even price(s)
    pub fn break_even(&self) -> BreakEven {
        use OptionType::{Call, Put};
        use Position::{Long, Short};

        let legs = &self.legs;
        match self.kind {
            StrategyKind::LongCall | StrategyKind::ShortCall => match legs.first() {
                Some(l) => BreakEven::positive(l.strike() + l.premium),
                None => BreakEven::None,
            },
            StrategyKind::LongPut | StrategyKind::ShortPut => match legs.first() {
                Some(l) => BreakEven::positive(l.strike() - l.premium),
                None => BreakEven::None,
            },
            StrategyKind::BullCallSpread => {
                vertical_call_break_even(find(legs, Call, Long), find(legs, Call, Short))
            }
            StrategyKind::BearCallSpread => {
                vertical_call_break_even(find(legs, Call, Short), find(legs, Call, Long))
            }
            StrategyKind::BullPutSpread => {
                vertical_put_break_even(find(legs, Put, Long), find(legs, Put, Short))
            }
            StrategyKind::BearPutSpread => {
                vertical_put_break_even(find(legs, Put, Short), find(legs, Put, Long))
            }
            StrategyKind::Strangle | StrategyKind::Straddle => {
                match (find(legs, Put, Long), find(legs, Call, Long)) {
                    (Some(put), Some(call)) => {
                        let total = put.premium + call.premium;
                        BreakEven::from_roots(put.strike() - total, call.strike() + total)
                    }
                    _ => BreakEven::None,
                }
            }
            StrategyKind::CoveredCall => match legs.first() {
                Some(call) => {
                    let root = call.spec.spot - call.premium;
                    if root <= call.strike() {
                        BreakEven::positive(root)
                    } else {
                        BreakEven::None
                    }
                }
                None => BreakEven::None,
            },
        }
    }

    /// Payoff curve, break-even and grid extremes
    pub fn report(&self, grid: &[f64]) -> StrategyReport {
        let curve = self.payoff(grid);
        let max = curve.max_point();
        let min = curve.min_point();
        let grid_range = match (grid.first(), grid.last()) {
            (Some(&lo), Some(&hi)) => Some((lo, hi)),
            _ => None,
        };
        let (max_pnl_grid_bounded, min_pnl_grid_bounded) = match (grid_range, max, min) {
            (Some((lo, hi)), Some((_, max)), Some((_, min))) => self.cut_off_by(lo, hi, max, min),
            _ => (false, false),
        };

        StrategyReport {
            kind: self.kind,
            break_even: self.break_even(),
            max_pnl: max.map(|(_, v)| v),
            max_pnl_price: max.map(|(p, _)| p),
            min_pnl: min.map(|(_, v)| v),
            min_pnl_price: min.map(|(p, _)| p),
            net_premium: self.net_premium(),
            unbounded_profit: self.kind.unbounded_profit(),
            unbounded_loss: self.kind.unbounded_loss(),
            max_pnl_grid_bounded,
            min_pnl_grid_bounded,
            payoff_max: self.max_payoff(),
            payoff_min: self.min_payoff(),
            grid_range,
            curve,
        }
    }
}

/// Everything a presentation layer needs to draw a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyReport {
    pub kind: StrategyKind,
    pub curve: PayoffCurve,
    pub break_even: BreakEven,
    /// Highest P&L on the grid
    pub max_pnl: Option<f64>,
    pub max_pnl_price: Option<f64>,
    /// Lowest P&L on the grid
    pub min_pnl: Option<f64>,
    pub min_pnl_price: Option<f64>,
    pub net_premium: f64,
    /// Profit grows without limit as the underlying rises
    pub unbounded_profit: bool,
    /// Loss grows without limit as the underlying rises
    pub unbounded_loss: bool,
    /// Prices outside the grid reach a higher P&L than `max_pnl`
    pub max_pnl_grid_bounded: bool,
    /// Prices outside the grid reach a lower P&L than `min_pnl`
    pub min_pnl_grid_bounded: bool,
    /// Highest P&L over all prices at maturity, `None` when unbounded
    pub payoff_max: Option<f64>,
    /// Lowest P&L over all prices at maturity, `None` when unbounded
    pub payoff_min: Option<f64>,
    /// Price range the extremes were taken over
    pub grid_range: Option<(f64, f64)>,
}

impl StrategyReport {
    /// True when either grid extreme is cut off by the grid rather than the payoff
    pub fn is_grid_bounded(&self) -> bool {
        self.max_pnl_grid_bounded || self.min_pnl_grid_bounded
    }
}

/// Build, validate and evaluate a strategy in one call
pub fn compose_strategy(
    kind: StrategyKind,
    legs: Vec<Leg>,
    quantity: u32,
    grid: &[f64],
) -> OptionsResult<StrategyReport> {
    Ok(Strategy::new(kind, legs, quantity)?.report(grid))
}

fn find(legs: &[Leg], option_type: OptionType, position: Position) -> Option<&Leg> {
    legs.iter()
        .find(|l| l.option_type() == option_type && l.position == position)
}

/// Required leg with a given role, or a shape error naming it
fn role<'a>(
    kind: StrategyKind,
    legs: &'a [Leg],
    option_type: OptionType,
    position: Position,
) -> OptionsResult<&'a Leg> {
    find(legs, option_type, position).ok_or_else(|| {
        OptionsError::invalid_strategy_shape(format!(
            "{} needs a {:?} {:?} leg",
            kind.name(),
            position,
            option_type
        ))
    })
}

fn require_below(kind: StrategyKind, low: &Leg, high: &Leg) -> OptionsResult<()> {
    if low.strike() < high.strike() {
        Ok(())
    } else {
        Err(OptionsError::invalid_strategy_shape(format!(
            "{} needs strike {} below strike {}",
            kind.name(),
            low.strike(),
            high.strike()
        )))
    }
}

fn check_shape(kind: StrategyKind, legs: &[Leg]) -> OptionsResult<()> {
    use OptionType::{Call, Put};
    use Position::{Long, Short};

    match kind {
        StrategyKind::LongCall => role(kind, legs, Call, Long).map(|_| ()),
        StrategyKind::ShortCall | StrategyKind::CoveredCall => {
            role(kind, legs, Call, Short).map(|_| ())
        }
        StrategyKind::LongPut => role(kind, legs, Put, Long).map(|_| ()),
        StrategyKind::ShortPut => role(kind, legs, Put, Short).map(|_| ()),
        StrategyKind::BullCallSpread => {
            let long = role(kind, legs, Call, Long)?;
            let short = role(kind, legs, Call, Short)?;
            require_below(kind, long, short)
        }
        StrategyKind::BearCallSpread => {
            let short = role(kind, legs, Call, Short)?;
            let long = role(kind, legs, Call, Long)?;
            require_below(kind, short, long)
        }
        StrategyKind::BullPutSpread => {
            let long = role(kind, legs, Put, Long)?;
            let short = role(kind, legs, Put, Short)?;
            require_below(kind, long, short)
        }
        StrategyKind::BearPutSpread => {
            let short = role(kind, legs, Put, Short)?;
            let long = role(kind, legs, Put, Long)?;
            require_below(kind, short, long)
        }
        StrategyKind::Strangle => {
            let put = role(kind, legs, Put, Long)?;
            let call = role(kind, legs, Call, Long)?;
            require_below(kind, put, call)?;
            if put.strike() < put.spec.spot && call.strike() > call.spec.spot {
                Ok(())
            } else {
                Err(OptionsError::invalid_strategy_shape(format!(
                    "Strangle needs put strike {} below spot and call strike {} above spot",
                    put.strike(),
                    call.strike()
                )))
            }
        }
        StrategyKind::Straddle => {
            let put = role(kind, legs, Put, Long)?;
            let call = role(kind, legs, Call, Long)?;
            let tolerance = 1e-9 * put.strike().max(call.strike());
            if (put.strike() - call.strike()).abs() <= tolerance {
                Ok(())
            } else {
                Err(OptionsError::invalid_strategy_shape(format!(
                    "Straddle needs one strike, got put {} and call {}",
                    put.strike(),
                    call.strike()
                )))
            }
        }
    }
}

/// Break-even of a two-call vertical: K_low + (premium_low - premium_high)
fn vertical_call_break_even(low: Option<&Leg>, high: Option<&Leg>) -> BreakEven {
    match (low, high) {
        (Some(low), Some(high)) => {
            let root = low.strike() + (low.premium - high.premium);
            inside(root, low.strike(), high.strike())
        }
        _ => BreakEven::None,
    }
}

/// Break-even of a two-put vertical: K_high - (premium_high - premium_low)
fn vertical_put_break_even(low: Option<&Leg>, high: Option<&Leg>) -> BreakEven {
    match (low, high) {
        (Some(low), Some(high)) => {
            let root = high.strike() - (high.premium - low.premium);
            inside(root, low.strike(), high.strike())
        }
        _ => BreakEven::None,
    }
}

fn inside(root: f64, low: f64, high: f64) -> BreakEven {
    if root > low && root < high {
        BreakEven::Single(root)
    } else {
        BreakEven::None
    }
}
