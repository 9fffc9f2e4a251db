//! End-to-end scenarios through the public API

use bsm_options::prelude::*;

fn atm_call() -> OptionSpec {
    OptionSpec::call(100.0, 100.0, 1.0, 0.01, 0.2).unwrap()
}

#[test]
fn test_atm_call_price_and_greeks() {
    let (price, g) = price_and_greeks(&atm_call()).unwrap();

    assert!((price - 8.4333).abs() < 1e-3);
    assert!((g.delta - 0.5596).abs() < 1e-3);
    assert!((g.gamma - 0.01972).abs() < 1e-4);
    assert!((g.vega - 0.3945).abs() < 1e-3);
    assert!((g.theta - (-0.01211)).abs() < 1e-4);
    assert!((g.rho - 0.4753).abs() < 1e-3);
}

#[test]
fn test_long_call_break_even_from_model() {
    let inputs = StrategyInputs {
        spot: 100.0,
        strike_1: 100.0,
        strike_2: 100.0,
        time_to_maturity: 1.0,
        risk_free_rate: 0.01,
        volatility: 0.2,
    };
    let strategy = Strategy::from_model(StrategyKind::LongCall, &inputs, 1).unwrap();
    let premium = strategy.legs()[0].premium;

    let grid = EngineConfig::default().price_grid().unwrap();
    let report = strategy.report(&grid);

    assert_eq!(report.break_even.len(), 1);
    let b = report.break_even.to_vec()[0];
    assert!((b - (100.0 + premium)).abs() < 1e-12);
    assert!(report.curve.value_at(b).unwrap().abs() < 0.05);
    assert!((report.net_premium + premium).abs() < 1e-12);

    // Upside is only capped by the grid
    assert!(report.unbounded_profit);
    assert!(report.max_pnl_grid_bounded);
    assert!(!report.min_pnl_grid_bounded);
    assert_eq!(report.payoff_max, None);
    assert!((report.payoff_min.unwrap() + premium).abs() < 1e-12);
    assert_eq!(report.max_pnl_price, Some(160.0));
    assert_eq!(report.grid_range, Some((40.0, 160.0)));
}

#[test]
fn test_strangle_with_two_calls_is_rejected() {
    let legs = vec![
        Leg::long(atm_call().with_strike(95.0), 8.0).unwrap(),
        Leg::long(atm_call().with_strike(105.0), 4.0).unwrap(),
    ];
    let grid = price_grid(40.0, 160.0, 50).unwrap();
    let err = compose_strategy(StrategyKind::Strangle, legs, 1, &grid).unwrap_err();
    assert!(err.is_invalid_strategy_shape());
}

#[test]
fn test_zero_spot_is_invalid_input() {
    let err = OptionSpec::call(0.0, 100.0, 1.0, 0.01, 0.2).unwrap_err();
    assert!(err.is_invalid_input());

    let spec = OptionSpec {
        spot: 0.0,
        ..atm_call()
    };
    assert!(bs_price(&spec).unwrap_err().is_invalid_input());
    assert!(bs_greeks(&spec).unwrap_err().is_invalid_input());
}

#[test]
fn test_config_driven_heatmaps() {
    let config = EngineConfig::default();
    let spots = config.heatmap.spot_axis();
    let vols = config.heatmap.vol_axis();

    let prices = config.evaluator().price_heatmap(&atm_call(), &spots, &vols).unwrap();
    assert_eq!(prices.dim(), (vols.len(), spots.len()));
    assert_eq!(prices.dim(), (20, 20));

    // Cell (i, j) is the price at (spots[j], vols[i])
    let direct = bs_price(&atm_call().with_spot(spots[3]).with_volatility(vols[7])).unwrap();
    assert_eq!(prices.get(7, 3), Some(direct));

    let fine = EngineConfig::fine();
    let delta = GridEvaluator::default()
        .greek_heatmap(
            &atm_call(),
            GreekKind::Delta,
            &fine.heatmap.spot_axis(),
            &fine.heatmap.vol_axis(),
        )
        .unwrap();
    assert_eq!(delta.dim(), (60, 60));
    assert!(delta.min().unwrap() >= 0.0);
    assert!(delta.max().unwrap() <= 1.0);
}

#[test]
fn test_every_strategy_reports_from_model() {
    let inputs = StrategyInputs {
        spot: 100.0,
        strike_1: 95.0,
        strike_2: 105.0,
        time_to_maturity: 0.25,
        risk_free_rate: 0.01,
        volatility: 0.3,
    };
    let grid = EngineConfig::default().price_grid().unwrap();

    for kind in StrategyKind::ALL {
        let strategy = Strategy::from_model(kind, &inputs, 3).unwrap();
        let report = strategy.report(&grid);
        assert_eq!(report.curve.len(), 300);
        assert_eq!(report.kind, kind);
        for b in report.break_even.to_vec() {
            assert!(strategy.pnl_at(b).abs() < 1e-9, "{}: pnl at {} not zero", kind.name(), b);
        }
        // Quantity scales the whole position
        assert!((strategy.pnl_at(120.0) - 3.0 * strategy.unit_pnl_at(120.0)).abs() < 1e-12);
    }
}
