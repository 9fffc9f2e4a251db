//! BSM Options CLI
//!
//! Prints a price and Greeks, a strategy report and heatmap dimensions.
//!
//! Usage: bsm-cli [config.json]

use std::process::ExitCode;

use bsm_options::core::linspace;
use bsm_options::models::black_scholes;
use bsm_options::prelude::*;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match EngineConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("could not load {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &EngineConfig) -> OptionsResult<()> {
    println!("BSM Options Pricing");
    println!("===================\n");

    let spot = 100.0;
    let strike = 100.0;
    let time = 1.0;
    let rate = config.risk_free_rate;
    let vol = 0.20;

    println!("Black-Scholes Pricing Example:");
    println!("  Spot: ${:.2}", spot);
    println!("  Strike: ${:.2}", strike);
    println!("  Time: {:.0} days", time * black_scholes::DAYS_PER_YEAR);
    println!("  Rate: {:.1}%", rate * 100.0);
    println!("  Vol: {:.1}%\n", vol * 100.0);

    let call = OptionSpec::call(spot, strike, time, rate, vol)?;
    let (call_price, put_price) = black_scholes::call_put_prices(&call)?;

    println!("Option Prices:");
    println!("  Call: ${:.4}", call_price);
    println!("  Put: ${:.4}", put_price);

    let greeks = black_scholes::greeks(&call)?;
    println!("\nCall Greeks:");
    println!("  Delta: {:.4}", greeks.delta);
    println!("  Gamma: {:.6}", greeks.gamma);
    println!("  Vega: {:.4} per vol point", greeks.vega);
    println!("  Theta: {:.4} per day", greeks.theta);
    println!("  Rho: {:.4} per rate point", greeks.rho);

    println!("\n--- Strategies ---");
    let inputs = StrategyInputs {
        spot,
        strike_1: 95.0,
        strike_2: 105.0,
        time_to_maturity: time,
        risk_free_rate: rate,
        volatility: vol,
    };
    let grid = config.price_grid()?;

    for kind in StrategyKind::ALL {
        let strategy = Strategy::from_model(kind, &inputs, config.quantity)?;
        let report = strategy.report(&grid);

        let break_even = report
            .break_even
            .to_vec()
            .iter()
            .map(|b| format!("{:.2}", b))
            .collect::<Vec<_>>()
            .join(", ");

        println!("\n{}", kind.name());
        println!("  Net premium: {:+.4}", report.net_premium);
        println!(
            "  Break-even: {}",
            if break_even.is_empty() { "none".to_string() } else { break_even }
        );
        if let (Some(max), Some(min)) = (report.max_pnl, report.min_pnl) {
            println!("  Max P&L: {:.4}", max);
            println!("  Min P&L: {:.4}", min);
        }
        if let Some((lo, hi)) = report.grid_range {
            if report.max_pnl_grid_bounded {
                println!("  (max P&L limited to prices in [{:.0}, {:.0}])", lo, hi);
            }
            if report.min_pnl_grid_bounded {
                println!("  (min P&L limited to prices in [{:.0}, {:.0}])", lo, hi);
            }
        }
        match (report.payoff_max, report.payoff_min) {
            (Some(max), Some(min)) => println!("  Payoff range: {:.4} .. {:.4}", min, max),
            (None, Some(min)) => println!("  Payoff range: {:.4} .. unbounded", min),
            (Some(max), None) => println!("  Payoff range: unbounded .. {:.4}", max),
            (None, None) => println!("  Payoff range: unbounded"),
        }
    }

    println!("\n--- Heatmaps ---");
    let hm = &config.heatmap;
    let spots = hm.spot_axis();
    let vols = hm.vol_axis();
    let evaluator = config.evaluator();

    let prices = evaluator.price_heatmap(&call, &spots, &vols)?;
    let (rows, cols) = prices.dim();
    println!("Call price over spot x vol: {} x {}", rows, cols);
    if let (Some(lo), Some(hi)) = (prices.min(), prices.max()) {
        println!("  Range: ${:.2} .. ${:.2}", lo, hi);
    }

    let delta = evaluator.greek_heatmap(&call, GreekKind::Delta, &spots, &vols)?;
    let (rows, cols) = delta.dim();
    println!("Call delta over spot x vol: {} x {}", rows, cols);

    let strikes = linspace(0.7 * strike, 1.3 * strike, hm.resolution);
    let vega = evaluator.greek_heatmap_over_strike_vol(&call, GreekKind::Vega, &strikes, &vols)?;
    if let Some(peak) = vega.max() {
        println!("Peak vega over strike x vol: {:.4}", peak);
    }

    println!("\n--- Done ---");
    Ok(())
}
