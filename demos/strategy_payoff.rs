//! Example: Strategy payoffs and a quoted chain
//!
//! Run with: cargo run --example strategy_payoff

use bsm_options::prelude::*;
use chrono::NaiveDate;

fn main() -> OptionsResult<()> {
    // Option parameters
    let spot = 100.0;
    let strike = 100.0;
    let time = 0.5; // 6 months
    let rate = 0.01; // 1% risk-free rate
    let vol = 0.25; // 25% volatility

    println!("=== Black-Scholes Pricing ===\n");
    println!("Spot:     ${:.2}", spot);
    println!("Strike:   ${:.2}", strike);
    println!("Time:     {:.2} years ({:.0} days)", time, time * 365.0);
    println!("Rate:     {:.1}%", rate * 100.0);
    println!("Vol:      {:.1}%\n", vol * 100.0);

    let call = OptionSpec::call(spot, strike, time, rate, vol)?;
    let put = call.with_type(OptionType::Put);
    let call_price = bs_price(&call)?;
    let put_price = bs_price(&put)?;
    println!("Call Price: ${:.4}", call_price);
    println!("Put Price:  ${:.4}", put_price);

    // Verify put-call parity: C - P = S - K*e^(-rT)
    let parity_lhs = call_price - put_price;
    let parity_rhs = spot - strike * call.discount_factor();
    println!("\nPut-Call Parity Check:");
    println!("  C - P = {:.4}", parity_lhs);
    println!("  S - K*e^(-rT) = {:.4}", parity_rhs);
    println!("  Difference: {:.6}", (parity_lhs - parity_rhs).abs());

    // Straddle built from two hand-priced legs
    println!("\n=== Long Straddle ===\n");
    let legs = vec![
        Leg::long(call, call_price)?,
        Leg::long(put, put_price)?,
    ];
    let grid = price_grid(50.0, 150.0, 201)?;
    let report = compose_strategy(StrategyKind::Straddle, legs, 1, &grid)?;
    println!("Net premium: {:+.4}", report.net_premium);
    println!("Break-even:  {:?}", report.break_even.to_vec());
    for price in [70.0, 100.0, 130.0] {
        if let Some(pnl) = report.curve.value_at(price) {
            println!("  P&L at {:>6.2}: {:+.4}", price, pnl);
        }
    }
    if report.max_pnl_grid_bounded {
        println!("  Max P&L {:?} is the grid edge, not a cap", report.max_pnl);
    }
    if let Some(min) = report.payoff_min {
        println!("  Worst case at any price: {:+.4}", min);
    }

    // Chain analytics on a small quoted chain
    println!("\n=== Quoted Chain ===\n");
    let expiry = NaiveDate::from_ymd_opt(2026, 6, 19).unwrap();
    let as_of = NaiveDate::from_ymd_opt(2025, 12, 19).unwrap();
    let mut chain = QuoteChain::new("DEMO", spot, expiry);
    chain.add_call(ContractSnapshot::new(90.0, 13.10, 0.27, 850));
    chain.add_call(ContractSnapshot::new(100.0, 7.35, 0.25, 2100));
    chain.add_call(ContractSnapshot::new(110.0, 3.40, 0.23, 1300));

    for row in model_vs_market(&chain, OptionType::Call, rate, as_of)? {
        println!(
            "K={:>6.1}  IV={:>5.1}%  market={:>6.2}  model={:>6.2}  diff={:+.2}",
            row.strike,
            row.implied_volatility * 100.0,
            row.market_price,
            row.model_price,
            row.difference()
        );
    }

    let short_call = Leg::from_market(&chain, OptionType::Call, 110.0, Position::Short, rate, as_of)?;
    println!("\nShort 110 call premium from market: {:.2}", short_call.premium);

    Ok(())
}
