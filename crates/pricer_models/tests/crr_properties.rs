//! End-to-end properties of the CRR lattice pricer.
//!
//! Builds lattices through the public API only and checks them against
//! closed-form values, put-call parity and the Black-Scholes reference.

use proptest::prelude::*;

use pricer_core::market_data::MarketParameters;
use pricer_core::types::{ModelViolation, OptionType, PricingError};
use pricer_models::analytical::BlackScholes;
use pricer_models::convergence::{ConvergenceAnalyzer, StepRange};
use pricer_models::lattice::{build_lattice, price_european, price_option, LatticeConfig};

fn atm(option_type: OptionType) -> MarketParameters {
    MarketParameters::new(100.0, 100.0, 0.05, 0.2, 1.0, option_type).unwrap()
}

// ================================================================
// Concrete scenarios
// ================================================================

#[test]
fn test_atm_call_200_steps_near_black_scholes() {
    let params = atm(OptionType::Call);
    let (config, prices) = build_lattice(&params, 200).unwrap();
    let valuation = price_european(&params, &config, &prices).unwrap();

    assert!((valuation.root_price() - 10.4506).abs() < 0.05);
    assert!((valuation.root_price() - BlackScholes::reference_price(&params)).abs() < 0.05);
}

#[test]
fn test_one_step_equals_discounted_expectation() {
    let params = atm(OptionType::Call);
    let (config, prices) = build_lattice(&params, 1).unwrap();
    let valuation = price_european(&params, &config, &prices).unwrap();

    let u = 0.2_f64.exp();
    let d = 1.0 / u;
    let p = (0.05_f64.exp() - d) / (u - d);
    let expected = (-0.05_f64).exp() * (p * (100.0 * u - 100.0) + (1.0 - p) * 0.0);

    assert_eq!(config.up(), u);
    assert_eq!(config.probability(), p);
    assert_eq!(valuation.root_price(), expected);
}

#[test]
fn test_negative_spot_is_invalid_model() {
    let result = MarketParameters::new(-1.0, 100.0, 0.05, 0.2, 1.0, OptionType::Call);
    assert!(matches!(
        result,
        Err(PricingError::InvalidModel(ModelViolation::NonPositiveSpot { .. }))
    ));
}

#[test]
fn test_zero_steps_is_invalid_model() {
    let result = build_lattice(&atm(OptionType::Call), 0);
    assert!(matches!(
        result,
        Err(PricingError::InvalidModel(ModelViolation::ZeroSteps { .. }))
    ));
}

#[test]
fn test_36_40_put_defaults() {
    // S0=36, K=40, T=1, r=6%, σ=20%, put
    let params = MarketParameters::new(36.0, 40.0, 0.06, 0.2, 1.0, OptionType::Put).unwrap();
    let reference = BlackScholes::reference_price(&params);
    let (_, valuation) = price_option(&params, 10).unwrap();

    assert!((valuation.root_price() - reference).abs() < 0.1);
    assert_eq!(valuation.values().steps(), 10);
}

#[test]
fn test_error_at_500_steps_below_error_at_10() {
    for option_type in [OptionType::Call, OptionType::Put] {
        let params = atm(option_type);
        let reference = BlackScholes::reference_price(&params);
        let analyzer =
            ConvergenceAnalyzer::new(params, StepRange::new(vec![10, 500]).unwrap(), reference)
                .unwrap();
        let series = analyzer.analyze().unwrap();

        assert!(series.points()[1].abs_error < series.points()[0].abs_error);
    }
}

#[test]
fn test_ladder_study_bounded_oscillation() {
    let params = atm(OptionType::Put);
    let reference = BlackScholes::reference_price(&params);
    let ladder = StepRange::ladder(300).unwrap();
    let analyzer = ConvergenceAnalyzer::new(params, ladder, reference).unwrap();
    let series = analyzer.analyze_parallel().unwrap();

    assert_eq!(series.len(), 30);
    let first_error = series.points()[0].abs_error;
    for point in series.iter() {
        assert!(point.abs_error <= first_error + 1e-12);
    }
}

#[test]
fn test_build_and_price_idempotent() {
    let params = atm(OptionType::Put);
    let (prices_a, valuation_a) = price_option(&params, 123).unwrap();
    let (prices_b, valuation_b) = price_option(&params, 123).unwrap();

    assert_eq!(prices_a, prices_b);
    assert_eq!(valuation_a, valuation_b);
    assert_eq!(
        valuation_a.root_price().to_bits(),
        valuation_b.root_price().to_bits()
    );
}

#[test]
fn test_flat_export_covers_every_node() {
    let (prices, valuation) = price_option(&atm(OptionType::Call), 4).unwrap();
    let price_rows: Vec<_> = prices.nodes().collect();
    let value_rows: Vec<_> = valuation.values().nodes().collect();

    assert_eq!(price_rows.len(), 15);
    assert_eq!(value_rows.len(), 15);
    for (price, value) in price_rows.iter().zip(&value_rows) {
        assert_eq!((price.step, price.node), (value.step, value.node));
    }
}

// ================================================================
// Property tests
// ================================================================

/// Economically sensible inputs: |r|·√Δt stays below σ for every N ≥ 1.
fn sensible_params() -> impl Strategy<Value = MarketParameters> {
    (
        1.0_f64..500.0,
        1.0_f64..500.0,
        -0.05_f64..0.1,
        0.15_f64..1.0,
        0.05_f64..2.0,
        any::<bool>(),
    )
        .prop_map(|(spot, strike, rate, volatility, expiry, is_call)| {
            let option_type = if is_call {
                OptionType::Call
            } else {
                OptionType::Put
            };
            MarketParameters::new(spot, strike, rate, volatility, expiry, option_type).unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_probability_strictly_inside_unit_interval(
        params in sensible_params(),
        steps in 1_usize..1000,
    ) {
        let config = LatticeConfig::new(&params, steps).unwrap();
        prop_assert!(config.probability() > 0.0);
        prop_assert!(config.probability() < 1.0);
    }

    #[test]
    fn test_nodes_match_power_formula(params in sensible_params(), steps in 1_usize..150) {
        let (config, prices) = build_lattice(&params, steps).unwrap();
        for node in prices.nodes() {
            let expected = params.spot()
                * config.up().powi(node.node as i32)
                * config.down().powi((node.step - node.node) as i32);
            prop_assert!(((node.value - expected) / expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_terminal_column_is_intrinsic(params in sensible_params(), steps in 1_usize..150) {
        let (prices, valuation) = price_option(&params, steps).unwrap();
        let terminal_prices = prices.row(steps).unwrap();
        let terminal_values = valuation.values().row(steps).unwrap();
        for (&spot, &value) in terminal_prices.iter().zip(terminal_values) {
            prop_assert_eq!(value, params.option_type().payoff(spot, params.strike()));
            prop_assert!(value >= 0.0);
        }
    }

    #[test]
    fn test_put_call_parity(params in sensible_params(), steps in 1_usize..200) {
        let call = params.with_option_type(OptionType::Call);
        let put = params.with_option_type(OptionType::Put);
        let (_, call_valuation) = price_option(&call, steps).unwrap();
        let (_, put_valuation) = price_option(&put, steps).unwrap();

        let lhs = call_valuation.root_price() - put_valuation.root_price();
        let rhs = params.spot() - params.strike() * params.discount_factor();
        let scale = params.spot().max(params.strike());
        prop_assert!((lhs - rhs).abs() <= 1e-9 * scale);
    }

    #[test]
    fn test_price_within_no_arbitrage_bounds(params in sensible_params(), steps in 1_usize..100) {
        let (_, valuation) = price_option(&params, steps).unwrap();
        let price = valuation.root_price();
        let bound = match params.option_type() {
            OptionType::Call => params.spot(),
            OptionType::Put => params.strike() * params.discount_factor(),
        };
        prop_assert!(price >= 0.0);
        prop_assert!(price <= bound * (1.0 + 1e-12));
    }
}
